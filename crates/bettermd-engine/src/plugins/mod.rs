/*!
# Plugins

A plugin is anything implementing [`Lifecycle`]: a descriptor plus three async
hooks (`init`, `enable`, `disable`). The [`PluginRegistry`] owns the instances
and is the only place enabled state changes.

```text
register ──init──▶ [disabled] ──enable──▶ [enabled]
                        ▲                     │
                        └──────disable────────┘
unregister: disable (if enabled), then remove
```

Built-in plugins are a closed set ([`PluginKind`]) and carry no behavior
beyond logging their transitions; their panels are what a host renders.
*/

pub mod builtin;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod registry;

pub use builtin::{BuiltinPlugin, PluginKind};
pub use descriptor::{Panel, PluginDescriptor};
pub use error::{Hook, HookError, PluginError};
pub use lifecycle::{Lifecycle, PluginInstance, Transition};
pub use registry::{PluginRegistry, Registration};
