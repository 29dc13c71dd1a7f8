use super::descriptor::PluginDescriptor;
use super::error::{Hook, HookError, PluginError};

/// The single lifecycle interface every plugin kind implements.
///
/// Hooks may suspend. The registry awaits each one to completion and never runs
/// two hooks of the same plugin at once.
#[allow(async_fn_in_trait)]
pub trait Lifecycle {
    fn descriptor(&self) -> &PluginDescriptor;

    /// Runs once, before the plugin is first inserted into a registry.
    async fn init(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    async fn enable(&mut self) -> Result<(), HookError>;

    async fn disable(&mut self) -> Result<(), HookError>;
}

/// Outcome of an enable/disable request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The plugin moved to the requested state and its hook ran.
    Changed,
    /// The plugin was already in the requested state; no hook ran.
    Unchanged,
}

/// A registered plugin together with its own `enabled` flag.
///
/// The flag only changes after the matching hook succeeds, so a failing hook
/// leaves the instance in its previous state.
pub struct PluginInstance<P> {
    plugin: P,
    enabled: bool,
}

impl<P: Lifecycle> PluginInstance<P> {
    pub(crate) fn new(plugin: P) -> Self {
        Self {
            plugin,
            enabled: false,
        }
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) async fn init(&mut self) -> Result<(), PluginError> {
        self.run_hook(Hook::Init).await
    }

    pub(crate) async fn enable(&mut self) -> Result<Transition, PluginError> {
        if self.enabled {
            return Ok(Transition::Unchanged);
        }
        self.run_hook(Hook::Enable).await?;
        self.enabled = true;
        Ok(Transition::Changed)
    }

    pub(crate) async fn disable(&mut self) -> Result<Transition, PluginError> {
        if !self.enabled {
            return Ok(Transition::Unchanged);
        }
        self.run_hook(Hook::Disable).await?;
        self.enabled = false;
        Ok(Transition::Changed)
    }

    async fn run_hook(&mut self, hook: Hook) -> Result<(), PluginError> {
        let result = match hook {
            Hook::Init => self.plugin.init().await,
            Hook::Enable => self.plugin.enable().await,
            Hook::Disable => self.plugin.disable().await,
        };
        result.map_err(|source| {
            let id = self.plugin.descriptor().id.clone();
            log::warn!("plugin {id} {hook} hook failed: {source}");
            PluginError::HookFailed { id, hook, source }
        })
    }
}
