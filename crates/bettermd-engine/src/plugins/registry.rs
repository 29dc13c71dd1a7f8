use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;

use super::builtin::BuiltinPlugin;
use super::descriptor::{Panel, PluginDescriptor};
use super::error::PluginError;
use super::lifecycle::{Lifecycle, PluginInstance, Transition};

/// Outcome of [`PluginRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    /// A plugin with the same id was already present; nothing changed.
    AlreadyRegistered,
}

type SharedInstance<P> = Arc<Mutex<PluginInstance<P>>>;

struct Entry<P> {
    descriptor: PluginDescriptor,
    instance: SharedInstance<P>,
}

struct State<P> {
    plugins: Vec<Entry<P>>,
    enabled: BTreeSet<String>,
    /// Ids whose `init` hook is running.
    pending: BTreeSet<String>,
}

/// Releases a pending id when registration finishes, fails or is cancelled.
struct PendingRegistration<'a, P> {
    registry: &'a PluginRegistry<P>,
    id: String,
}

impl<P> Drop for PendingRegistration<'_, P> {
    fn drop(&mut self) {
        self.registry.write().pending.remove(&self.id);
    }
}

/// Registry of plugins for one editing session.
///
/// The authoritative record of which plugins exist and which are enabled.
/// Mutated only through [`register`](Self::register),
/// [`unregister`](Self::unregister), [`enable`](Self::enable) and
/// [`disable`](Self::disable); read by any number of consumers.
///
/// ## Invariants
///
/// - `enabled` only ever holds ids of registered plugins
/// - after every operation settles, each instance's own `enabled` flag equals
///   its membership in `enabled`
/// - hooks of one plugin run one at a time: every mutation of an id first takes
///   that plugin's async lock, so concurrent requests are applied in turn
///
/// The state lock is only held for synchronous reads and writes, never across
/// a hook's await point.
pub struct PluginRegistry<P = BuiltinPlugin> {
    state: RwLock<State<P>>,
}

impl<P: Lifecycle> PluginRegistry<P> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                plugins: Vec::new(),
                enabled: BTreeSet::new(),
                pending: BTreeSet::new(),
            }),
        }
    }

    /// Register `plugin`, running its `init` hook first.
    ///
    /// Idempotent on id: if the id is already registered, or another
    /// registration of it is still running `init`, the new instance is dropped
    /// without running any hook. A failed `init` releases the id again.
    pub async fn register(&self, plugin: P) -> Result<Registration, PluginError> {
        let id = plugin.descriptor().id.clone();
        let _pending = {
            let mut state = self.write();
            if state.pending.contains(&id) || state.plugins.iter().any(|e| e.descriptor.id == id)
            {
                log::debug!("plugin {id} already registered");
                return Ok(Registration::AlreadyRegistered);
            }
            state.pending.insert(id.clone());
            PendingRegistration {
                registry: self,
                id: id.clone(),
            }
        };

        let mut instance = PluginInstance::new(plugin);
        instance.init().await?;
        let descriptor = instance.plugin().descriptor().clone();

        {
            let mut state = self.write();
            state.pending.remove(&id);
            state.plugins.push(Entry {
                descriptor,
                instance: Arc::new(Mutex::new(instance)),
            });
        }
        log::info!("registered plugin {id}");
        Ok(Registration::Registered)
    }

    /// Remove a plugin, disabling it first if it is enabled.
    ///
    /// If the `disable` hook fails the plugin stays registered and enabled.
    pub async fn unregister(&self, id: &str) -> Result<PluginDescriptor, PluginError> {
        let shared = self.instance(id)?;
        let mut instance = shared.lock().await;
        let descriptor = self.settled_descriptor(id, &shared)?;

        if instance.disable().await? == Transition::Changed {
            log::info!("disabled plugin {id} before unregistering");
        }

        let mut state = self.write();
        state.plugins.retain(|e| !Arc::ptr_eq(&e.instance, &shared));
        state.enabled.remove(id);
        log::info!("unregistered plugin {id}");
        Ok(descriptor)
    }

    /// Enable a registered plugin. Its `enable` hook runs only on a real
    /// disabled to enabled transition.
    pub async fn enable(&self, id: &str) -> Result<Transition, PluginError> {
        let shared = self.instance(id)?;
        let mut instance = shared.lock().await;
        self.settled_descriptor(id, &shared)?;

        let transition = instance.enable().await?;
        if transition == Transition::Changed {
            self.write().enabled.insert(id.to_string());
            log::info!("enabled plugin {id}");
        }
        Ok(transition)
    }

    /// Disable a registered plugin. Its `disable` hook runs only on a real
    /// enabled to disabled transition.
    pub async fn disable(&self, id: &str) -> Result<Transition, PluginError> {
        let shared = self.instance(id)?;
        let mut instance = shared.lock().await;
        self.settled_descriptor(id, &shared)?;

        let transition = instance.disable().await?;
        if transition == Transition::Changed {
            self.write().enabled.remove(id);
            log::info!("disabled plugin {id}");
        }
        Ok(transition)
    }

    /// Enable each id in order, stopping at the first failure.
    pub async fn enable_all<I, S>(&self, ids: I) -> Result<(), PluginError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.enable(id.as_ref()).await?;
        }
        Ok(())
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        self.read()
            .plugins
            .iter()
            .map(|e| e.descriptor.clone())
            .collect()
    }

    pub fn descriptor(&self, id: &str) -> Option<PluginDescriptor> {
        self.read()
            .plugins
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| e.descriptor.clone())
    }

    pub fn enabled_ids(&self) -> BTreeSet<String> {
        self.read().enabled.clone()
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.read().enabled.contains(id)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.read().plugins.iter().any(|e| e.descriptor.id == id)
    }

    pub fn len(&self) -> usize {
        self.read().plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().plugins.is_empty()
    }

    /// Panels of enabled plugins in registration order: what the host mounts.
    pub fn enabled_panels(&self) -> Vec<(String, Panel)> {
        let state = self.read();
        state
            .plugins
            .iter()
            .filter(|e| state.enabled.contains(&e.descriptor.id))
            .filter_map(|e| {
                e.descriptor
                    .panel
                    .clone()
                    .map(|panel| (e.descriptor.id.clone(), panel))
            })
            .collect()
    }

    /// The instance's own `enabled` flag, waiting for any in-flight hook.
    pub async fn instance_enabled(&self, id: &str) -> Option<bool> {
        let shared = self.instance(id).ok()?;
        let instance = shared.lock().await;
        Some(instance.is_enabled())
    }

    /// Whether every instance flag agrees with the registry's `enabled` set.
    ///
    /// Each instance is compared while its lock is held, so a hook still in
    /// flight is waited for rather than observed half-applied.
    pub async fn is_consistent(&self) -> bool {
        let entries: Vec<_> = {
            let state = self.read();
            let orphaned = state
                .enabled
                .iter()
                .any(|id| !state.plugins.iter().any(|e| &e.descriptor.id == id));
            if orphaned {
                return false;
            }
            state
                .plugins
                .iter()
                .map(|e| (e.descriptor.id.clone(), Arc::clone(&e.instance)))
                .collect()
        };

        for (id, shared) in entries {
            let instance = shared.lock().await;
            let state = self.read();
            // Unregistered while we waited; its id has left `enabled` with it.
            if !state.plugins.iter().any(|e| Arc::ptr_eq(&e.instance, &shared)) {
                continue;
            }
            if instance.is_enabled() != state.enabled.contains(&id) {
                return false;
            }
        }
        true
    }

    fn instance(&self, id: &str) -> Result<SharedInstance<P>, PluginError> {
        self.read()
            .plugins
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| Arc::clone(&e.instance))
            .ok_or_else(|| PluginError::NotFound(id.to_string()))
    }

    /// Re-check, once the instance lock is held, that `shared` is still the
    /// registered instance for `id`; it may have been unregistered meanwhile.
    fn settled_descriptor(
        &self,
        id: &str,
        shared: &SharedInstance<P>,
    ) -> Result<PluginDescriptor, PluginError> {
        self.read()
            .plugins
            .iter()
            .find(|e| Arc::ptr_eq(&e.instance, shared))
            .map(|e| e.descriptor.clone())
            .ok_or_else(|| PluginError::NotFound(id.to_string()))
    }
}

impl<P> PluginRegistry<P> {
    fn read(&self) -> RwLockReadGuard<'_, State<P>> {
        // Recover from a poisoned lock (another thread panicked while holding it)
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<P>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl PluginRegistry<BuiltinPlugin> {
    /// A registry with every built-in plugin registered and disabled.
    pub async fn with_builtins() -> Result<Self, PluginError> {
        let registry = Self::new();
        for plugin in BuiltinPlugin::all() {
            registry.register(plugin).await?;
        }
        Ok(registry)
    }
}

impl<P: Lifecycle> Default for PluginRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
