//! Shared test helpers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::plugins::{Hook, HookError, Lifecycle, PluginDescriptor};

/// A plugin that records every hook it runs and can be told to fail one.
pub struct RecordingPlugin {
    descriptor: PluginDescriptor,
    calls: Rc<RefCell<Vec<Hook>>>,
    fail_on: Option<Hook>,
    yielding: bool,
}

impl RecordingPlugin {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: PluginDescriptor::new(id, id),
            calls: Rc::new(RefCell::new(Vec::new())),
            fail_on: None,
            yielding: false,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.descriptor.name = name.to_string();
        self
    }

    pub fn failing_on(mut self, hook: Hook) -> Self {
        self.fail_on = Some(hook);
        self
    }

    /// Suspend once inside every hook so other tasks get to run mid-hook.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<Hook>>> {
        Rc::clone(&self.calls)
    }

    async fn hook(&mut self, hook: Hook) -> Result<(), HookError> {
        if self.yielding {
            tokio::task::yield_now().await;
        }
        if self.fail_on == Some(hook) {
            return Err(HookError::new(format!("{hook} refused")));
        }
        self.calls.borrow_mut().push(hook);
        Ok(())
    }
}

impl Lifecycle for RecordingPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn init(&mut self) -> Result<(), HookError> {
        self.hook(Hook::Init).await
    }

    async fn enable(&mut self) -> Result<(), HookError> {
        self.hook(Hook::Enable).await
    }

    async fn disable(&mut self) -> Result<(), HookError> {
        self.hook(Hook::Disable).await
    }
}
