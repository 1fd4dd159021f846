use crate::ui::{UiHandle, UiTask};

/// Object exposed to page script under the configured bridge name.
///
/// Calls come from the web view's script thread; both are fire-and-forget
/// and only schedule the transition on the UI thread.
#[derive(Clone)]
pub struct FullscreenBridge {
    ui: UiHandle,
}

impl FullscreenBridge {
    pub fn new(ui: UiHandle) -> Self {
        Self { ui }
    }

    pub fn enter(&self) {
        log::debug!("bridge: enter()");
        self.ui.post(UiTask::EnterImmersive);
    }

    pub fn exit(&self) {
        log::debug!("bridge: exit()");
        self.ui.post(UiTask::ExitImmersive);
    }

    /// Dispatches a call by its script-visible method name. Unknown names
    /// are logged and dropped.
    pub fn invoke(&self, method: &str) {
        match method {
            "enter" => self.enter(),
            "exit" => self.exit(),
            other => log::warn!("bridge: no method '{other}'"),
        }
    }
}
