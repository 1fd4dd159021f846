//! Platform collaborators the controller drives. Implemented by the
//! platform crate (or by test fakes).

use crate::bridge::FullscreenBridge;
use crate::color::Argb;
use crate::error::ScriptError;
use crate::window::{Insets, Orientation, SystemUiFlags};

pub type ScriptResult = Result<String, ScriptError>;

/// Receives the outcome of one script evaluation. May be invoked from a
/// platform callback thread.
pub type ScriptCallback = Box<dyn FnOnce(ScriptResult) + Send + 'static>;

/// The hosted web view.
pub trait WebViewHandle {
    /// Evaluates `script` in the page; `done` is called exactly once.
    fn evaluate(&self, script: &str, done: ScriptCallback);
    fn can_go_back(&self) -> bool;
    fn go_back(&self);
    /// Exposes `bridge` to page script as the global `name`.
    fn add_bridge(&self, name: &str, bridge: FullscreenBridge);
}

/// The window and the container the web view lives in.
pub trait WindowSurface {
    fn content_padding(&self) -> Insets;
    fn set_content_padding(&mut self, padding: Insets);
    fn system_ui_flags(&self) -> SystemUiFlags;
    fn set_system_ui_flags(&mut self, flags: SystemUiFlags);
    fn set_requested_orientation(&mut self, orientation: Orientation);
    fn set_status_bar_color(&mut self, color: Argb);
    fn set_content_background(&mut self, color: Argb);
}

/// Read-only platform facts.
pub trait PlatformInfo {
    fn api_level(&self) -> u32;
    /// Status bar height resource in pixels, if the platform reports one.
    fn status_bar_height_px(&self) -> Option<i32>;
    fn density(&self) -> f32;
}

pub trait HostActivity {
    /// Platform default back behaviour; finishes the activity at the root.
    fn default_back(&mut self);
}
