//! Window-level model: system UI visibility flags, orientation requests,
//! content padding, and the per-window presentation state.

use bitflags::bitflags;

use crate::host::PlatformInfo;

bitflags! {
    /// System UI visibility bits. Values match the platform's
    /// `SYSTEM_UI_FLAG_*` constants so hosts can pass them through unchanged.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SystemUiFlags: u32 {
        const LOW_PROFILE            = 0x0000_0001;
        const HIDE_NAVIGATION        = 0x0000_0002;
        const FULLSCREEN             = 0x0000_0004;
        const LAYOUT_STABLE          = 0x0000_0100;
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        const LAYOUT_FULLSCREEN      = 0x0000_0400;
        const IMMERSIVE              = 0x0000_0800;
        const IMMERSIVE_STICKY       = 0x0000_1000;
        const LIGHT_STATUS_BAR       = 0x0000_2000;
    }
}

impl SystemUiFlags {
    /// Hides status and navigation bars and lays content out underneath them.
    pub const IMMERSIVE_MODE: SystemUiFlags = SystemUiFlags::IMMERSIVE_STICKY
        .union(SystemUiFlags::FULLSCREEN)
        .union(SystemUiFlags::HIDE_NAVIGATION)
        .union(SystemUiFlags::LAYOUT_STABLE)
        .union(SystemUiFlags::LAYOUT_HIDE_NAVIGATION)
        .union(SystemUiFlags::LAYOUT_FULLSCREEN);

    /// Cleared on exit; layout bits stay so content does not jump.
    pub const REVEAL_MASK: SystemUiFlags = SystemUiFlags::FULLSCREEN
        .union(SystemUiFlags::HIDE_NAVIGATION)
        .union(SystemUiFlags::IMMERSIVE_STICKY);
}

/// Requested screen orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Unspecified,
    SensorLandscape,
}

impl Orientation {
    /// Platform `SCREEN_ORIENTATION_*` value.
    pub fn as_raw(self) -> i32 {
        match self {
            Orientation::Unspecified => -1,
            Orientation::SensorLandscape => 6,
        }
    }
}

/// Padding of the container hosting the web view, in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    pub fn with_top(self, top: i32) -> Self {
        Insets { top, ..self }
    }
}

/// Whether the platform draws content under the system bars, and how much
/// padding compensates for it.
#[derive(Clone, Debug)]
pub struct InsetCompensation {
    required: bool,
    fallback_dp: f32,
    top_px: Option<i32>,
}

impl InsetCompensation {
    /// Fixed for the process lifetime: edge-to-edge is enforced from
    /// `min_api` onwards.
    pub fn detect(platform: &dyn PlatformInfo, min_api: u32, fallback_dp: f32) -> Self {
        Self {
            required: platform.api_level() >= min_api,
            fallback_dp,
            top_px: None,
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    /// Top padding in pixels, computed on first use. `None` when no
    /// compensation applies on this platform.
    pub fn top_inset(&mut self, platform: &dyn PlatformInfo) -> Option<i32> {
        if !self.required {
            return None;
        }
        if self.top_px.is_none() {
            let px = match platform.status_bar_height_px() {
                Some(h) if h > 0 => h,
                _ => (self.fallback_dp * platform.density()) as i32,
            };
            log::debug!("top inset resolved to {px}px");
            self.top_px = Some(px);
        }
        self.top_px
    }

    /// Value computed so far, without triggering the lookup.
    pub fn resolved(&self) -> Option<i32> {
        self.top_px
    }
}

/// State owned by the presentation controller. Only mutated on
/// enter/exit transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostWindowState {
    pub immersive_active: bool,
    pub top_inset_px: i32,
    pub inset_compensation_required: bool,
    pub orientation_locked: bool,
}
