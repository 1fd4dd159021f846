//! Windowed / immersive presentation toggle.
//!
//! Every transition writes absolute target values (padding, flags,
//! orientation) instead of adjusting the current ones, so repeated
//! `enter()` or `exit()` calls converge on the same window state.

use crate::host::{PlatformInfo, WindowSurface};
use crate::window::{HostWindowState, InsetCompensation, Orientation, SystemUiFlags};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationMode {
    #[default]
    Windowed,
    Immersive,
}

pub struct PresentationController {
    compensation: InsetCompensation,
    state: HostWindowState,
}

impl PresentationController {
    /// Resolves the top inset up front (when compensation applies) so the
    /// windowed target is fixed before any transition runs.
    pub fn new(mut compensation: InsetCompensation, platform: &dyn PlatformInfo) -> Self {
        let state = HostWindowState {
            inset_compensation_required: compensation.required(),
            top_inset_px: compensation.top_inset(platform).unwrap_or(0),
            ..Default::default()
        };
        Self {
            compensation,
            state,
        }
    }

    pub fn state(&self) -> HostWindowState {
        self.state
    }

    pub fn mode(&self) -> PresentationMode {
        if self.state.immersive_active {
            PresentationMode::Immersive
        } else {
            PresentationMode::Windowed
        }
    }

    pub fn compensation_required(&self) -> bool {
        self.compensation.required()
    }

    /// Applies the windowed top padding when the web view container is first
    /// attached. No-op on platforms that need no compensation.
    pub fn attach(&self, window: &mut dyn WindowSurface) {
        self.apply_windowed_padding(window);
    }

    pub fn enter(&mut self, window: &mut dyn WindowSurface) {
        if self.compensation.required() {
            let padding = window.content_padding().with_top(0);
            window.set_content_padding(padding);
        }
        window.set_system_ui_flags(SystemUiFlags::IMMERSIVE_MODE);
        window.set_requested_orientation(Orientation::SensorLandscape);

        self.state.immersive_active = true;
        self.state.orientation_locked = true;
        log::debug!("presentation: immersive");
    }

    pub fn exit(&mut self, window: &mut dyn WindowSurface) {
        self.apply_windowed_padding(window);
        let flags = window.system_ui_flags().difference(SystemUiFlags::REVEAL_MASK);
        window.set_system_ui_flags(flags);
        window.set_requested_orientation(Orientation::Unspecified);

        self.state.immersive_active = false;
        self.state.orientation_locked = false;
        log::debug!("presentation: windowed");
    }

    fn apply_windowed_padding(&self, window: &mut dyn WindowSurface) {
        if self.compensation.required() {
            let padding = window.content_padding().with_top(self.state.top_inset_px);
            window.set_content_padding(padding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;
    use crate::window::Insets;

    #[derive(Default)]
    struct Window {
        padding: Insets,
        flags: SystemUiFlags,
        orientation: Orientation,
        padding_writes: u32,
    }

    impl WindowSurface for Window {
        fn content_padding(&self) -> Insets {
            self.padding
        }
        fn set_content_padding(&mut self, padding: Insets) {
            self.padding_writes += 1;
            self.padding = padding;
        }
        fn system_ui_flags(&self) -> SystemUiFlags {
            self.flags
        }
        fn set_system_ui_flags(&mut self, flags: SystemUiFlags) {
            self.flags = flags;
        }
        fn set_requested_orientation(&mut self, orientation: Orientation) {
            self.orientation = orientation;
        }
        fn set_status_bar_color(&mut self, _color: Argb) {}
        fn set_content_background(&mut self, _color: Argb) {}
    }

    struct Platform(u32);

    impl PlatformInfo for Platform {
        fn api_level(&self) -> u32 {
            self.0
        }
        fn status_bar_height_px(&self) -> Option<i32> {
            Some(63)
        }
        fn density(&self) -> f32 {
            2.625
        }
    }

    fn controller(platform: &Platform) -> PresentationController {
        PresentationController::new(InsetCompensation::detect(platform, 35, 24.0), platform)
    }

    fn attached(api: u32) -> (PresentationController, Window) {
        let platform = Platform(api);
        let ctl = controller(&platform);
        let mut window = Window {
            padding: Insets {
                left: 4,
                top: 0,
                right: 4,
                bottom: 8,
            },
            flags: SystemUiFlags::LAYOUT_STABLE,
            ..Default::default()
        };
        ctl.attach(&mut window);
        (ctl, window)
    }

    #[test]
    fn attach_applies_top_inset() {
        let (ctl, window) = attached(35);
        assert_eq!(window.padding.top, 63);
        assert_eq!(window.padding.left, 4);
        assert_eq!(ctl.state().top_inset_px, 63);
        assert_eq!(ctl.mode(), PresentationMode::Windowed);
    }

    #[test]
    fn enter_hides_chrome_and_locks_landscape() {
        let (mut ctl, mut window) = attached(35);
        ctl.enter(&mut window);
        assert_eq!(window.padding.top, 0);
        assert_eq!(window.padding.bottom, 8);
        assert_eq!(window.flags, SystemUiFlags::IMMERSIVE_MODE);
        assert_eq!(window.orientation, Orientation::SensorLandscape);
        assert_eq!(ctl.mode(), PresentationMode::Immersive);
        assert!(ctl.state().orientation_locked);
    }

    #[test]
    fn enter_then_exit_restores_windowed_values() {
        let (mut ctl, mut window) = attached(35);
        let padding_before = window.padding;
        let state_before = ctl.state();

        ctl.enter(&mut window);
        ctl.exit(&mut window);

        assert_eq!(window.padding, padding_before);
        assert_eq!(window.orientation, Orientation::Unspecified);
        assert_eq!(ctl.state(), state_before);
    }

    #[test]
    fn exit_keeps_unrelated_flags() {
        let (mut ctl, mut window) = attached(35);
        ctl.enter(&mut window);
        window.flags |= SystemUiFlags::LOW_PROFILE;
        ctl.exit(&mut window);
        assert_eq!(
            window.flags,
            SystemUiFlags::LOW_PROFILE
                | SystemUiFlags::LAYOUT_STABLE
                | SystemUiFlags::LAYOUT_HIDE_NAVIGATION
                | SystemUiFlags::LAYOUT_FULLSCREEN
        );
    }

    #[test]
    fn enter_twice_is_same_as_once() {
        let (mut once, mut w1) = attached(35);
        once.enter(&mut w1);

        let (mut twice, mut w2) = attached(35);
        twice.enter(&mut w2);
        twice.enter(&mut w2);

        assert_eq!(w1.padding, w2.padding);
        assert_eq!(w1.flags, w2.flags);
        assert_eq!(w1.orientation, w2.orientation);
        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn exit_twice_is_same_as_once() {
        let (mut ctl, mut window) = attached(35);
        ctl.enter(&mut window);
        ctl.exit(&mut window);
        let snapshot = (window.padding, window.flags, window.orientation, ctl.state());
        ctl.exit(&mut window);
        assert_eq!(
            snapshot,
            (window.padding, window.flags, window.orientation, ctl.state())
        );
    }

    #[test]
    fn older_platforms_never_touch_padding() {
        let (mut ctl, mut window) = attached(34);
        ctl.enter(&mut window);
        ctl.exit(&mut window);
        assert_eq!(window.padding_writes, 0);
        assert_eq!(window.padding.top, 0);
        assert!(!ctl.state().inset_compensation_required);
        assert_eq!(window.orientation, Orientation::Unspecified);
    }

    #[test]
    fn construction_fixes_state_before_attach() {
        let platform = Platform(35);
        let ctl = controller(&platform);
        assert_eq!(ctl.state().top_inset_px, 63);

        let mut window = Window::default();
        let before = ctl.state();
        ctl.attach(&mut window);
        assert_eq!(ctl.state(), before);
        assert_eq!(window.padding.top, 63);
    }

    #[test]
    fn round_trip_before_attach_keeps_state() {
        let platform = Platform(35);
        let mut ctl = controller(&platform);
        let mut window = Window::default();
        let before = ctl.state();

        ctl.enter(&mut window);
        ctl.exit(&mut window);

        assert_eq!(ctl.state(), before);
        assert_eq!(window.padding.top, 63);
        assert_eq!(window.orientation, Orientation::Unspecified);
    }
}
