use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::color::Argb;
use crate::error::ShellError;
use crate::probe::{ProbeTable, ScriptPath};

/// Names the back-navigation probe reads from the embedded app. Paths are
/// relative to `app_global`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub app_global: String,
    pub popup_id: String,
    pub popup_trigger_id: String,
    pub detail_flag: String,
    pub player_fullscreen: String,
    pub fullscreen_cancel: String,
    pub fullscreen_cancel_arg: String,
    pub close_detail: String,
    pub search_flag: String,
    pub go_home: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            app_global: "vueApp".into(),
            popup_id: "episode-popup".into(),
            popup_trigger_id: "episode-trigger".into(),
            detail_flag: "showDetail".into(),
            player_fullscreen: "dp.fullScreen".into(),
            fullscreen_cancel: "dp.fullScreen.cancel".into(),
            fullscreen_cancel_arg: "web".into(),
            close_detail: "closeDetail".into(),
            search_flag: "isSearching".into(),
            go_home: "goHome".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Global name the fullscreen bridge is exposed under in page script.
    pub bridge_name: String,
    /// First API level that enforces edge-to-edge drawing.
    pub edge_to_edge_min_api: u32,
    /// Status bar height in dp used when the platform reports none.
    pub fallback_status_bar_dp: f32,
    pub chrome_color: Argb,
    /// On exit, go back in web history first when there is any.
    pub history_fallback: bool,
    /// Resolve a probe that got no reply within this many ms as exit.
    /// `None` waits forever.
    pub probe_timeout_ms: Option<u64>,
    pub probe: ProbeConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            bridge_name: "AndroidFullscreen".into(),
            edge_to_edge_min_api: 35,
            fallback_status_bar_dp: 24.0,
            chrome_color: Argb::CHROME_DARK,
            history_fallback: false,
            probe_timeout_ms: None,
            probe: ProbeConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Parses and validates. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ShellError> {
        let cfg: ShellConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ShellError> {
        ScriptPath::parse(&self.bridge_name)?;
        ProbeTable::from_config(&self.probe)?;
        Ok(())
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = ShellConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ShellConfig::default());
        assert_eq!(cfg.probe_timeout(), None);
    }

    #[test]
    fn partial_overrides() {
        let cfg = ShellConfig::from_json(
            r##"{
                "chrome_color": "#202020",
                "history_fallback": true,
                "probe_timeout_ms": 1500,
                "probe": { "search_flag": "searching" }
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.chrome_color, Argb(0xFF20_2020));
        assert!(cfg.history_fallback);
        assert_eq!(cfg.probe_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(cfg.probe.search_flag, "searching");
        assert_eq!(cfg.probe.app_global, "vueApp");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ShellConfig::from_json(r#"{"bridge_name": "Android Fullscreen"}"#),
            Err(ShellError::InvalidPath(_))
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{"chrome_color": "nope"}"#),
            Err(ShellError::Config(_))
        ));
        assert!(matches!(
            ShellConfig::from_json(r###"{"chrome_color": "##141414"}"###),
            Err(ShellError::Config(_))
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{"probe": {"go_home": "go-home"}}"#),
            Err(ShellError::InvalidPath(_))
        ));
    }
}
