//! Drives the headless shell through a viewing session: open a show from
//! search, pick an episode, go fullscreen, then back out to exit.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tvshell_core::*;
use tvshell_platform::headless::{self, HeadlessShell, SimDisplay, SimPage};

#[derive(Parser)]
#[command(name = "tv_shell_sim")]
#[command(about = "Run a scripted viewing session against the headless TV shell")]
struct Args {
    /// JSON shell config; defaults are used when omitted
    config: Option<PathBuf>,
    /// Platform API level reported by the simulated display
    #[arg(long, default_value_t = 35)]
    api_level: u32,
}

fn press_back(shell: &mut HeadlessShell) {
    let disposition = shell.on_back_pressed();
    let outcomes = shell.pump();
    log::info!("back -> {disposition:?} {outcomes:?}");
}

fn bridge(shell: &mut HeadlessShell, method: &str) {
    let name = shell.config().bridge_name.clone();
    if let Some(web) = shell.web_view() {
        web.page().call_bridge(&name, method);
    }
    shell.pump();
    let w = shell.window();
    log::info!(
        "{name}.{method}() -> {:?}, padding top {}, orientation {}",
        shell.presentation().mode(),
        w.padding.top,
        w.orientation.as_raw()
    );
}

fn main() -> anyhow::Result<()> {
    tvshell_platform::init_logging();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => tvshell_platform::load_config(path)?,
        None => ShellConfig::default(),
    };
    let detail_flag = config.probe.detail_flag.clone();
    let player_fullscreen = config.probe.player_fullscreen.clone();

    let mut page = SimPage::tv_app_for(&config.probe);
    page.set(&config.probe.search_flag, json!(true));
    page.set(&detail_flag, json!(true));
    page.mount(&config.probe.popup_trigger_id);
    page.mount(&config.probe.popup_id);

    let mut shell = headless::start(config, SimDisplay::tv(args.api_level), page)?;

    bridge(&mut shell, "enter");
    if let Some(web) = shell.web_view() {
        web.page().set(&player_fullscreen, json!(true));
    }

    // popup, then detail (cancelling the player), then search, then exit
    while !shell.host().finished() {
        press_back(&mut shell);
        if shell.presentation().mode() == PresentationMode::Immersive
            && shell
                .web_view()
                .is_some_and(|w| !w.page().get(&detail_flag).as_bool().unwrap_or(false))
        {
            bridge(&mut shell, "exit");
        }
    }

    println!(
        "session finished after {} default back navigation(s)",
        shell.host().default_backs
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let args = Args::try_parse_from(["tv_shell_sim"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.api_level, 35);
    }

    #[test]
    fn config_path_and_api_level() {
        let args =
            Args::try_parse_from(["tv_shell_sim", "shell.json", "--api-level", "30"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("shell.json")));
        assert_eq!(args.api_level, 30);
    }

    #[test]
    fn non_numeric_api_level_is_a_usage_error() {
        let err = Args::try_parse_from(["tv_shell_sim", "--api-level", "abc"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
