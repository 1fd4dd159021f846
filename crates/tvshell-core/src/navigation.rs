//! Back-input resolution.
//!
//! A back press is handled in two phases on the UI thread: [`on_back`]
//! sends the probe to the page and returns at once; the reply comes back
//! as a [`UiTask::ProbeCompleted`] and [`complete`] decides whether the
//! activity should leave. Only one probe is in flight at a time.
//!
//! [`on_back`]: NavigationResolver::on_back
//! [`complete`]: NavigationResolver::complete

use web_time::{Duration, Instant};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::host::{HostActivity, ScriptResult, WebViewHandle};
use crate::probe::{NavigationQueryResult, ProbeTable};
use crate::ui::{UiHandle, UiTask};

/// What `on_back` did with the press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackDisposition {
    /// Probe sent; the reply will arrive as a UI task with this id.
    Probing(u64),
    /// A probe is still outstanding; the press was dropped.
    Ignored,
    /// No web view attached; default back navigation ran.
    FellThrough,
}

struct PendingProbe {
    id: u64,
    sent_at: Instant,
}

pub struct NavigationResolver {
    script: String,
    pending: Option<PendingProbe>,
    next_id: u64,
    history_fallback: bool,
    timeout: Option<Duration>,
}

impl NavigationResolver {
    pub fn new(table: &ProbeTable) -> Self {
        Self {
            script: table.compile(),
            pending: None,
            next_id: 1,
            history_fallback: false,
            timeout: None,
        }
    }

    pub fn from_config(cfg: &ShellConfig) -> Result<Self, ShellError> {
        let table = ProbeTable::from_config(&cfg.probe)?;
        Ok(Self::new(&table)
            .with_history_fallback(cfg.history_fallback)
            .with_timeout(cfg.probe_timeout()))
    }

    pub fn with_history_fallback(mut self, enabled: bool) -> Self {
        self.history_fallback = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn is_probing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn on_back(
        &mut self,
        web: Option<&dyn WebViewHandle>,
        ui: &UiHandle,
        host: &mut dyn HostActivity,
    ) -> BackDisposition {
        let Some(web) = web else {
            log::debug!("back: no web view attached, using default navigation");
            host.default_back();
            return BackDisposition::FellThrough;
        };
        if let Some(p) = &self.pending {
            log::debug!("back: probe #{} still pending, ignoring press", p.id);
            return BackDisposition::Ignored;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(PendingProbe {
            id,
            sent_at: Instant::now(),
        });
        log::debug!("back: sending probe #{id}");

        let ui = ui.clone();
        web.evaluate(
            &self.script,
            Box::new(move |result| ui.post(UiTask::ProbeCompleted { id, result })),
        );
        BackDisposition::Probing(id)
    }

    /// Handles the reply to probe `id`. Returns `None` when the reply is
    /// stale (no longer the pending probe).
    pub fn complete(
        &mut self,
        id: u64,
        result: ScriptResult,
        web: Option<&dyn WebViewHandle>,
        host: &mut dyn HostActivity,
    ) -> Option<NavigationQueryResult> {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            log::debug!("back: dropping stale reply for probe #{id}");
            return None;
        }
        self.pending = None;

        let outcome = match result {
            Ok(raw) => NavigationQueryResult::parse(&raw),
            Err(e) => {
                log::warn!("back: probe #{id} failed ({e}), treating as exit");
                NavigationQueryResult::ExitRequested
            }
        };
        log::debug!("back: probe #{id} -> {}", outcome.tag());

        if outcome.is_exit() {
            self.leave(web, host);
        }
        Some(outcome)
    }

    /// Gives up on a probe that has waited longer than the configured
    /// timeout, resolving it as exit.
    pub fn check_timeout(
        &mut self,
        now: Instant,
        web: Option<&dyn WebViewHandle>,
        host: &mut dyn HostActivity,
    ) -> Option<NavigationQueryResult> {
        let timeout = self.timeout?;
        let waited = now.duration_since(self.pending.as_ref()?.sent_at);
        if waited < timeout {
            return None;
        }
        if let Some(p) = self.pending.take() {
            log::warn!("back: probe #{} unanswered after {waited:?}, treating as exit", p.id);
        }
        self.leave(web, host);
        Some(NavigationQueryResult::ExitRequested)
    }

    fn leave(&self, web: Option<&dyn WebViewHandle>, host: &mut dyn HostActivity) {
        if self.history_fallback
            && let Some(web) = web
            && web.can_go_back()
        {
            log::debug!("back: going back in web history");
            web.go_back();
            return;
        }
        log::info!("back: leaving activity");
        host.default_back();
    }
}
