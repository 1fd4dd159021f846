//! In-memory host: a page model standing in for the embedded app, plus a
//! window, display and activity that record what the controller did.
//!
//! [`SimWebView`] does not run JavaScript. It answers the probe by walking
//! the same [`ProbeTable`] the script was compiled from, against a
//! `serde_json::Value` model of the app global, with the semantics the
//! compiled script has in a browser.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use tvshell_core::*;

type Method = Box<dyn FnMut(&mut Value, &[Value]) -> Result<(), String> + Send>;

/// Page state visible to the probe.
#[derive(Default)]
pub struct SimPage {
    /// The app global (`window.vueApp` by default). `Null` when the app
    /// has not booted.
    pub app: Value,
    /// Ids of mounted elements.
    pub elements: BTreeSet<String>,
    pub focused: Option<String>,
    /// Web history depth behind the current entry.
    pub history: u32,
    /// When set, the page never answers script evaluations.
    pub hung: bool,
    /// When set, evaluation fails with this message before the probe runs.
    pub throws: Option<String>,
    /// Method paths called, in order, including ones that threw.
    pub calls: Vec<String>,
    pub(crate) methods: HashMap<String, Method>,
    pub(crate) bridge: Option<(String, FullscreenBridge)>,
}

impl SimPage {
    /// The TV app at its home screen: no overlay, no detail, no search.
    pub fn tv_app() -> Self {
        Self::tv_app_for(&ProbeConfig::default())
    }

    /// Same app, with flags and methods named as in `cfg`.
    pub fn tv_app_for(cfg: &ProbeConfig) -> Self {
        let mut page = SimPage {
            app: Value::Object(Default::default()),
            ..Default::default()
        };
        page.set(&cfg.detail_flag, Value::Bool(false));
        page.set(&cfg.search_flag, Value::Bool(false));
        page.set(&cfg.player_fullscreen, Value::Bool(false));

        let detail = cfg.detail_flag.clone();
        page.define(&cfg.close_detail, move |app, _| {
            set_path(app, &detail, Value::Bool(false));
            Ok(())
        });
        let search = cfg.search_flag.clone();
        page.define(&cfg.go_home, move |app, _| {
            set_path(app, &search, Value::Bool(false));
            Ok(())
        });
        let player = cfg.player_fullscreen.clone();
        page.define(&cfg.fullscreen_cancel, move |app, _| {
            set_path(app, &player, Value::Bool(false));
            Ok(())
        });
        page
    }

    pub fn define(
        &mut self,
        path: &str,
        f: impl FnMut(&mut Value, &[Value]) -> Result<(), String> + Send + 'static,
    ) {
        self.methods.insert(path.to_string(), Box::new(f));
    }

    /// Sets a value at a dotted path under the app global, creating
    /// intermediate objects.
    pub fn set(&mut self, path: &str, value: Value) {
        set_path(&mut self.app, path, value);
    }

    pub fn get(&self, path: &str) -> &Value {
        path.split('.').fold(&self.app, |v, seg| &v[seg])
    }

    pub fn mount(&mut self, id: &str) {
        self.elements.insert(id.to_string());
    }

    /// Page script calling the registered bridge, e.g.
    /// `window.AndroidFullscreen.enter()`. Returns false if no bridge is
    /// registered under `name`.
    pub fn call_bridge(&self, name: &str, method: &str) -> bool {
        match &self.bridge {
            Some((registered, bridge)) if registered == name => {
                bridge.invoke(method);
                true
            }
            _ => false,
        }
    }

    fn truthy(&self, path: &ScriptPath) -> bool {
        let v = path
            .segments()
            .iter()
            .fold(&self.app, |v, seg| &v[seg.as_str()]);
        match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn call(&mut self, method: &ScriptPath, args: &[Value]) -> Result<(), String> {
        let name = method.to_string();
        self.calls.push(name.clone());
        let mut f = self
            .methods
            .remove(&name)
            .ok_or_else(|| format!("TypeError: {name} is not a function"))?;
        let result = f(&mut self.app, args);
        self.methods.insert(name, f);
        result
    }

    fn holds(&self, when: &Predicate) -> bool {
        match when {
            Predicate::ElementPresent(id) => self.elements.contains(id),
            Predicate::AppFlag(path) => !self.app.is_null() && self.truthy(path),
        }
    }

    /// Walks the table like the compiled script does. An uncaught throw
    /// yields the exit tag.
    fn run_probe(&mut self, table: &ProbeTable) -> NavigationQueryResult {
        for rule in table.rules() {
            if !self.holds(&rule.when) {
                continue;
            }
            for action in &rule.actions {
                match action {
                    Action::RemoveElement(id) => {
                        self.elements.remove(id);
                    }
                    Action::Focus(id) => {
                        if self.elements.contains(id) {
                            self.focused = Some(id.clone());
                        }
                    }
                    Action::BestEffortCall {
                        guard,
                        method,
                        args,
                    } => {
                        if guard.as_ref().is_none_or(|g| self.truthy(g))
                            && let Err(e) = self.call(method, args)
                        {
                            log::debug!("page: swallowed {e}");
                        }
                    }
                    Action::Call { method, args } => {
                        if let Err(e) = self.call(method, args) {
                            log::debug!("page: probe threw {e}");
                            return NavigationQueryResult::ExitRequested;
                        }
                    }
                }
            }
            return rule.outcome;
        }
        NavigationQueryResult::ExitRequested
    }
}

fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut slot = root;
    for seg in path.split('.') {
        if !slot.is_object() {
            *slot = Value::Object(Default::default());
        }
        slot = &mut slot[seg];
    }
    *slot = value;
}

/// Web view handle over a shared [`SimPage`].
#[derive(Clone)]
pub struct SimWebView {
    page: Arc<Mutex<SimPage>>,
    table: Arc<ProbeTable>,
    script: Arc<str>,
    held: Arc<Mutex<Vec<ScriptCallback>>>,
}

impl SimWebView {
    pub fn new(page: SimPage, table: ProbeTable) -> Self {
        let script = table.compile();
        Self {
            page: Arc::new(Mutex::new(page)),
            table: Arc::new(table),
            script: script.into(),
            held: Default::default(),
        }
    }

    pub fn from_config(page: SimPage, cfg: &ProbeConfig) -> Result<Self, ShellError> {
        Ok(Self::new(page, ProbeTable::from_config(cfg)?))
    }

    pub fn page(&self) -> parking_lot::MutexGuard<'_, SimPage> {
        self.page.lock()
    }

    /// Callbacks withheld while the page was hung.
    pub fn held_replies(&self) -> usize {
        self.held.lock().len()
    }

    /// Delivers `result` to the oldest withheld callback.
    pub fn release_held(&self, result: ScriptResult) -> bool {
        let cb = {
            let mut held = self.held.lock();
            if held.is_empty() {
                return false;
            }
            held.remove(0)
        };
        cb(result);
        true
    }
}

impl WebViewHandle for SimWebView {
    fn evaluate(&self, script: &str, done: ScriptCallback) {
        let mut page = self.page.lock();
        if page.hung {
            self.held.lock().push(done);
            return;
        }
        if let Some(msg) = page.throws.clone() {
            drop(page);
            done(Err(ScriptError::Threw(msg)));
            return;
        }
        if script != &*self.script {
            drop(page);
            done(Err(ScriptError::Threw("unsupported script".into())));
            return;
        }
        let outcome = page.run_probe(&self.table);
        drop(page);
        done(Ok(Value::from(outcome.tag()).to_string()));
    }

    fn can_go_back(&self) -> bool {
        self.page.lock().history > 0
    }

    fn go_back(&self) {
        let mut page = self.page.lock();
        page.history = page.history.saturating_sub(1);
    }

    fn add_bridge(&self, name: &str, bridge: FullscreenBridge) {
        self.page.lock().bridge = Some((name.to_string(), bridge));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimWindow {
    pub padding: Insets,
    pub flags: SystemUiFlags,
    pub orientation: Orientation,
    pub status_bar_color: Option<Argb>,
    pub background: Option<Argb>,
    pub padding_writes: u32,
}

impl WindowSurface for SimWindow {
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
    fn set_status_bar_color(&mut self, color: Argb) {
        self.status_bar_color = Some(color);
    }
    fn set_content_background(&mut self, color: Argb) {
        self.background = Some(color);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SimDisplay {
    pub api_level: u32,
    pub status_bar_px: Option<i32>,
    pub density: f32,
}

impl SimDisplay {
    /// A 1080p TV box on a recent release.
    pub fn tv(api_level: u32) -> Self {
        Self {
            api_level,
            status_bar_px: Some(48),
            density: 2.0,
        }
    }
}

impl PlatformInfo for SimDisplay {
    fn api_level(&self) -> u32 {
        self.api_level
    }
    fn status_bar_height_px(&self) -> Option<i32> {
        self.status_bar_px
    }
    fn density(&self) -> f32 {
        self.density
    }
}

#[derive(Debug, Default)]
pub struct SimActivity {
    pub default_backs: u32,
}

impl SimActivity {
    pub fn finished(&self) -> bool {
        self.default_backs > 0
    }
}

impl HostActivity for SimActivity {
    fn default_back(&mut self) {
        log::info!("activity: default back navigation");
        self.default_backs += 1;
    }
}

pub type HeadlessShell = crate::ShellActivity<SimWebView, SimWindow, SimDisplay, SimActivity>;

/// Creates and starts a shell over `page` with the given display.
pub fn start(
    config: ShellConfig,
    display: SimDisplay,
    page: SimPage,
) -> anyhow::Result<HeadlessShell> {
    let web = SimWebView::from_config(page, &config.probe)?;
    let mut shell = HeadlessShell::on_create(
        config,
        SimWindow::default(),
        display,
        SimActivity::default(),
    )?;
    shell.on_start(web);
    Ok(shell)
}
