//! Back-navigation probe: an ordered table of "close one layer" rules,
//! compiled into a single expression evaluated in the page.
//!
//! Rules are checked top to bottom; the first whose predicate holds runs its
//! actions and reports its outcome. When none match the page reports
//! `"exit"`. A new layer (another modal type, say) is added by inserting a
//! rule at the right priority.

use smallvec::SmallVec;

use crate::config::ProbeConfig;
use crate::error::ShellError;

/// Outcome of one back press as reported by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationQueryResult {
    PopupClosed,
    DetailClosed,
    WentHome,
    ExitRequested,
}

impl NavigationQueryResult {
    pub fn tag(self) -> &'static str {
        match self {
            NavigationQueryResult::PopupClosed => "closed_popup",
            NavigationQueryResult::DetailClosed => "closed_detail",
            NavigationQueryResult::WentHome => "went_home",
            NavigationQueryResult::ExitRequested => "exit",
        }
    }

    /// Reads a probe reply. Web views hand back the value JSON-encoded
    /// (`"\"went_home\""`); bare tags are accepted too. Anything
    /// unrecognised, including `null`, means exit.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let decoded = serde_json::from_str::<String>(raw);
        let tag = decoded.as_deref().unwrap_or(raw);
        match tag {
            "closed_popup" => NavigationQueryResult::PopupClosed,
            "closed_detail" => NavigationQueryResult::DetailClosed,
            "went_home" => NavigationQueryResult::WentHome,
            _ => NavigationQueryResult::ExitRequested,
        }
    }

    pub fn is_exit(self) -> bool {
        self == NavigationQueryResult::ExitRequested
    }
}

/// Dotted property path of plain identifiers, e.g. `dp.fullScreen.cancel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptPath(SmallVec<[String; 4]>);

impl ScriptPath {
    pub fn parse(path: &str) -> Result<Self, ShellError> {
        let segments: SmallVec<[String; 4]> = path.split('.').map(str::to_string).collect();
        if segments.iter().all(|s| is_identifier(s)) {
            Ok(ScriptPath(segments))
        } else {
            Err(ShellError::InvalidPath(path.to_string()))
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// `root.a.b`
    fn access(&self, root: &str) -> String {
        let mut out = root.to_string();
        for s in &self.0 {
            out.push('.');
            out.push_str(s);
        }
        out
    }

    /// `root&&root.a&&root.a.b`: falsy instead of throwing when a link is
    /// missing.
    fn guarded(&self, root: &str) -> String {
        let mut out = root.to_string();
        let mut prefix = root.to_string();
        for s in &self.0 {
            prefix.push('.');
            prefix.push_str(s);
            out.push_str("&&");
            out.push_str(&prefix);
        }
        out
    }
}

impl std::fmt::Display for ScriptPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn check_element_id(id: &str) -> Result<String, ShellError> {
    if !id.is_empty() && !id.chars().any(char::is_whitespace) {
        Ok(id.to_string())
    } else {
        Err(ShellError::InvalidElementId(id.to_string()))
    }
}

/// Condition read from the page. App paths are relative to the app global.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    ElementPresent(String),
    AppFlag(ScriptPath),
}

/// Side effect performed by a matching rule, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    RemoveElement(String),
    /// Focuses the element if it exists.
    Focus(String),
    /// Calls `method` when `guard` is truthy; a throw is swallowed.
    BestEffortCall {
        guard: Option<ScriptPath>,
        method: ScriptPath,
        args: Vec<serde_json::Value>,
    },
    /// Calls `method`; a throw aborts the probe, which then reports exit.
    Call {
        method: ScriptPath,
        args: Vec<serde_json::Value>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeRule {
    pub outcome: NavigationQueryResult,
    pub when: Predicate,
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug)]
pub struct ProbeTable {
    app_global: ScriptPath,
    rules: SmallVec<[ProbeRule; 4]>,
}

const APP: &str = "app";

impl ProbeTable {
    pub fn new(app_global: ScriptPath) -> Self {
        Self {
            app_global,
            rules: SmallVec::new(),
        }
    }

    /// Overlay, then detail view, then search results.
    pub fn from_config(cfg: &ProbeConfig) -> Result<Self, ShellError> {
        let mut table = ProbeTable::new(ScriptPath::parse(&cfg.app_global)?);
        let popup = check_element_id(&cfg.popup_id)?;
        table.push(ProbeRule {
            outcome: NavigationQueryResult::PopupClosed,
            when: Predicate::ElementPresent(popup.clone()),
            actions: vec![
                Action::RemoveElement(popup),
                Action::Focus(check_element_id(&cfg.popup_trigger_id)?),
            ],
        });
        table.push(ProbeRule {
            outcome: NavigationQueryResult::DetailClosed,
            when: Predicate::AppFlag(ScriptPath::parse(&cfg.detail_flag)?),
            actions: vec![
                Action::BestEffortCall {
                    guard: Some(ScriptPath::parse(&cfg.player_fullscreen)?),
                    method: ScriptPath::parse(&cfg.fullscreen_cancel)?,
                    args: vec![cfg.fullscreen_cancel_arg.clone().into()],
                },
                Action::Call {
                    method: ScriptPath::parse(&cfg.close_detail)?,
                    args: Vec::new(),
                },
            ],
        });
        table.push(ProbeRule {
            outcome: NavigationQueryResult::WentHome,
            when: Predicate::AppFlag(ScriptPath::parse(&cfg.search_flag)?),
            actions: vec![Action::Call {
                method: ScriptPath::parse(&cfg.go_home)?,
                args: Vec::new(),
            }],
        });
        Ok(table)
    }

    pub fn app_global(&self) -> &ScriptPath {
        &self.app_global
    }

    pub fn rules(&self) -> &[ProbeRule] {
        &self.rules
    }

    /// Appends at the lowest priority (still above the implicit exit).
    pub fn push(&mut self, rule: ProbeRule) {
        self.rules.push(rule);
    }

    /// Inserts `rule` directly above the first rule reporting `outcome`.
    pub fn insert_before(
        &mut self,
        outcome: NavigationQueryResult,
        rule: ProbeRule,
    ) -> Result<(), ShellError> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.outcome == outcome)
            .ok_or(ShellError::UnknownRule(outcome))?;
        self.rules.insert(idx, rule);
        Ok(())
    }

    /// Renders the table as one self-invoking expression returning an
    /// outcome tag. Any throw outside a best-effort call yields `"exit"`.
    pub fn compile(&self) -> String {
        let mut js = String::from("(function(){try{");
        js.push_str(&format!(
            "var {APP}={};",
            self.app_global.guarded("window")
        ));
        for rule in &self.rules {
            js.push_str("if(");
            js.push_str(&render_predicate(&rule.when));
            js.push_str("){");
            for action in &rule.actions {
                js.push_str(&render_action(action));
            }
            js.push_str(&format!("return {};}}", quote(rule.outcome.tag())));
        }
        js.push_str(&format!(
            "return {0};}}catch(e){{return {0};}}}})()",
            quote(NavigationQueryResult::ExitRequested.tag())
        ));
        js
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn element(id: &str) -> String {
    format!("document.getElementById({})", quote(id))
}

fn call_args(args: &[serde_json::Value]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",")
}

fn render_predicate(p: &Predicate) -> String {
    match p {
        Predicate::ElementPresent(id) => element(id),
        Predicate::AppFlag(path) => path.guarded(APP),
    }
}

fn render_action(a: &Action) -> String {
    match a {
        Action::RemoveElement(id) => format!(
            "(function(n){{if(n&&n.parentNode){{n.parentNode.removeChild(n);}}}})({});",
            element(id)
        ),
        Action::Focus(id) => format!(
            "(function(n){{if(n&&n.focus){{n.focus();}}}})({});",
            element(id)
        ),
        Action::BestEffortCall {
            guard,
            method,
            args,
        } => {
            let call = format!(
                "try{{{}({});}}catch(e){{}}",
                method.access(APP),
                call_args(args)
            );
            match guard {
                Some(g) => format!("if({}){{{call}}}", g.guarded(APP)),
                None => call,
            }
        }
        Action::Call { method, args } => {
            format!("{}({});", method.access(APP), call_args(args))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> ProbeTable {
        ProbeTable::from_config(&ProbeConfig::default()).unwrap()
    }

    #[test]
    fn parses_quoted_and_bare_tags() {
        use NavigationQueryResult::*;
        assert_eq!(NavigationQueryResult::parse("\"closed_popup\""), PopupClosed);
        assert_eq!(NavigationQueryResult::parse("closed_detail"), DetailClosed);
        assert_eq!(NavigationQueryResult::parse(" \"went_home\"\n"), WentHome);
        assert_eq!(NavigationQueryResult::parse("\"exit\""), ExitRequested);
    }

    #[test]
    fn unknown_replies_mean_exit() {
        for raw in ["null", "", "\"closed\"", "none", "42", "{}"] {
            assert!(NavigationQueryResult::parse(raw).is_exit(), "{raw}");
        }
    }

    #[test]
    fn script_path_rejects_non_identifiers() {
        assert!(ScriptPath::parse("dp.fullScreen.cancel").is_ok());
        assert!(ScriptPath::parse("$store._state").is_ok());
        for bad in ["", "a..b", "1abc", "a.b()", "a;alert(1)", "a b"] {
            assert!(ScriptPath::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn default_rules_in_priority_order() {
        let outcomes: Vec<_> = default_table().rules().iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                NavigationQueryResult::PopupClosed,
                NavigationQueryResult::DetailClosed,
                NavigationQueryResult::WentHome,
            ]
        );
    }

    #[test]
    fn compiled_script_checks_layers_in_order() {
        let js = default_table().compile();
        let popup = js.find("closed_popup").unwrap();
        let detail = js.find("closed_detail").unwrap();
        let home = js.find("went_home").unwrap();
        assert!(popup < detail && detail < home);
        assert!(js.starts_with("(function(){try{var app=window&&window.vueApp;"));
        assert!(js.ends_with("return \"exit\";}catch(e){return \"exit\";}})()"));
    }

    #[test]
    fn fullscreen_cancel_is_guarded_and_swallowed() {
        let js = default_table().compile();
        assert!(js.contains(
            "if(app&&app.dp&&app.dp.fullScreen){try{app.dp.fullScreen.cancel(\"web\");}catch(e){}}app.closeDetail();"
        ));
    }

    #[test]
    fn popup_rule_removes_then_refocuses() {
        let js = default_table().compile();
        let remove = js.find("removeChild").unwrap();
        let focus = js.find("n.focus()").unwrap();
        assert!(remove < focus);
        assert!(js.contains("document.getElementById(\"episode-trigger\")"));
    }

    #[test]
    fn insert_before_places_new_layer() {
        let mut table = default_table();
        let rule = ProbeRule {
            outcome: NavigationQueryResult::PopupClosed,
            when: Predicate::ElementPresent("settings-sheet".into()),
            actions: vec![Action::RemoveElement("settings-sheet".into())],
        };
        table
            .insert_before(NavigationQueryResult::DetailClosed, rule.clone())
            .unwrap();
        assert_eq!(table.rules()[1], rule);
        assert_eq!(table.rules().len(), 4);
    }

    #[test]
    fn insert_before_missing_outcome_fails() {
        let mut table = ProbeTable::new(ScriptPath::parse("vueApp").unwrap());
        let rule = ProbeRule {
            outcome: NavigationQueryResult::WentHome,
            when: Predicate::AppFlag(ScriptPath::parse("x").unwrap()),
            actions: Vec::new(),
        };
        assert!(matches!(
            table.insert_before(NavigationQueryResult::DetailClosed, rule),
            Err(ShellError::UnknownRule(NavigationQueryResult::DetailClosed))
        ));
    }

    #[test]
    fn string_arguments_are_escaped() {
        let cfg = ProbeConfig {
            fullscreen_cancel_arg: "we\"b".into(),
            ..Default::default()
        };
        let js = ProbeTable::from_config(&cfg).unwrap().compile();
        assert!(js.contains("cancel(\"we\\\"b\")"));
    }

    #[test]
    fn bad_config_identifiers_are_rejected() {
        let cfg = ProbeConfig {
            close_detail: "closeDetail()".into(),
            ..Default::default()
        };
        assert!(matches!(
            ProbeTable::from_config(&cfg),
            Err(ShellError::InvalidPath(_))
        ));
        let cfg = ProbeConfig {
            popup_id: "".into(),
            ..Default::default()
        };
        assert!(matches!(
            ProbeTable::from_config(&cfg),
            Err(ShellError::InvalidElementId(_))
        ));
    }
}
