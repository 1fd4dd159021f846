use thiserror::Error;

/// Failure reported by the web view while evaluating an injected script.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script threw: {0}")]
    Threw(String),
    #[error("web view detached before the script result arrived")]
    Detached,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid script identifier path '{0}'")]
    InvalidPath(String),
    #[error("invalid element id '{0}'")]
    InvalidElementId(String),
    #[error("no probe rule with outcome {0:?}")]
    UnknownRule(crate::NavigationQueryResult),
    #[error("invalid colour '{0}'")]
    InvalidColor(String),
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}
