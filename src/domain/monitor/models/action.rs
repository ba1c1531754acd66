use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use ts_rs::TS;

#[derive(TS, Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ActionVerb {
    Start,
    Stop,
    Restart,
}

impl ActionVerb {
    /// The runtime subcommand this verb maps to.
    pub fn subcommand(&self) -> &'static str {
        match self {
            ActionVerb::Start => "start",
            ActionVerb::Stop => "stop",
            ActionVerb::Restart => "restart",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ActionVerb::Start => "started",
            ActionVerb::Stop => "stopped",
            ActionVerb::Restart => "restarted",
        }
    }
}

impl Display for ActionVerb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.subcommand())
    }
}

/// Outcome of a manual container operation. Always well-formed, never an
/// error the HTTP layer has to translate.
#[derive(TS, Deserialize, Serialize, Debug, Clone)]
#[ts(export)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
