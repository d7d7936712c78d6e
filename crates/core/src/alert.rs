//! Behavior alert types produced by the pattern evaluator.

use serde::Serialize;

/// Severity of a behavior alert. Absence of an alert is modelled as `None`,
/// never as a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Needs the owner's attention now; triggers out-of-band notification.
    High,
    /// A pattern worth surfacing, shown in-app only.
    Medium,
}

/// Which pattern produced the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// A single severe vocalization at high intensity.
    ImmediateConcern,
    /// Several stress signals within a short window.
    RepeatedStress,
    /// Anxiety recurring across a long window.
    ChronicAnxiety,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ImmediateConcern => "immediate_concern",
            AlertType::RepeatedStress => "repeated_stress",
            AlertType::ChronicAnxiety => "chronic_anxiety",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a matched pattern for one classification event.
///
/// Alerts are never stored; they are recomputed from event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehaviorAlert {
    pub level: AlertLevel,
    /// Serialized as `type` to match the client payload.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Owner-facing summary, in the language of the triggering label.
    pub message: String,
    /// What the owner should do. For immediate alerts this is the
    /// classifier's own advice and may be missing.
    pub recommendation: Option<String>,
}
