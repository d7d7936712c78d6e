//! The fixed, ordered catalog of behavior alert rules.
//!
//! Built once at startup and shared read-only (`Arc<PatternCatalog>`) by every
//! evaluation. Rule order is priority order: the evaluator stops at the first
//! rule that fires.

use chrono::Duration;

use super::event::ClassificationEvent;
use crate::alert::{AlertLevel, AlertType, BehaviorAlert};
use crate::emotion::{EmotionSet, Intensity, Locale};
use crate::error::CoreError;
use crate::validation::validate_positive;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Trailing window for the repeated-stress rule.
pub const DEFAULT_STRESS_WINDOW_MINS: i64 = 60;

/// Stress signals within the window needed to fire repeated-stress.
pub const DEFAULT_STRESS_THRESHOLD: i64 = 3;

/// Trailing window for the chronic-anxiety rule.
pub const DEFAULT_CHRONIC_WINDOW_HOURS: i64 = 24;

/// Anxiety signals within the window needed to fire chronic-anxiety.
pub const DEFAULT_CHRONIC_THRESHOLD: i64 = 5;

/// Trailing window of the owner's recent-alerts feed.
pub const RECENT_ALERTS_WINDOW_HOURS: i64 = 24;

/// Maximum rows in the owner's recent-alerts feed.
pub const RECENT_ALERTS_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// PatternThresholds
// ---------------------------------------------------------------------------

/// Tunable windows and counts for the history-based rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternThresholds {
    pub stress_window_mins: i64,
    pub stress_threshold: i64,
    pub chronic_window_hours: i64,
    pub chronic_threshold: i64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            stress_window_mins: DEFAULT_STRESS_WINDOW_MINS,
            stress_threshold: DEFAULT_STRESS_THRESHOLD,
            chronic_window_hours: DEFAULT_CHRONIC_WINDOW_HOURS,
            chronic_threshold: DEFAULT_CHRONIC_THRESHOLD,
        }
    }
}

impl PatternThresholds {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.windows().map(|_| ())
    }

    /// Validate every field and return the `(stress, chronic)` windows.
    fn windows(&self) -> Result<(Duration, Duration), CoreError> {
        validate_positive(self.stress_window_mins, "stress_window_mins")?;
        validate_positive(self.stress_threshold, "stress_threshold")?;
        validate_positive(self.chronic_window_hours, "chronic_window_hours")?;
        validate_positive(self.chronic_threshold, "chronic_threshold")?;

        let stress = Duration::try_minutes(self.stress_window_mins)
            .ok_or_else(|| window_too_large("stress_window_mins", self.stress_window_mins))?;
        let chronic = Duration::try_hours(self.chronic_window_hours)
            .ok_or_else(|| window_too_large("chronic_window_hours", self.chronic_window_hours))?;
        Ok((stress, chronic))
    }
}

fn window_too_large(name: &str, value: i64) -> CoreError {
    CoreError::Validation(format!("{name} is too large, got {value}"))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// How a windowed rule selects events from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMatcher {
    /// Exact (case-insensitive) membership in an emotion set, any locale.
    Emotions(EmotionSet),
    /// Substring match on the stored label against per-locale word roots.
    Roots(Vec<String>),
}

/// Evaluation strategy of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Decided from the current event alone; never touches the store.
    Immediate {
        emotions: EmotionSet,
        intensity: Intensity,
    },
    /// Fires when at least `threshold` matching events fall inside the
    /// trailing `window`.
    WindowedCount {
        window: Duration,
        threshold: i64,
        matcher: HistoryMatcher,
    },
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub alert_type: AlertType,
    pub level: AlertLevel,
    pub kind: RuleKind,
}

impl PatternRule {
    /// Whether an immediate rule matches `event`. Always `false` for
    /// windowed rules, which need a store query.
    pub fn matches_event(&self, event: &ClassificationEvent) -> bool {
        match &self.kind {
            RuleKind::Immediate {
                emotions,
                intensity,
            } => {
                event.emotion().is_some_and(|e| emotions.contains(e))
                    && event.intensity == Some(*intensity)
            }
            RuleKind::WindowedCount { .. } => false,
        }
    }

    /// Build the alert this rule raises for `event`.
    pub fn build_alert(&self, event: &ClassificationEvent) -> BehaviorAlert {
        let locale = event.locale();
        let (message, recommendation) = match (&self.kind, self.alert_type) {
            (RuleKind::Immediate { .. }, _) => {
                let label = event
                    .emotional_state
                    .as_ref()
                    .map(|l| l.raw().trim().to_uppercase())
                    .unwrap_or_default();
                (
                    immediate_message(&label, locale),
                    event.owner_recommendation.clone(),
                )
            }
            (RuleKind::WindowedCount { window, .. }, AlertType::RepeatedStress) => (
                repeated_stress_message(*window, locale),
                Some(repeated_stress_advice(locale).to_string()),
            ),
            (
                RuleKind::WindowedCount {
                    window, threshold, ..
                },
                _,
            ) => (
                chronic_anxiety_message(*threshold, *window, locale),
                Some(chronic_anxiety_advice(locale).to_string()),
            ),
        };

        BehaviorAlert {
            level: self.level,
            alert_type: self.alert_type,
            message,
            recommendation,
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

fn immediate_message(label: &str, locale: Locale) -> String {
    match locale {
        Locale::Es => format!("⚠️ {label} con intensidad alta detectado"),
        Locale::En => format!("⚠️ {label} with high intensity detected"),
    }
}

fn repeated_stress_message(window: Duration, locale: Locale) -> String {
    let minutes = window.num_minutes();
    match (locale, minutes) {
        (Locale::Es, 60) => {
            "😰 Tu perro ha mostrado señales de estrés repetidas en la última hora".to_string()
        }
        (Locale::Es, m) => {
            format!("😰 Tu perro ha mostrado señales de estrés repetidas en los últimos {m} minutos")
        }
        (Locale::En, 60) => {
            "😰 Your dog has shown repeated signs of stress in the last hour".to_string()
        }
        (Locale::En, m) => {
            format!("😰 Your dog has shown repeated signs of stress in the last {m} minutes")
        }
    }
}

fn repeated_stress_advice(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => {
            "Considera revisar el entorno. Busca fuentes de estrés como ruidos, cambios o malestar físico."
        }
        Locale::En => {
            "Consider checking the environment. Look for sources of stress such as noise, changes or physical discomfort."
        }
    }
}

fn chronic_anxiety_message(threshold: i64, window: Duration, locale: Locale) -> String {
    let hours = window.num_hours();
    match locale {
        Locale::Es => {
            format!("😟 Tu perro ha mostrado ansiedad {threshold}+ veces en las últimas {hours} horas")
        }
        Locale::En => {
            format!("😟 Your dog has shown anxiety {threshold}+ times in the last {hours} hours")
        }
    }
}

fn chronic_anxiety_advice(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "Patrón de ansiedad elevado. Consulta con un veterinario o etólogo canino.",
        Locale::En => "Elevated anxiety pattern. Consult a veterinarian or canine behaviorist.",
    }
}

// ---------------------------------------------------------------------------
// PatternCatalog
// ---------------------------------------------------------------------------

/// Ordered rule list plus the vocabulary the display query needs.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
    severe: EmotionSet,
}

impl PatternCatalog {
    /// Build the catalog with custom thresholds.
    pub fn new(thresholds: PatternThresholds) -> Result<Self, CoreError> {
        let (stress_window, chronic_window) = thresholds.windows()?;
        Ok(Self::build(thresholds, stress_window, chronic_window))
    }

    fn build(
        thresholds: PatternThresholds,
        stress_window: Duration,
        chronic_window: Duration,
    ) -> Self {
        let severe = EmotionSet::severe();
        let stress = severe.union(&EmotionSet::concern());
        let anxiety_roots = Locale::ALL
            .iter()
            .map(|locale| locale.anxiety_root().to_string())
            .collect();

        let rules = vec![
            PatternRule {
                alert_type: AlertType::ImmediateConcern,
                level: AlertLevel::High,
                kind: RuleKind::Immediate {
                    emotions: severe.clone(),
                    intensity: Intensity::High,
                },
            },
            PatternRule {
                alert_type: AlertType::RepeatedStress,
                level: AlertLevel::Medium,
                kind: RuleKind::WindowedCount {
                    window: stress_window,
                    threshold: thresholds.stress_threshold,
                    matcher: HistoryMatcher::Emotions(stress),
                },
            },
            PatternRule {
                alert_type: AlertType::ChronicAnxiety,
                level: AlertLevel::Medium,
                kind: RuleKind::WindowedCount {
                    window: chronic_window,
                    threshold: thresholds.chronic_threshold,
                    matcher: HistoryMatcher::Roots(anxiety_roots),
                },
            },
        ];

        Self { rules, severe }
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Emotions surfaced by the recent-alerts feed.
    pub fn severe_emotions(&self) -> &EmotionSet {
        &self.severe
    }

    pub fn recent_window(&self) -> Duration {
        Duration::hours(RECENT_ALERTS_WINDOW_HOURS)
    }

    pub fn recent_limit(&self) -> i64 {
        RECENT_ALERTS_LIMIT
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::build(
            PatternThresholds::default(),
            Duration::minutes(DEFAULT_STRESS_WINDOW_MINS),
            Duration::hours(DEFAULT_CHRONIC_WINDOW_HOURS),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
