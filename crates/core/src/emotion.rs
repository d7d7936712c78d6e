//! Canonical vocabulary for classifier output.
//!
//! The audio classifier answers in the language requested by the client, so
//! the same state can arrive as `"asustado"` or `"scared"`. Labels are resolved
//! once into an [`Emotion`] tag plus the [`Locale`] they were written in, and
//! alert predicates only ever compare tags.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Languages the classifier is configured to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Es,
    En,
}

impl Locale {
    /// Every supported locale, in lookup order.
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// Substring shared by the "anxiety" word family in this locale
    /// (`ansioso`, `ansiedad` / `anxious`, `anxiety`).
    pub fn anxiety_root(&self) -> &'static str {
        match self {
            Locale::Es => "ansi",
            Locale::En => "anxi",
        }
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// Emotional states the classifier may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Anxious,
    Calm,
    Excited,
    Scared,
    Alert,
    Playful,
    Painful,
    Aggressive,
    Frustrated,
    Happy,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Anxious,
        Emotion::Calm,
        Emotion::Excited,
        Emotion::Scared,
        Emotion::Alert,
        Emotion::Playful,
        Emotion::Painful,
        Emotion::Aggressive,
        Emotion::Frustrated,
        Emotion::Happy,
    ];

    /// The lowercase label the classifier emits for this state in `locale`.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Emotion::Anxious, Locale::Es) => "ansioso",
            (Emotion::Anxious, Locale::En) => "anxious",
            (Emotion::Calm, Locale::Es) => "tranquilo",
            (Emotion::Calm, Locale::En) => "calm",
            (Emotion::Excited, Locale::Es) => "excitado",
            (Emotion::Excited, Locale::En) => "excited",
            (Emotion::Scared, Locale::Es) => "asustado",
            (Emotion::Scared, Locale::En) => "scared",
            (Emotion::Alert, Locale::Es) => "alerta",
            (Emotion::Alert, Locale::En) => "alert",
            (Emotion::Playful, Locale::Es) => "juguetón",
            (Emotion::Playful, Locale::En) => "playful",
            (Emotion::Painful, Locale::Es) => "dolorido",
            (Emotion::Painful, Locale::En) => "painful",
            (Emotion::Aggressive, Locale::Es) => "agresivo",
            (Emotion::Aggressive, Locale::En) => "aggressive",
            (Emotion::Frustrated, Locale::Es) => "frustrado",
            (Emotion::Frustrated, Locale::En) => "frustrated",
            (Emotion::Happy, Locale::Es) => "feliz",
            (Emotion::Happy, Locale::En) => "happy",
        }
    }

    /// Resolve a raw classifier label (any case, surrounding whitespace
    /// ignored). Returns `None` for labels outside the vocabulary.
    pub fn parse(label: &str) -> Option<(Emotion, Locale)> {
        let normalized = label.trim().to_lowercase();
        Self::ALL.iter().find_map(|emotion| {
            Locale::ALL
                .iter()
                .find(|locale| emotion.label(**locale) == normalized)
                .map(|locale| (*emotion, *locale))
        })
    }
}

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

/// Ordinal intensity of a vocalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Low, Intensity::Medium, Intensity::High];

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Intensity::Low, Locale::Es) => "baja",
            (Intensity::Low, Locale::En) => "low",
            (Intensity::Medium, Locale::Es) => "media",
            (Intensity::Medium, Locale::En) => "medium",
            (Intensity::High, Locale::Es) => "alta",
            (Intensity::High, Locale::En) => "high",
        }
    }

    /// Parse a localized intensity label, case-insensitively.
    pub fn parse(label: &str) -> Option<Intensity> {
        let normalized = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|intensity| {
            Locale::ALL
                .iter()
                .any(|locale| intensity.label(*locale) == normalized)
        })
    }

    /// Every localized spelling of this intensity, for store-side matching.
    pub fn labels(&self) -> Vec<String> {
        Locale::ALL
            .iter()
            .map(|locale| self.label(*locale).to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// EmotionLabel
// ---------------------------------------------------------------------------

/// A classifier label together with its resolution against the vocabulary.
///
/// The raw text is kept because alert messages echo it back to the owner in
/// the language it was produced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionLabel {
    raw: String,
    resolved: Option<(Emotion, Locale)>,
}

impl EmotionLabel {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let resolved = Emotion::parse(&raw);
        Self { raw, resolved }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `None` when the label is not part of the known vocabulary.
    pub fn emotion(&self) -> Option<Emotion> {
        self.resolved.map(|(emotion, _)| emotion)
    }

    pub fn locale(&self) -> Option<Locale> {
        self.resolved.map(|(_, locale)| locale)
    }
}

// ---------------------------------------------------------------------------
// EmotionSet
// ---------------------------------------------------------------------------

/// A fixed group of emotions a rule matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionSet(Vec<Emotion>);

impl EmotionSet {
    pub fn new(emotions: impl IntoIterator<Item = Emotion>) -> Self {
        let mut members: Vec<Emotion> = Vec::new();
        for emotion in emotions {
            if !members.contains(&emotion) {
                members.push(emotion);
            }
        }
        Self(members)
    }

    /// Pain, fear and aggression: urgent on their own.
    pub fn severe() -> Self {
        Self::new([Emotion::Painful, Emotion::Scared, Emotion::Aggressive])
    }

    /// Anxiety and frustration: worth tracking, not urgent alone.
    pub fn concern() -> Self {
        Self::new([Emotion::Anxious, Emotion::Frustrated])
    }

    pub fn union(&self, other: &EmotionSet) -> Self {
        Self::new(self.0.iter().chain(other.0.iter()).copied())
    }

    pub fn contains(&self, emotion: Emotion) -> bool {
        self.0.contains(&emotion)
    }

    pub fn members(&self) -> &[Emotion] {
        &self.0
    }

    /// Lowercase labels for every member in every locale.
    pub fn labels(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|emotion| {
                Locale::ALL
                    .iter()
                    .map(move |locale| emotion.label(*locale).to_string())
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
