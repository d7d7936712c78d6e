//! The classification event as seen by the alert rules.

use crate::emotion::{Emotion, EmotionLabel, Intensity, Locale};

/// One interpreted audio sample, reduced to what the rules inspect.
///
/// Built at the boundary from whatever the classifier returned; labels that
/// fall outside the vocabulary are kept but never match a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationEvent {
    pub emotional_state: Option<EmotionLabel>,
    pub intensity: Option<Intensity>,
    /// Advice the classifier produced for the owner, echoed by immediate alerts.
    pub owner_recommendation: Option<String>,
}

impl ClassificationEvent {
    /// Build an event from raw classifier labels.
    ///
    /// An unparseable intensity is treated as absent.
    pub fn from_labels(
        emotional_state: Option<&str>,
        intensity: Option<&str>,
        owner_recommendation: Option<String>,
    ) -> Self {
        Self {
            emotional_state: emotional_state.map(EmotionLabel::new),
            intensity: intensity.and_then(Intensity::parse),
            owner_recommendation,
        }
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.emotional_state.as_ref().and_then(EmotionLabel::emotion)
    }

    /// Language used for alert messages. Spanish unless the label resolved
    /// to another locale.
    pub fn locale(&self) -> Locale {
        self.emotional_state
            .as_ref()
            .and_then(EmotionLabel::locale)
            .unwrap_or(Locale::Es)
    }
}
