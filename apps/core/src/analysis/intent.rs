//! Email intent classification using regex cues.
//!
//! Fast pattern-based detection of follow-ups, requests and informational
//! emails. No model download required.

use std::sync::LazyLock;

use crate::analysis::labels::Intent;
use crate::analysis::pattern::{Cue, CueGroup, PatternClassifier};

/// Pattern-based intent classifier.
pub type IntentClassifier = PatternClassifier<Intent>;

static FOLLOW_UP_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(following up|follow(ing)?[- ]up on|just following)\b", 2.0),
        Cue::new(r"(?i)\b(checking in|circling back|touch(ing)? base|bump(ing)? this)\b", 2.0),
        Cue::new(r"(?i)\b(any updates?|any news|haven'?t heard back|did you (get|see|have a chance))\b", 1.5),
        Cue::new(r"(?i)\b(reminder|as a reminder|gentle reminder|friendly reminder)\b", 1.5),
        Cue::new(r"(?i)\b(my (last|previous|earlier) (email|message)|as (mentioned|discussed) (earlier|before|last))\b", 1.0),
        Cue::new(r"(?i)\b(still waiting|still need|re:)\b", 0.75),
    ]
});

static REQUEST_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(could|can|would|will) you\b", 1.5),
        Cue::new(r"(?i)\b(please|kindly|pls)\b", 1.0),
        Cue::new(r"(?i)\b(let me know|get back to me|send (me|over)|share (the|your))\b", 1.0),
        Cue::new(r"(?i)\b(i need|we need|need you to|i'?d like you to|requesting|request that)\b", 1.0),
        Cue::new(r"(?i)\b(are you (able|available)|is it possible|would it be possible)\b", 1.0),
        Cue::new(r"\?", 0.75),
    ]
});

static INFORM_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(fyi|for your information|heads[- ]up)\b", 2.0),
        Cue::new(r"(?i)\b(wanted to let you know|just to let you know|letting you know|happy to (announce|share)|pleased to (announce|inform))\b", 1.5),
        Cue::new(r"(?i)\b(please note|note that|be advised|this is to inform)\b", 1.0),
        Cue::new(r"(?i)\b(has been|have been|is now|are now) (scheduled|completed|approved|released|updated|moved|published|shipped)\b", 1.0),
        Cue::new(r"(?i)\b(attached (is|are|you will find)|i'?ve attached|see attached|announce(ment)?|update on)\b", 1.0),
        Cue::new(r"(?i)\b(this is (just )?(a )?(quick )?test)\b", 1.0),
    ]
});

impl IntentClassifier {
    /// Classifier over the built-in English email cues. Emails with no cues
    /// fall back to `inform`.
    pub fn email() -> Self {
        PatternClassifier::from_groups(
            "intent-patterns",
            vec![
                CueGroup {
                    label: Intent::FollowUp,
                    cues: FOLLOW_UP_CUES.clone(),
                },
                CueGroup {
                    label: Intent::Request,
                    cues: REQUEST_CUES.clone(),
                },
                CueGroup {
                    label: Intent::Inform,
                    cues: INFORM_CUES.clone(),
                },
            ],
            Intent::Inform,
        )
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::email()
    }
}
