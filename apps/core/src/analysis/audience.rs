//! Audience detection: professional, personal or general (broadcast) email.

use std::sync::LazyLock;

use crate::analysis::labels::Audience;
use crate::analysis::pattern::{Cue, CueGroup, PatternClassifier};

/// Pattern-based audience classifier.
pub type AudienceClassifier = PatternClassifier<Audience>;

static PROFESSIONAL_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(dear (mr|mrs|ms|dr|prof)\.?|dear (sir|madam|hiring manager))\b", 2.0),
        Cue::new(r"(?i)\b(regards|sincerely|best wishes|respectfully)\b", 1.0),
        Cue::new(r"(?i)\b(meeting|project|deadline|client|customer account|report|invoice|contract|proposal|budget|quarterly|stakeholders?|deliverables?)\b", 1.0),
        Cue::new(r"(?i)\b(team|colleagues?|manager|department|office|agenda|schedule a call|slides|deck|review)\b", 0.5),
        Cue::new(r"(?i)\b(q[1-4]|eod|eow|kpi|roi|sla|hr)\b", 0.75),
    ]
});

static PERSONAL_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(love you|miss you|xoxo|hugs|xx)\b", 2.0),
        Cue::new(r"(?i)\blove,", 1.5),
        Cue::new(r"(?i)\b(mom|dad|mum|grandma|grandpa|sis|bro|honey|sweetie|babe|buddy)\b", 1.5),
        Cue::new(r"(?i)\b(birthday|weekend|dinner|vacation|holiday|party|wedding|family|kids)\b", 1.0),
        Cue::new(r"(?i)^\s*(hey|hiya|yo)\b", 0.75),
        Cue::new(r"(?i)\b(can'?t wait to see|see you soon|catch up|hang out)\b", 1.0),
    ]
});

static GENERAL_CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    vec![
        Cue::new(r"(?i)\b(hi|hello|dear) (everyone|all|team|folks|friends|members|customers|subscribers)\b", 2.0),
        Cue::new(r"(?i)\b(to whom it may concern|valued customers?|our community|all staff)\b", 2.0),
        Cue::new(r"(?i)\b(newsletter|unsubscribe|subscribers?|announcement|press release|mailing list)\b", 1.5),
        Cue::new(r"(?i)\b(everyone|anyone|all of you|members)\b", 0.75),
    ]
});

impl AudienceClassifier {
    /// Classifier over the built-in English email cues. Emails with no cues
    /// fall back to `general`.
    pub fn email() -> Self {
        PatternClassifier::from_groups(
            "audience-patterns",
            vec![
                CueGroup {
                    label: Audience::Professional,
                    cues: PROFESSIONAL_CUES.clone(),
                },
                CueGroup {
                    label: Audience::Personal,
                    cues: PERSONAL_CUES.clone(),
                },
                CueGroup {
                    label: Audience::General,
                    cues: GENERAL_CUES.clone(),
                },
            ],
            Audience::General,
        )
    }
}

impl Default for AudienceClassifier {
    fn default() -> Self {
        Self::email()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::TextClassifier;

    fn classify(text: &str) -> Audience {
        AudienceClassifier::email().classify(text).unwrap().label
    }

    #[test]
    fn test_professional() {
        assert_eq!(
            classify("Dear Ms. Patel, please find the revised invoice and contract attached. Regards, Tom"),
            Audience::Professional
        );
    }

    #[test]
    fn test_personal() {
        assert_eq!(
            classify("Hey mom, can't wait to see you this weekend for dinner! Love you"),
            Audience::Personal
        );
    }

    #[test]
    fn test_general() {
        assert_eq!(
            classify("Hello everyone, our newsletter is out. Click here to unsubscribe."),
            Audience::General
        );
        assert_eq!(classify("Nothing in particular."), Audience::General);
    }
}
