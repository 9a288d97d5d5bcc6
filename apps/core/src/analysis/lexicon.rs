//! Valence lexicon, intensifiers and negators for the sentiment scorer.
//!
//! Valences are on the usual [-4, 4] human-rated scale. The list is focused on
//! vocabulary that shows up in workplace and personal email.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Increment applied by an intensifier ("very", "extremely").
pub const BOOST_INCREMENT: f64 = 0.293;
/// Decrement applied by a dampener ("slightly", "barely").
pub const BOOST_DECREMENT: f64 = -0.293;
/// Extra weight for an ALL-CAPS sentiment word in mixed-case text.
pub const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier for a negated sentiment word.
pub const NEGATION_SCALAR: f64 = -0.74;

const VALENCES: &[(&str, f64)] = &[
    // Positive
    ("able", 0.8), ("accept", 1.6), ("accepted", 1.1), ("accomplish", 1.8), ("accomplished", 1.9),
    ("achieve", 1.9), ("achievement", 2.1), ("admire", 2.4), ("adorable", 2.2), ("advantage", 1.0),
    ("agree", 1.5), ("agreed", 1.1), ("amazing", 2.8), ("appreciate", 2.1), ("appreciated", 2.3),
    ("appreciation", 2.3), ("approve", 2.0), ("approved", 1.8), ("awesome", 3.1), ("beautiful", 2.9),
    ("benefit", 2.0), ("best", 3.2), ("better", 1.9), ("bless", 1.8), ("brilliant", 2.8),
    ("calm", 1.3), ("care", 2.2), ("celebrate", 2.7), ("certain", 1.1), ("charming", 2.8),
    ("cheer", 2.3), ("cheerful", 2.5), ("clean", 1.7), ("clear", 1.6), ("comfortable", 2.3),
    ("commend", 1.9), ("confident", 2.2), ("congrats", 2.4), ("congratulations", 2.9), ("cool", 1.3),
    ("creative", 1.9), ("delight", 2.9), ("delighted", 2.8), ("eager", 1.5), ("easy", 1.9),
    ("effective", 2.1), ("efficient", 1.8), ("encourage", 2.3), ("energetic", 1.9), ("enjoy", 2.2),
    ("enjoyed", 2.3), ("enthusiastic", 2.2), ("excellent", 2.7), ("excited", 1.4), ("exciting", 2.2),
    ("fabulous", 2.4), ("fair", 1.3), ("fantastic", 2.6), ("favor", 1.7), ("favorite", 2.0),
    ("fine", 0.8), ("fortunate", 1.9), ("free", 2.3), ("friendly", 2.2), ("fun", 2.3),
    ("generous", 2.3), ("glad", 2.0), ("good", 1.9), ("grateful", 2.0), ("great", 3.1),
    ("happy", 2.7), ("help", 1.7), ("helpful", 1.8), ("honest", 2.3), ("hope", 1.9),
    ("hopeful", 1.6), ("hug", 2.1), ("hugs", 2.2), ("ideal", 2.4), ("impressed", 2.1),
    ("impressive", 2.3), ("improve", 1.9), ("improved", 2.1), ("improvement", 2.0), ("incredible", 2.4),
    ("interested", 1.7), ("interesting", 1.7), ("joy", 2.8), ("kind", 2.4), ("kindly", 2.2),
    ("like", 1.5), ("liked", 1.8), ("love", 3.2), ("loved", 2.9), ("lovely", 2.8),
    ("lucky", 1.8), ("nice", 1.8), ("ok", 1.2), ("okay", 0.9), ("opportunity", 1.8),
    ("optimistic", 1.3), ("outstanding", 3.0), ("perfect", 2.7), ("pleasant", 2.3), ("please", 1.3),
    ("pleased", 1.9), ("pleasure", 2.7), ("positive", 2.6), ("productive", 1.7), ("progress", 1.8),
    ("promising", 1.7), ("proud", 2.1), ("ready", 1.5), ("reassure", 1.7), ("recommend", 1.5),
    ("relief", 2.1), ("relieved", 1.6), ("resolve", 1.6), ("resolved", 1.5), ("respect", 2.1),
    ("reward", 2.1), ("safe", 1.9), ("satisfied", 1.8), ("smart", 1.7), ("smile", 1.5),
    ("solid", 1.6), ("solution", 1.3), ("special", 1.7), ("strong", 2.3), ("success", 2.7),
    ("successful", 2.8), ("super", 2.9), ("support", 1.7), ("supportive", 1.2), ("sure", 1.3),
    ("terrific", 3.1), ("thank", 1.5), ("thanks", 1.9), ("thankful", 2.7), ("thoughtful", 1.6),
    ("thrilled", 2.6), ("true", 1.4), ("trust", 2.3), ("useful", 1.9), ("valuable", 2.1),
    ("warm", 0.9), ("welcome", 2.0), ("well", 1.1), ("win", 2.8), ("wonderful", 2.7),
    ("worth", 0.9), ("wow", 2.8), ("yay", 2.4), ("yes", 1.7),
    // Negative
    ("abandon", -1.9), ("absent", -1.1), ("abuse", -3.2), ("afraid", -2.2), ("aggressive", -0.6),
    ("alarm", -1.4), ("angry", -2.3), ("annoyed", -1.6), ("annoying", -1.8), ("anxious", -1.0),
    ("apologize", -0.7), ("argue", -1.4), ("ashamed", -2.1), ("awful", -2.0), ("awkward", -0.6),
    ("bad", -2.5), ("blame", -1.4), ("bored", -1.1), ("boring", -1.3), ("broken", -2.1),
    ("bug", -0.9), ("burden", -1.9), ("cancel", -1.0), ("cancelled", -1.0), ("careless", -1.5),
    ("complain", -1.5), ("complaint", -1.2), ("concern", -0.6), ("concerned", -0.8), ("confused", -1.3),
    ("confusing", -0.9), ("crap", -1.6), ("crisis", -3.1), ("critical", -1.3), ("cry", -2.1),
    ("damage", -2.2), ("damn", -1.7), ("danger", -2.4), ("delay", -1.3), ("delayed", -0.9),
    ("deny", -1.4), ("difficult", -1.5), ("disagree", -1.6), ("disappoint", -1.7), ("disappointed", -1.9),
    ("disappointing", -2.2), ("disaster", -3.1), ("dislike", -1.6), ("dissatisfied", -1.6), ("doubt", -1.5),
    ("dumb", -2.3), ("embarrassed", -1.5), ("error", -1.7), ("fail", -2.3), ("failed", -2.3),
    ("failure", -2.3), ("fault", -1.7), ("fear", -2.2), ("frustrated", -2.4), ("frustrating", -1.9),
    ("furious", -2.7), ("guilty", -1.8), ("harm", -2.5), ("hate", -2.7), ("hated", -3.2),
    ("horrible", -2.5), ("hurt", -2.4), ("ignore", -1.5), ("ignored", -1.3), ("ill", -1.8),
    ("impossible", -1.5), ("inadequate", -1.7), ("inconvenience", -1.5), ("incorrect", -1.2), ("irritated", -2.0),
    ("issue", -0.4), ("lack", -1.3), ("late", -0.8), ("lazy", -1.5), ("lose", -1.7),
    ("loss", -1.3), ("lost", -1.3), ("mad", -2.2), ("mess", -1.5), ("miss", -0.6),
    ("missed", -1.2), ("mistake", -1.4), ("nasty", -2.6), ("neglect", -2.0), ("nervous", -1.1),
    ("no", -1.2), ("overdue", -1.1), ("pain", -2.3), ("panic", -2.3), ("pathetic", -2.8),
    ("poor", -2.1), ("problem", -1.7), ("problems", -1.7), ("reject", -1.7), ("rejected", -2.3),
    ("regret", -1.9), ("rude", -2.0), ("ruin", -2.8), ("sad", -2.1), ("scared", -1.9),
    ("shame", -2.1), ("shocked", -1.3), ("sick", -2.3), ("sorry", -0.3), ("stress", -1.8),
    ("stressed", -1.4), ("stupid", -2.4), ("suck", -1.9), ("sucks", -1.5), ("suffer", -2.5),
    ("terrible", -2.1), ("threat", -2.4), ("tired", -1.9), ("trouble", -1.7), ("ugly", -2.3),
    ("unacceptable", -2.0), ("unclear", -1.0), ("unfair", -2.1), ("unfortunate", -2.0), ("unfortunately", -1.4),
    ("unhappy", -1.8), ("upset", -1.6), ("urgent", -0.8), ("useless", -1.8), ("waste", -1.8),
    ("weak", -1.9), ("worried", -1.2), ("worry", -1.9), ("worse", -2.1), ("worst", -3.1),
    ("wrong", -2.1),
    // Emoticons
    (":)", 2.0), (":-)", 1.3), (":d", 2.3), (";)", 0.9), ("<3", 1.9),
    (":(", -1.9), (":-(", -1.5), (":'(", -2.2), (":/", -1.4),
];

const INTENSIFIERS: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly", "deeply",
    "enormously", "entirely", "especially", "exceptionally", "extremely", "fabulously", "fully",
    "greatly", "highly", "hugely", "incredibly", "intensely", "majorly", "more", "most",
    "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
    "thoroughly", "totally", "tremendously", "truly", "unbelievably", "utterly", "very",
];

const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sorta",
];

const NEGATORS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neednt", "neither", "never", "none", "nope", "nor",
    "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
    "rarely", "seldom", "despite",
];

static VALENCE_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VALENCES.iter().copied().collect());

static BOOSTER_MAP: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    INTENSIFIERS
        .iter()
        .map(|w| (*w, BOOST_INCREMENT))
        .chain(DAMPENERS.iter().map(|w| (*w, BOOST_DECREMENT)))
        .collect()
});

static NEGATOR_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATORS.iter().copied().collect());

/// Valence of a lower-cased token, if it is sentiment-bearing.
pub fn valence(token: &str) -> Option<f64> {
    VALENCE_MAP.get(token).copied()
}

/// Booster scalar of a lower-cased token (positive for intensifiers).
pub fn booster(token: &str) -> Option<f64> {
    BOOSTER_MAP.get(token).copied()
}

/// Whether a lower-cased token negates what follows.
pub fn is_negator(token: &str) -> bool {
    if token.contains("n't") || token.contains("n’t") {
        return true;
    }
    let folded: String = token.chars().filter(|c| *c != '\'' && *c != '’').collect();
    NEGATOR_SET.contains(folded.as_str())
}
