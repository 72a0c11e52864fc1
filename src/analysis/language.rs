//! Posting-language classification
//!
//! Job postings mix languages: French offers are full of English technical
//! vocabulary, which fools naive statistical detection. The classifier is
//! therefore tiered, first rule that fires wins:
//!
//! 1. Strong French signals (words essentially absent from English
//!    postings) reaching 3 decide French immediately.
//! 2. Strong English signals reaching 2 decide English, unless French
//!    strong signals also reached 2, in which case French is preferred.
//! 3. An optional statistical detector over a bounded prefix; a French
//!    strong-signal count of 2 overrides a detector verdict of English.
//! 4. Word-frequency counting over broader lists, English winning only by
//!    a margin greater than 3; otherwise French.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Fr => write!(f, "Français"),
            Language::En => write!(f, "English"),
        }
    }
}

/// Optional general-purpose language detector used by tier 3. The default
/// pipeline runs without one; the tiered rules alone are sufficient.
pub trait StatisticalDetector {
    fn detect(&self, text: &str) -> Option<Language>;
}

/// How much of the text a statistical detector sees.
const DETECTOR_PREFIX_CHARS: usize = 3000;

const STRONG_FRENCH: &[&str] = &[
    "vous", "nous", "votre", "notre", "être", "avoir", "poste", "rejoindre", "rejoignez",
    "postuler", "télétravail", "salaire", "candidature", "contrat", "équipe", "entreprise",
    "missions", "avantages", "profil recherché", "ce que nous offrons", "vos missions",
];

const STRONG_ENGLISH: &[&str] = &[
    "you will", "we are", "you are", "your role", "responsibilities", "requirements",
    "about us", "what we offer", "who you are", "what you'll do",
];

const FRENCH_WORDS: &[&str] = &[
    "poste", "vous", "nous", "équipe", "entreprise", "rejoindre", "candidature", "profil",
    "missions", "avantages", "salaire", "expérience", "compétences", "formation",
    "télétravail", "votre", "notre", "être", "avoir", "pour", "dans", "avec",
];

const ENGLISH_WORDS: &[&str] = &[
    "you", "we", "team", "company", "join", "application", "profile", "responsibilities",
    "benefits", "salary", "experience", "skills", "education", "remote", "role", "your",
    "our", "about", "will", "with",
];

/// Margin the English word count must exceed the French one by in tier 4.
const FREQUENCY_MARGIN: usize = 3;

fn count_signals(haystack: &str, signals: &[&str]) -> usize {
    signals.iter().filter(|w| haystack.contains(*w)).count()
}

/// Classify the posting's language. Never fails; empty text defaults to
/// French.
pub fn classify(text: &str, detector: Option<&dyn StatisticalDetector>) -> Language {
    if text.is_empty() {
        return Language::Fr;
    }

    let lower = text.to_lowercase();

    let french_strong = count_signals(&lower, STRONG_FRENCH);
    if french_strong >= 3 {
        return Language::Fr;
    }

    let english_strong = count_signals(&lower, STRONG_ENGLISH);
    if english_strong >= 2 {
        // Cross-validation: shared technical vocabulary produces English
        // false positives inside French postings.
        if french_strong >= 2 {
            return Language::Fr;
        }
        return Language::En;
    }

    if let Some(detector) = detector {
        let prefix: String = lower.chars().take(DETECTOR_PREFIX_CHARS).collect();
        match detector.detect(&prefix) {
            Some(Language::Fr) => return Language::Fr,
            Some(Language::En) => {
                // The local strong signal beats the statistical guess.
                if french_strong >= 2 {
                    return Language::Fr;
                }
                return Language::En;
            }
            None => {}
        }
    }

    // Final fallback: bounded word-frequency count over broader lists.
    let padded = format!(" {} ", lower);
    let french_count = FRENCH_WORDS
        .iter()
        .filter(|w| padded.contains(&format!(" {} ", w)))
        .count();
    let english_count = ENGLISH_WORDS
        .iter()
        .filter(|w| padded.contains(&format!(" {} ", w)))
        .count();

    if english_count > french_count + FREQUENCY_MARGIN {
        Language::En
    } else {
        Language::Fr
    }
}
