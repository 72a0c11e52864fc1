//! The normalized job posting record
//!
//! Retrieval and markup parsing happen outside this crate; a scraper hands
//! us this record as JSON. Fields it could not fill default to empty, and
//! `finalize` computes the keyword set and language tag locally when the
//! scraper did not supply them. After finalization the posting is treated
//! as read-only for the rest of the request.

use crate::analysis::keywords::KeywordExtractor;
use crate::analysis::language::{self, Language, StatisticalDetector};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// LaTeX `\definecolor` component list, e.g. `30, 60, 114`.
    pub fn to_latex(&self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }
}

/// Dominant colors extracted from the employer's logo by an external
/// collaborator. Used only as a rendering parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub primary: Rgb,
    pub secondary: Rgb,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub raw_text: String,
    pub contract_type: String,
    pub salary: String,
    pub keywords: BTreeSet<String>,
    pub language: Option<Language>,
    pub logo_url: Option<String>,
    pub colors: Option<ColorPair>,
}

impl JobPosting {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let posting: JobPosting = serde_json::from_str(&content)?;
        Ok(posting)
    }

    /// Fill derived fields the scraper left empty. Keywords come from the
    /// fixed vocabulary, the language tag from the tiered classifier over
    /// the description (falling back to the full page text).
    pub fn finalize(
        mut self,
        extractor: &KeywordExtractor,
        detector: Option<&dyn StatisticalDetector>,
    ) -> Self {
        if self.raw_text.is_empty() {
            self.raw_text = self.description.to_lowercase();
        }
        if self.keywords.is_empty() {
            self.keywords = extractor.extract(&self.raw_text);
        }
        if self.language.is_none() {
            let basis = if self.description.is_empty() {
                &self.raw_text
            } else {
                &self.description
            };
            self.language = Some(language::classify(basis, detector));
        }
        self
    }

    pub fn language(&self) -> Language {
        self.language.unwrap_or(Language::Fr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::Vocabulary;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let posting: JobPosting = serde_json::from_str(r#"{"title": "Data Engineer"}"#).unwrap();
        assert_eq!(posting.title, "Data Engineer");
        assert!(posting.company.is_empty());
        assert!(posting.keywords.is_empty());
        assert!(posting.language.is_none());
        assert!(posting.colors.is_none());
    }

    #[test]
    fn test_finalize_fills_keywords_and_language() {
        let extractor = KeywordExtractor::new(&Vocabulary::default()).unwrap();
        let posting = JobPosting {
            description: "Nous recherchons un profil data pour notre équipe, \
                          compétences Python et Airflow"
                .to_string(),
            ..JobPosting::default()
        };

        let finalized = posting.finalize(&extractor, None);
        assert!(finalized.keywords.contains("python"));
        assert!(finalized.keywords.contains("airflow"));
        assert_eq!(finalized.language, Some(Language::Fr));
    }

    #[test]
    fn test_finalize_preserves_scraper_supplied_analysis() {
        let extractor = KeywordExtractor::new(&Vocabulary::default()).unwrap();
        let mut posting = JobPosting::default();
        posting.raw_text = "python everywhere".to_string();
        posting.keywords.insert("terraform".to_string());
        posting.language = Some(Language::En);

        let finalized = posting.finalize(&extractor, None);
        assert_eq!(finalized.keywords.len(), 1);
        assert!(finalized.keywords.contains("terraform"));
        assert_eq!(finalized.language, Some(Language::En));
    }
}
