//! Fixed-vocabulary keyword extraction
//!
//! The vocabulary is data, not code: a default table ships with the binary
//! and a JSON file can replace it without touching any logic. Matching is
//! pure case-insensitive substring containment, no stemming and no token
//! boundaries, so the extractor never fails and empty input yields an
//! empty set.

use crate::error::{CvTailorError, Result};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Domain-grouped term lists tested against posting text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub categories: Vec<VocabularyCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyCategory {
    pub name: String,
    pub terms: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "cloud",
                &[
                    "gcp", "google cloud", "aws", "azure", "cloud", "kubernetes", "docker",
                    "terraform",
                ],
            ),
            (
                "data-engineering",
                &[
                    "bigquery", "big query", "airflow", "kafka", "spark", "hadoop", "dataflow",
                    "pub/sub", "etl", "elt", "pipeline", "data pipeline", "dbt", "fivetran",
                    "airbyte",
                ],
            ),
            (
                "databases",
                &[
                    "sql", "nosql", "postgresql", "postgres", "mysql", "mongodb", "redis",
                    "elasticsearch", "snowflake", "redshift", "databricks",
                ],
            ),
            (
                "languages",
                &["python", "java", "scala", "go", "golang", "bash", "shell", "r"],
            ),
            (
                "machine-learning",
                &[
                    "machine learning", "deep learning", "nlp", "tensorflow", "pytorch",
                    "scikit-learn", "hugging face", "bert", "llm", "ia", "ai", "vertex ai",
                    "mlops",
                ],
            ),
            (
                "visualization",
                &[
                    "power bi", "tableau", "looker", "lookml", "metabase", "data visualization",
                    "dashboard", "semantic layer", "bi", "reporting",
                ],
            ),
            ("methodology", &["agile", "scrum", "devops", "ci/cd", "git"]),
            (
                "governance",
                &[
                    "data quality", "data governance", "gouvernance", "qualité des données",
                    "rgpd", "gdpr", "data catalog", "metadata", "lineage",
                ],
            ),
            (
                "soft-skills",
                &["anglais", "english", "communication", "équipe", "team"],
            ),
        ];

        Vocabulary {
            categories: table
                .iter()
                .map(|(name, terms)| VocabularyCategory {
                    name: name.to_string(),
                    terms: terms.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let vocabulary: Vocabulary = serde_json::from_str(&content)?;
        Ok(vocabulary)
    }

    /// All terms, lowercased, across every category.
    pub fn all_terms(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.terms.iter().map(|t| t.to_lowercase()))
            .collect()
    }
}

/// Substring matcher over the vocabulary.
pub struct KeywordExtractor {
    matcher: AhoCorasick,
    terms: Vec<String>,
}

impl KeywordExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let terms = vocabulary.all_terms();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&terms)
            .map_err(|e| {
                CvTailorError::Configuration(format!("Failed to build keyword matcher: {}", e))
            })?;

        Ok(Self { matcher, terms })
    }

    /// Returns the set of vocabulary terms found as substrings of `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for mat in self.matcher.find_overlapping_iter(text) {
            found.insert(self.terms[mat.pattern().as_usize()].clone());
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_extraction_is_case_insensitive() {
        let found = extractor().extract("We use Python, BigQuery and AIRFLOW daily");
        assert!(found.contains("python"));
        assert!(found.contains("bigquery"));
        assert!(found.contains("airflow"));
    }

    #[test]
    fn test_output_is_subset_of_vocabulary() {
        let vocabulary = Vocabulary::default();
        let all: BTreeSet<String> = vocabulary.all_terms().into_iter().collect();
        let found = extractor().extract("python sql kafka nonsense wordsoup dbt scrum");
        assert!(found.is_subset(&all));
    }

    #[test]
    fn test_idempotent_on_repeated_calls() {
        let ex = extractor();
        let text = "spark spark spark kafka elt pipeline";
        assert_eq!(ex.extract(text), ex.extract(text));
    }

    #[test]
    fn test_substring_containment_without_boundaries() {
        // "bi" is found inside "bigquery"; that is the documented contract.
        let found = extractor().extract("bigquery");
        assert!(found.contains("bigquery"));
        assert!(found.contains("bi"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_custom_vocabulary_round_trip() {
        let vocabulary = Vocabulary::default();
        let json = serde_json::to_string(&vocabulary).unwrap();
        let parsed: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.categories.len(), vocabulary.categories.len());
    }
}
