//! The candidate's static profile
//!
//! Loaded once per request from JSON and never mutated in place;
//! adaptation always produces a derived copy. Keyword sets are stored as
//! ordered sets so intersection scoring is cheap and deterministic.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub bullets: Vec<String>,
    /// Tie-break rank among equally scored experiences; lower comes first.
    pub priority: i32,
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub label: String,
    pub keywords: BTreeSet<String>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub date: String,
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub title: String,
    pub school: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    pub name: String,
    pub level: String,
}

/// A pre-written cover-letter hook, tagged with the keywords it is
/// relevant to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningStatement {
    pub text: String,
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotableProject {
    pub name: String,
    pub description: String,
    pub impact: String,
    pub keywords: BTreeSet<String>,
}

/// A personal project rendered in an optional CV section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalProject {
    pub name: String,
    pub description: String,
    pub technologies: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub personal: PersonalInfo,
    /// Declared headlines, most general first; the first one is the
    /// fallback display title.
    pub titles: Vec<String>,
    pub intro_fr: Option<String>,
    pub intro_en: Option<String>,
    pub experiences: Vec<Experience>,
    pub skills: Vec<SkillGroup>,
    pub certifications: Vec<Certification>,
    pub education: Vec<EducationEntry>,
    pub languages: Vec<LanguageSkill>,
    pub interests: Vec<String>,
    pub opening_statements: Vec<OpeningStatement>,
    pub notable_projects: Vec<NotableProject>,
    pub qualities: Vec<String>,
    pub projects: Vec<PersonalProject>,
}

impl Profile {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile: Profile = serde_json::from_str(&content)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_parses_with_defaults() {
        let json = r#"{
            "personal": {"name": "Jane Doe", "email": "jane@example.com"},
            "titles": ["Data Engineer"],
            "experiences": [
                {
                    "title": "Data Engineer",
                    "company": "Acme",
                    "period": "2021 - 2024",
                    "bullets": ["Built pipelines"],
                    "keywords": ["airflow", "bigquery"]
                }
            ]
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.personal.name, "Jane Doe");
        assert_eq!(profile.experiences.len(), 1);
        assert_eq!(profile.experiences[0].priority, 0);
        assert!(profile.skills.is_empty());
        assert!(profile.opening_statements.is_empty());
    }

    #[test]
    fn test_profile_round_trip() {
        let mut profile = Profile::default();
        profile.personal.name = "Jane Doe".to_string();
        profile.qualities = vec!["rigueur".to_string(), "curiosité".to_string()];

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.personal.name, "Jane Doe");
        assert_eq!(parsed.qualities.len(), 2);
    }
}
