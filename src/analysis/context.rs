//! Employer-context derivation
//!
//! Each `JobContext` field is derived independently by presence-testing
//! small keyword lists against the posting's raw text; only the tone is
//! implied by the detected company type. Absent signals leave fields at
//! their documented defaults, so analysis never fails.

use crate::input::posting::JobPosting;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyType {
    Startup,
    ScaleUp,
    LargeGroup,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Professional,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemotePolicy {
    FullRemote,
    Hybrid,
    Unspecified,
}

/// Coarse classification of the employer, used to flavor composed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    pub company_type: CompanyType,
    pub tone: Tone,
    pub team_size: Option<u32>,
    pub remote_policy: RemotePolicy,
    pub values: Vec<String>,
    pub tech_stack: Vec<String>,
    pub challenges: Vec<String>,
    pub growth_stage: Option<String>,
}

impl Default for JobContext {
    fn default() -> Self {
        Self {
            company_type: CompanyType::Unspecified,
            tone: Tone::Professional,
            team_size: None,
            remote_policy: RemotePolicy::Unspecified,
            values: Vec::new(),
            tech_stack: Vec::new(),
            challenges: Vec::new(),
            growth_stage: None,
        }
    }
}

const STARTUP_WORDS: &[&str] = &["startup", "early stage", "seed", "série a"];
const SCALEUP_WORDS: &[&str] = &[
    "scale-up", "scaleup", "série b", "série c", "hyper-croissance", "forte croissance",
];
const LARGE_GROUP_WORDS: &[&str] = &[
    "groupe", "filiale", "cac 40", "grand compte", "leader mondial",
];

const STACK_TOKENS: &[&str] = &[
    "bigquery", "snowflake", "databricks", "airflow", "dbt", "spark", "kafka", "python",
    "sql", "terraform", "docker", "kubernetes", "aws", "gcp", "azure", "looker", "tableau",
    "power bi", "dataflow",
];

const VALUE_TABLE: &[(&str, &[&str])] = &[
    ("innovation", &["innovation", "innover", "disruption", "révolutionne"]),
    ("collaboration", &["collaboration", "équipe", "ensemble", "collectif"]),
    ("excellence", &["excellence", "exigence", "qualité", "rigueur"]),
    ("impact", &["impact", "différence", "transformation", "changer"]),
    ("croissance", &["croissance", "ambition", "scale", "développement"]),
    ("bienveillance", &["bienveillance", "humain", "bien-être", "care"]),
];

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

impl JobContext {
    /// Pure function of the posting text; deterministic and recomputable.
    pub fn analyze(posting: &JobPosting) -> Self {
        let raw = posting.raw_text.to_lowercase();
        let mut context = JobContext::default();

        if contains_any(&raw, STARTUP_WORDS) {
            context.company_type = CompanyType::Startup;
            context.tone = Tone::Casual;
        } else if contains_any(&raw, SCALEUP_WORDS) {
            context.company_type = CompanyType::ScaleUp;
            context.tone = Tone::Casual;
        } else if contains_any(&raw, LARGE_GROUP_WORDS) {
            context.company_type = CompanyType::LargeGroup;
            context.tone = Tone::Formal;
        }

        if raw.contains("french tech") || raw.contains("next 40") || raw.contains("next 120") {
            context.growth_stage = Some("French Tech".to_string());
        }

        // "team of N" in either language.
        if let Ok(pattern) = Regex::new(r"(?:équipe|team)\s+(?:data\s+)?(?:de\s+|of\s+)?(\d+)") {
            if let Some(captures) = pattern.captures(&raw) {
                context.team_size = captures[1].parse().ok();
            }
        }

        if contains_any(&raw, &["full remote", "100% remote", "télétravail total"]) {
            context.remote_policy = RemotePolicy::FullRemote;
        } else if contains_any(&raw, &["télétravail", "remote", "hybride", "hybrid"]) {
            context.remote_policy = RemotePolicy::Hybrid;
        }

        context.tech_stack = STACK_TOKENS
            .iter()
            .filter(|t| raw.contains(*t))
            .map(|t| t.to_string())
            .collect();

        context.values = VALUE_TABLE
            .iter()
            .filter(|(_, triggers)| contains_any(&raw, triggers))
            .map(|(value, _)| value.to_string())
            .collect();

        if raw.contains("challenge") || raw.contains("défi") {
            context.challenges.push("ambitious challenges".to_string());
        }
        if raw.contains("croissance") || raw.contains("scale") {
            context.challenges.push("supporting growth".to_string());
        }
        if raw.contains("industrialis") {
            context.challenges.push("industrializing pipelines".to_string());
        }
        if raw.contains("ia") || raw.contains("machine learning") || raw.contains("ml") {
            context.challenges.push("integrating ml".to_string());
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::posting::JobPosting;

    fn posting_with(raw_text: &str) -> JobPosting {
        JobPosting {
            raw_text: raw_text.to_string(),
            ..JobPosting::default()
        }
    }

    #[test]
    fn test_empty_posting_yields_defaults() {
        let context = JobContext::analyze(&posting_with(""));
        assert_eq!(context.company_type, CompanyType::Unspecified);
        assert_eq!(context.tone, Tone::Professional);
        assert_eq!(context.remote_policy, RemotePolicy::Unspecified);
        assert!(context.values.is_empty());
        assert!(context.tech_stack.is_empty());
        assert!(context.team_size.is_none());
    }

    #[test]
    fn test_startup_implies_casual_tone() {
        let context = JobContext::analyze(&posting_with("nous sommes une startup en seed"));
        assert_eq!(context.company_type, CompanyType::Startup);
        assert_eq!(context.tone, Tone::Casual);
    }

    #[test]
    fn test_large_group_implies_formal_tone() {
        let context = JobContext::analyze(&posting_with("filiale d'un leader mondial"));
        assert_eq!(context.company_type, CompanyType::LargeGroup);
        assert_eq!(context.tone, Tone::Formal);
    }

    #[test]
    fn test_team_size_extraction_both_languages() {
        let fr = JobContext::analyze(&posting_with("vous rejoindrez une équipe data de 12 personnes"));
        assert_eq!(fr.team_size, Some(12));

        let en = JobContext::analyze(&posting_with("you will join a team of 8 engineers"));
        assert_eq!(en.team_size, Some(8));
    }

    #[test]
    fn test_remote_policy_full_beats_hybrid() {
        let context = JobContext::analyze(&posting_with("poste en full remote, télétravail"));
        assert_eq!(context.remote_policy, RemotePolicy::FullRemote);
    }

    #[test]
    fn test_values_and_stack_preserve_declaration_order() {
        let context =
            JobContext::analyze(&posting_with("rigueur et innovation, stack: sql, bigquery"));
        assert_eq!(context.values, vec!["innovation", "excellence"]);
        assert_eq!(context.tech_stack, vec!["bigquery", "sql"]);
    }

    #[test]
    fn test_challenges_detected() {
        let context = JobContext::analyze(&posting_with("des défis d'industrialisation"));
        assert!(context.challenges.contains(&"ambitious challenges".to_string()));
        assert!(context.challenges.contains(&"industrializing pipelines".to_string()));
    }
}
