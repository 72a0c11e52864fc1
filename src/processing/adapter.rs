//! Profile adaptation
//!
//! Given the static profile and a finalized posting, ranks and filters
//! experiences, skill groups and certifications, picks the headline
//! archetype and summary variant, and carries the employer context
//! forward for the composer. Adaptation never fails: a posting or profile
//! missing optional fields degrades to empty lists.

use crate::analysis::context::JobContext;
use crate::analysis::language::Language;
use crate::config::ScoringConfig;
use crate::input::posting::{ColorPair, JobPosting};
use crate::input::profile::{
    Certification, EducationEntry, Experience, LanguageSkill, PersonalInfo, PersonalProject,
    Profile,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Professional headline categories, in tie-break order: when archetype
/// scores tie, the earliest declared one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Engineering,
    Science,
    Governance,
    Analytics,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Engineering,
        Archetype::Science,
        Archetype::Governance,
        Archetype::Analytics,
    ];

    fn relevance_keywords(&self) -> &'static [&'static str] {
        match self {
            Archetype::Engineering => &[
                "etl", "elt", "pipeline", "airflow", "gcp", "bigquery", "data engineer", "dbt",
                "terraform", "kafka", "spark", "dataflow", "orchestration", "cloud", "aws",
                "azure", "infrastructure",
            ],
            Archetype::Science => &[
                "machine learning", "ml", "model", "nlp", "deep learning", "data scientist",
                "tensorflow", "pytorch", "scikit", "prediction", "classification",
            ],
            Archetype::Governance => &[
                "governance", "gouvernance", "quality", "qualité", "steward", "catalog",
                "metadata", "lineage", "compliance",
            ],
            Archetype::Analytics => &[
                "analyst", "bi", "power bi", "tableau", "dashboard", "reporting", "excel",
                "business intelligence",
            ],
        }
    }

    /// Archetype-specific specialization sentence appended to the base
    /// introduction. Empty means the summary degrades to the base alone.
    fn specialization(&self, language: Language) -> &'static str {
        match (self, language) {
            (Archetype::Engineering, Language::Fr) => {
                "Passionné par l'industrialisation des flux de données, l'optimisation des \
                 pipelines et l'infrastructure cloud."
            }
            (Archetype::Science, Language::Fr) => {
                "Passionné par le Machine Learning et l'IA, avec une expertise en déploiement \
                 de modèles et analyse prédictive."
            }
            (Archetype::Governance, Language::Fr) => {
                "Expert en gouvernance des données, catalogage et qualité des données, avec \
                 une forte capacité de collaboration transverse."
            }
            (Archetype::Analytics, Language::Fr) => {
                "Passionné par la visualisation de données et le reporting, avec une maîtrise \
                 des outils BI modernes."
            }
            (Archetype::Engineering, Language::En) => {
                "Passionate about industrializing data flows, optimizing pipelines, and cloud \
                 infrastructure."
            }
            (Archetype::Science, Language::En) => {
                "Passionate about Machine Learning and AI, with expertise in model deployment \
                 and predictive analytics."
            }
            (Archetype::Governance, Language::En) => {
                "Expert in data governance, cataloging, and data quality, with strong \
                 cross-functional collaboration skills."
            }
            (Archetype::Analytics, Language::En) => {
                "Passionate about data visualization and reporting, with mastery of modern BI \
                 tools."
            }
        }
    }
}

const BASE_INTRO_FR: &str =
    "Avec un parcours riche en programmation/développement et spécialisé en data, notamment \
     en data gouvernance et en data engineering, je cherche une nouvelle opportunité pour \
     mettre en pratique mes expériences et connaissances acquises, afin de relever de \
     nouveaux défis.";

const BASE_INTRO_EN: &str =
    "With a rich background in programming/development and specialized in data, particularly \
     in data governance and data engineering, I am seeking a new opportunity to apply my \
     acquired experiences and knowledge, in order to take on new challenges.";

/// Words marking a posting title as domain-relevant enough to display.
const DISPLAY_TITLE_WORDS: &[&str] = &["data", "engineer", "scientist", "analyst", "bi", "ml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedExperience {
    #[serde(flatten)]
    pub experience: Experience,
    pub score: u32,
    pub selected_bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSkillGroup {
    pub label: String,
    pub items: Vec<String>,
    pub score: u32,
    pub exact_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCertification {
    #[serde(flatten)]
    pub certification: Certification,
    pub score: u32,
}

/// The job-specific view of the profile, recomputed fresh on every
/// generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptedProfile {
    pub personal: PersonalInfo,
    pub job_title: String,
    pub company: String,
    pub job_url: String,
    pub job_location: String,
    pub display_title: String,
    pub archetype: Archetype,
    pub summary: String,
    pub experiences: Vec<RankedExperience>,
    pub skills: Vec<RankedSkillGroup>,
    pub certifications: Vec<RankedCertification>,
    pub education: Vec<EducationEntry>,
    pub languages: Vec<LanguageSkill>,
    pub interests: Vec<String>,
    pub projects: Vec<PersonalProject>,
    pub job_keywords: BTreeSet<String>,
    pub job_description: String,
    pub job_context: JobContext,
    pub language: Language,
    /// Coarse fit percentage shown on the application record.
    pub match_score: u32,
    pub logo_url: Option<String>,
    pub colors: Option<ColorPair>,
}

fn lowercase_set(set: &BTreeSet<String>) -> BTreeSet<String> {
    set.iter().map(|k| k.to_lowercase()).collect()
}

/// Size of the case-insensitive intersection of two keyword sets.
fn keyword_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> u32 {
    let a = lowercase_set(a);
    let b = lowercase_set(b);
    a.intersection(&b).count() as u32
}

fn strip_separators(s: &str) -> String {
    s.replace([' ', '-'], "")
}

pub struct ProfileAdapter<'a> {
    scoring: &'a ScoringConfig,
}

impl<'a> ProfileAdapter<'a> {
    pub fn new(scoring: &'a ScoringConfig) -> Self {
        Self { scoring }
    }

    pub fn adapt(&self, profile: &Profile, posting: &JobPosting) -> AdaptedProfile {
        let language = posting.language();
        let raw_text = posting.raw_text.to_lowercase();
        let job_keywords = lowercase_set(&posting.keywords);

        let archetype = Self::select_archetype(&raw_text);
        let summary = self.build_summary(profile, archetype, language);
        let display_title = Self::display_title(profile, posting);

        let experiences = self.rank_experiences(&profile.experiences, &job_keywords);
        let skills = self.rank_skills(&profile.skills, &job_keywords, &raw_text);
        let certifications = self.rank_certifications(&profile.certifications, &job_keywords);
        let match_score = Self::match_score_percent(profile, &posting.description);

        AdaptedProfile {
            personal: profile.personal.clone(),
            job_title: if posting.title.is_empty() {
                display_title.clone()
            } else {
                posting.title.clone()
            },
            company: posting.company.clone(),
            job_url: posting.url.clone(),
            job_location: posting.location.clone(),
            display_title,
            archetype,
            summary,
            experiences,
            skills,
            certifications,
            education: profile.education.clone(),
            languages: profile.languages.clone(),
            interests: profile.interests.clone(),
            projects: profile.projects.clone(),
            job_keywords,
            job_description: posting.description.clone(),
            job_context: JobContext::analyze(posting),
            language,
            match_score,
            logo_url: posting.logo_url.clone(),
            colors: posting.colors,
        }
    }

    /// Highest keyword-overlap archetype; ties resolved by declaration
    /// order, engineering first.
    fn select_archetype(raw_text: &str) -> Archetype {
        let mut best = Archetype::ALL[0];
        let mut best_score = 0usize;
        for archetype in Archetype::ALL {
            let score = archetype
                .relevance_keywords()
                .iter()
                .filter(|kw| raw_text.contains(*kw))
                .count();
            if score > best_score {
                best = archetype;
                best_score = score;
            }
        }
        best
    }

    fn build_summary(&self, profile: &Profile, archetype: Archetype, language: Language) -> String {
        let base = match language {
            Language::Fr => profile.intro_fr.as_deref().unwrap_or(BASE_INTRO_FR),
            Language::En => profile.intro_en.as_deref().unwrap_or(BASE_INTRO_EN),
        };
        let specialization = archetype.specialization(language);
        if specialization.is_empty() {
            base.to_string()
        } else {
            format!("{} {}", base, specialization)
        }
    }

    /// The posting's own title when it is domain-relevant, truncated at
    /// the first " - " or " (" delimiter; the profile's primary declared
    /// title otherwise.
    fn display_title(profile: &Profile, posting: &JobPosting) -> String {
        let fallback = || {
            profile
                .titles
                .first()
                .cloned()
                .unwrap_or_else(|| posting.title.clone())
        };

        if posting.title.is_empty() {
            return fallback();
        }

        let title_lower = posting.title.to_lowercase();
        if DISPLAY_TITLE_WORDS.iter().any(|w| title_lower.contains(w)) {
            let truncated = posting.title.split(" - ").next().unwrap_or(&posting.title);
            let truncated = truncated.split(" (").next().unwrap_or(truncated);
            truncated.trim().to_string()
        } else {
            fallback()
        }
    }

    fn rank_experiences(
        &self,
        experiences: &[Experience],
        job_keywords: &BTreeSet<String>,
    ) -> Vec<RankedExperience> {
        let mut ranked: Vec<RankedExperience> = experiences
            .iter()
            .map(|exp| RankedExperience {
                score: keyword_overlap(&exp.keywords, job_keywords),
                selected_bullets: exp
                    .bullets
                    .iter()
                    .take(self.scoring.max_selected_bullets)
                    .cloned()
                    .collect(),
                experience: exp.clone(),
            })
            .collect();

        // Stable: ties preserve the profile's declared order.
        ranked.sort_by_key(|e| (Reverse(e.score), e.experience.priority));
        ranked
    }

    fn rank_skills(
        &self,
        skills: &[crate::input::profile::SkillGroup],
        job_keywords: &BTreeSet<String>,
        raw_text: &str,
    ) -> Vec<RankedSkillGroup> {
        let cleaned_keywords: BTreeSet<String> =
            job_keywords.iter().map(|k| strip_separators(k)).collect();
        let squeezed_text = strip_separators(raw_text);

        let mut ranked: Vec<RankedSkillGroup> = skills
            .iter()
            .map(|group| {
                let mut exact = Vec::new();
                let mut text = Vec::new();
                let mut other = Vec::new();

                for item in &group.items {
                    let item_lower = item.to_lowercase();
                    let item_clean = strip_separators(&item_lower);

                    if job_keywords.contains(&item_lower)
                        || cleaned_keywords.contains(&item_clean)
                    {
                        exact.push(item.clone());
                    } else if raw_text.contains(&item_lower)
                        || squeezed_text.contains(&item_clean)
                        || job_keywords.iter().any(|kw| item_lower.contains(kw.as_str()))
                    {
                        text.push(item.clone());
                    } else {
                        other.push(item.clone());
                    }
                }

                let exact_count = exact.len();
                let text_count = text.len();

                let mut items: Vec<String> =
                    exact.into_iter().chain(text).chain(other).collect();
                if exact_count == 0 && text_count == 0 {
                    items = group
                        .items
                        .iter()
                        .take(self.scoring.fallback_skill_items)
                        .cloned()
                        .collect();
                }
                items.truncate(self.scoring.max_skill_items);

                let score = keyword_overlap(&group.keywords, job_keywords)
                    * self.scoring.keyword_weight
                    + exact_count as u32 * self.scoring.exact_match_weight
                    + text_count as u32 * self.scoring.text_match_weight;

                RankedSkillGroup {
                    label: group.label.clone(),
                    items,
                    score,
                    exact_count,
                }
            })
            .collect();

        ranked.sort_by_key(|g| (Reverse(g.score), Reverse(g.exact_count)));
        ranked.truncate(self.scoring.max_skill_groups);
        ranked
    }

    fn rank_certifications(
        &self,
        certifications: &[Certification],
        job_keywords: &BTreeSet<String>,
    ) -> Vec<RankedCertification> {
        let mut ranked: Vec<RankedCertification> = certifications
            .iter()
            .map(|cert| RankedCertification {
                score: keyword_overlap(&cert.keywords, job_keywords),
                certification: cert.clone(),
            })
            .collect();

        ranked.sort_by_key(|c| Reverse(c.score));
        ranked.truncate(self.scoring.max_certifications);
        ranked
    }

    /// Coarse fit percentage: floor 60, plus 5 per skill item literally
    /// present in the description, capped at 95.
    fn match_score_percent(profile: &Profile, description: &str) -> u32 {
        let description = description.to_lowercase();
        let mut seen = BTreeSet::new();
        for group in &profile.skills {
            for item in &group.items {
                let item_lower = item.to_lowercase();
                if !item_lower.is_empty() && description.contains(&item_lower) {
                    seen.insert(item_lower);
                }
            }
        }
        (60 + seen.len() as u32 * 5).min(95)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::{KeywordExtractor, Vocabulary};
    use crate::config::Config;
    use crate::input::profile::SkillGroup;

    fn scoring() -> ScoringConfig {
        Config::default().scoring
    }

    fn experience(title: &str, company: &str, keywords: &[&str], priority: i32) -> Experience {
        Experience {
            title: title.to_string(),
            company: company.to_string(),
            period: "2022 - 2024".to_string(),
            bullets: vec!["Did things".to_string()],
            priority,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn french_posting() -> JobPosting {
        let extractor = KeywordExtractor::new(&Vocabulary::default()).unwrap();
        JobPosting {
            title: "Data Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Nous recherchons un Data Engineer pour notre équipe, \
                          compétences: Python, BigQuery, Airflow"
                .to_string(),
            ..JobPosting::default()
        }
        .finalize(&extractor, None)
    }

    #[test]
    fn test_experience_ranking_is_a_permutation() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.experiences = vec![
            experience("Data Analyst", "Viz Corp", &["tableau"], 1),
            experience("Data Engineer", "Pipe Inc", &["airflow", "bigquery"], 2),
            experience("Intern", "Old Co", &[], 3),
        ];

        let adapted = adapter.adapt(&profile, &french_posting());
        assert_eq!(adapted.experiences.len(), profile.experiences.len());
        // Score 2 beats score 0; ties keep declared priority order.
        assert_eq!(adapted.experiences[0].experience.company, "Pipe Inc");
        assert_eq!(adapted.experiences[0].score, 2);
        assert_eq!(adapted.experiences[1].experience.company, "Viz Corp");
        assert_eq!(adapted.experiences[2].experience.company, "Old Co");
    }

    #[test]
    fn test_archetype_selects_engineering_for_pipeline_posting() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let adapted = adapter.adapt(&Profile::default(), &french_posting());
        assert_eq!(adapted.archetype, Archetype::Engineering);
        assert_eq!(adapted.language, Language::Fr);
    }

    #[test]
    fn test_archetype_tie_breaks_to_engineering() {
        // No archetype keyword matches at all: declaration order wins.
        assert_eq!(ProfileAdapter::select_archetype(""), Archetype::Engineering);
    }

    #[test]
    fn test_display_title_truncates_at_delimiters() {
        let mut posting = JobPosting::default();
        posting.title = "Data Engineer - CDI (H/F)".to_string();
        let title = ProfileAdapter::display_title(&Profile::default(), &posting);
        assert_eq!(title, "Data Engineer");
    }

    #[test]
    fn test_display_title_falls_back_to_profile() {
        let mut posting = JobPosting::default();
        posting.title = "Responsable commercial".to_string();
        let mut profile = Profile::default();
        profile.titles = vec!["Data Engineer".to_string()];
        let title = ProfileAdapter::display_title(&profile, &posting);
        assert_eq!(title, "Data Engineer");
    }

    #[test]
    fn test_skill_tiering_exact_first_and_capped() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.skills = vec![SkillGroup {
            label: "Data".to_string(),
            keywords: ["airflow"].iter().map(|s| s.to_string()).collect(),
            items: vec![
                "Excel".to_string(),
                "Airflow".to_string(),
                "Looker".to_string(),
                "Python".to_string(),
                "SAS".to_string(),
                "Matlab".to_string(),
                "Stata".to_string(),
            ],
        }];

        let adapted = adapter.adapt(&profile, &french_posting());
        let group = &adapted.skills[0];
        // Exact matches (posting keywords) come first, declared order kept.
        assert_eq!(group.items[0], "Airflow");
        assert_eq!(group.items[1], "Python");
        assert!(group.items.len() <= 6);
        assert_eq!(group.exact_count, 2);
        // keyword overlap 1, exact 2*5, and Looker lands in the text tier
        // through the single-letter "r" vocabulary term: 1 + 10 + 2.
        assert_eq!(group.score, 13);
    }

    #[test]
    fn test_skill_tiering_is_idempotent() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.skills = vec![SkillGroup {
            label: "Tools".to_string(),
            keywords: BTreeSet::new(),
            items: vec!["Airflow".to_string(), "Excel".to_string()],
        }];

        let posting = french_posting();
        let first = adapter.adapt(&profile, &posting);
        let second = adapter.adapt(&profile, &posting);
        assert_eq!(first.skills[0].items, second.skills[0].items);
    }

    #[test]
    fn test_skill_fallback_when_nothing_matches() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.skills = vec![SkillGroup {
            label: "Legacy".to_string(),
            keywords: BTreeSet::new(),
            items: (1..=8).map(|i| format!("Tool{}", i)).collect(),
        }];

        let adapted = adapter.adapt(&profile, &french_posting());
        // No exact and no text matches: first 5 declared items, unfiltered.
        assert_eq!(adapted.skills[0].items.len(), 5);
        assert_eq!(adapted.skills[0].items[0], "Tool1");
        assert_eq!(adapted.skills[0].score, 0);
    }

    #[test]
    fn test_skill_groups_capped_at_seven() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.skills = (0..10)
            .map(|i| SkillGroup {
                label: format!("Group{}", i),
                keywords: BTreeSet::new(),
                items: vec![],
            })
            .collect();

        let adapted = adapter.adapt(&profile, &french_posting());
        assert_eq!(adapted.skills.len(), 7);
    }

    #[test]
    fn test_certifications_capped_at_five() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let mut profile = Profile::default();
        profile.certifications = (0..8)
            .map(|i| Certification {
                name: format!("Cert{}", i),
                date: "2023".to_string(),
                keywords: BTreeSet::new(),
            })
            .collect();

        let adapted = adapter.adapt(&profile, &french_posting());
        assert_eq!(adapted.certifications.len(), 5);
    }

    #[test]
    fn test_empty_profile_never_errors() {
        let scoring = scoring();
        let adapter = ProfileAdapter::new(&scoring);
        let adapted = adapter.adapt(&Profile::default(), &JobPosting::default());
        assert!(adapted.experiences.is_empty());
        assert!(adapted.skills.is_empty());
        assert_eq!(adapted.match_score, 60);
        assert!(!adapted.summary.is_empty());
    }
}
