//! Cover-letter composition
//!
//! Builds the five letter segments (hook, employer fit, candidate fit,
//! collaboration, closing) as plain text. Escaping is the renderer's job.
//! Every segment is always computed locally first; the override chain then
//! replaces individual segments, user edits winning over externally
//! generated text.

use crate::analysis::context::{CompanyType, Tone};
use crate::analysis::language::Language;
use crate::generation::OverrideChain;
use crate::input::profile::Profile;
use crate::processing::adapter::AdaptedProfile;
use serde::{Deserialize, Serialize};

/// The five letter segments, one source each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterContent {
    pub hook: String,
    pub employer_fit: String,
    pub candidate_fit: String,
    pub collaboration: String,
    pub closing: String,
}

/// Per-language phrase fragments the local rules assemble segments from.
pub struct LetterPhrases {
    pub babel: &'static str,
    pub subject: &'static str,
    pub application_for: &'static str,
    pub greeting: &'static str,
    pub today_intro: &'static str,
    pub as_position: &'static str,
    pub recruitment: &'static str,
    pub made_at: &'static str,
    pub on_date: &'static str,
    hook_default: &'static str,
    currently: &'static str,
    at: &'static str,
    developed_expertise: &'static str,
    previous_exp: &'static str,
    allowed_develop: &'static str,
    education_complement: &'static str,
    at_school: &'static str,
    completes_path: &'static str,
    joining_team: &'static str,
    represents_opportunity: &'static str,
    at_service: &'static str,
    will_be_assets: &'static str,
    closing_formal: &'static str,
    closing_casual: &'static str,
    closing_default: &'static str,
    qualities_default: &'static str,
    startup_intro: &'static str,
    offers_environment: &'static str,
    scaleup_intro: &'static str,
    mission_caught: &'static str,
    caught_attention: &'static str,
    appreciate: &'static str,
    values_of: &'static str,
    animating_team: &'static str,
    your_stack: &'static str,
    ambitious_challenges: &'static str,
    as_well_as: &'static str,
    and_word: &'static str,
    member_of: &'static str,
    embodies_ambition: &'static str,
    project_impact: &'static str,
    convinced_value: &'static str,
    strong_experience: &'static str,
}

const PHRASES_FR: LetterPhrases = LetterPhrases {
    babel: "french",
    subject: "Objet :",
    application_for: "Candidature au poste de",
    greeting: "Madame, Monsieur,",
    today_intro: "Aujourd'hui, je souhaite mettre mes compétences au service de",
    as_position: "en tant que",
    recruitment: "Service Recrutement",
    made_at: "Fait à",
    on_date: "le",
    hook_default: "Passionné par la data et son potentiel de transformation, je souhaite \
                   aujourd'hui mettre mes compétences au service de votre entreprise.",
    currently: "Actuellement",
    at: "chez",
    developed_expertise: "j'ai développé une expertise approfondie, notamment en",
    previous_exp: "Mon expérience précédente en tant que",
    allowed_develop: "m'a permis de développer une solide culture de la qualité des données \
                      et de la collaboration transverse",
    education_complement: "Ma formation en",
    at_school: "à",
    completes_path: "complète ce parcours par une vision analytique rigoureuse",
    joining_team: "Intégrer votre équipe en tant que",
    represents_opportunity: "représente pour moi l'opportunité de mettre mes compétences \
                             techniques",
    at_service: "au service de vos projets. Ma",
    will_be_assets: "seront des atouts pour contribuer efficacement à la réussite de vos \
                     missions.",
    closing_formal: "Dans l'attente de votre réponse, je me tiens à votre disposition pour un \
                     entretien. Je vous prie d'agréer, Madame, Monsieur, l'expression de mes \
                     salutations distinguées.",
    closing_casual: "Je serais ravi d'échanger avec vous lors d'un entretien pour vous \
                     présenter plus en détail mon parcours et mes motivations. Dans cette \
                     attente, je vous adresse mes meilleures salutations.",
    closing_default: "En espérant que ma candidature retiendra votre attention, je reste à \
                      votre disposition pour un entretien. Veuillez agréer, Madame, Monsieur, \
                      mes sincères salutations.",
    qualities_default: "rigueur, esprit d'équipe et proactivité",
    startup_intro: "En tant que startup innovante,",
    offers_environment: "offre un environnement propice à la prise d'initiative et à l'impact \
                         direct",
    scaleup_intro: ", en pleine phase de croissance, représente exactement le type \
                    d'environnement dynamique où je souhaite évoluer",
    mission_caught: "La mission de",
    caught_attention: "m'a particulièrement interpellé",
    appreciate: "J'apprécie particulièrement",
    values_of: "les valeurs d'",
    animating_team: "qui animent votre équipe",
    your_stack: "votre stack technique",
    ambitious_challenges: "les défis ambitieux que vous proposez",
    as_well_as: "ainsi que",
    and_word: "et",
    member_of: ", membre de la ",
    embodies_ambition: ", incarne l'ambition et l'innovation qui me motivent",
    project_impact: "Cette réalisation illustre ma capacité à mener des projets data à fort \
                     impact.",
    convinced_value: ", je suis convaincu de pouvoir apporter une réelle valeur ajoutée à \
                      votre équipe.",
    strong_experience: "Fort de mon expérience en tant que",
};

const PHRASES_EN: LetterPhrases = LetterPhrases {
    babel: "english",
    subject: "Subject:",
    application_for: "Application for the position of",
    greeting: "Dear Hiring Manager,",
    today_intro: "Today, I would like to bring my skills to",
    as_position: "as a",
    recruitment: "Recruitment Department",
    made_at: "Written in",
    on_date: "on",
    hook_default: "Passionate about data and its transformative potential, I am eager to \
                   contribute my skills to your organization.",
    currently: "Currently",
    at: "at",
    developed_expertise: "I have developed deep expertise, particularly in",
    previous_exp: "My previous experience as",
    allowed_develop: "enabled me to build a strong foundation in data quality and \
                      cross-functional collaboration",
    education_complement: "My education in",
    at_school: "at",
    completes_path: "complements this path with a rigorous analytical perspective",
    joining_team: "Joining your team as a",
    represents_opportunity: "represents an opportunity for me to apply my technical skills",
    at_service: "to support your projects. My",
    will_be_assets: "will be valuable assets to contribute effectively to your mission's \
                     success.",
    closing_formal: "I look forward to your response and remain at your disposal for an \
                     interview. Please accept my best regards.",
    closing_casual: "I would be delighted to discuss my background and motivations with you \
                     in an interview. Looking forward to hearing from you. Best regards.",
    closing_default: "I hope my application will be of interest to you, and I remain \
                      available for an interview at your convenience. Sincerely.",
    qualities_default: "rigor, teamwork and proactivity",
    startup_intro: "As an innovative startup,",
    offers_environment: "offers an environment conducive to initiative and direct impact",
    scaleup_intro: ", in full growth phase, represents exactly the kind of dynamic \
                    environment where I want to evolve",
    mission_caught: "The mission of",
    caught_attention: "particularly caught my attention",
    appreciate: "I particularly appreciate",
    values_of: "the values of ",
    animating_team: "that drive your team",
    your_stack: "your tech stack",
    ambitious_challenges: "the ambitious challenges you offer",
    as_well_as: "as well as",
    and_word: "and",
    member_of: ", member of the ",
    embodies_ambition: ", embodies the ambition and innovation that motivate me",
    project_impact: "This achievement illustrates my ability to lead high-impact data \
                     projects.",
    convinced_value: ", I am confident I can bring real added value to your team.",
    strong_experience: "With my experience as",
};

impl LetterPhrases {
    pub fn for_language(language: Language) -> &'static LetterPhrases {
        match language {
            Language::Fr => &PHRASES_FR,
            Language::En => &PHRASES_EN,
        }
    }
}

/// How many leading job keywords the candidate-fit bullet filter consults.
const BULLET_KEYWORD_WINDOW: usize = 10;

/// Minimum keyword length for the collaboration substring rule.
const SUBSTRING_KEYWORD_MIN: usize = 3;

pub struct CoverLetterComposer;

impl CoverLetterComposer {
    /// Compose all five segments, then apply the override chain segment by
    /// segment. The local rules always run in full.
    pub fn compose(
        adapted: &AdaptedProfile,
        profile: &Profile,
        overrides: &OverrideChain,
    ) -> CoverLetterContent {
        let t = LetterPhrases::for_language(adapted.language);

        let local = CoverLetterContent {
            hook: Self::hook(adapted, profile, t),
            employer_fit: Self::employer_fit(adapted, t),
            candidate_fit: Self::candidate_fit(adapted, t),
            collaboration: Self::collaboration(adapted, profile, t),
            closing: Self::closing(adapted, t),
        };

        overrides.resolve(local)
    }

    /// Hook: best-scoring opening statement, displaced by a relevant
    /// notable project when no statement actually matched, then the
    /// main-experience sentence, then the generic default.
    fn hook(adapted: &AdaptedProfile, profile: &Profile, t: &LetterPhrases) -> String {
        let mut hook = String::new();
        let mut best_score: i64 = -1;
        for statement in &profile.opening_statements {
            let score = statement
                .keywords
                .iter()
                .filter(|kw| adapted.job_keywords.contains(&kw.to_lowercase()))
                .count() as i64;
            if score > best_score {
                best_score = score;
                hook = statement.text.clone();
            }
        }

        if hook.is_empty() {
            hook = match adapted.experiences.first() {
                Some(main) => format!(
                    "{} {} {} {}{}",
                    t.strong_experience,
                    main.experience.title,
                    t.at,
                    main.experience.company,
                    t.convinced_value
                ),
                None => t.hook_default.to_string(),
            };
        }

        // A notable project beats a hook that matched nothing.
        if best_score <= 0 && !profile.notable_projects.is_empty() {
            let mut best_project = None;
            let mut best_project_score: i64 = -1;
            for project in &profile.notable_projects {
                let score = project
                    .keywords
                    .iter()
                    .filter(|kw| adapted.job_keywords.contains(&kw.to_lowercase()))
                    .count() as i64;
                if score > best_project_score {
                    best_project_score = score;
                    best_project = Some(project);
                }
            }
            if let Some(project) = best_project {
                hook = format!(
                    "{} : {}. {}",
                    project.description, project.impact, t.project_impact
                );
            }
        }

        hook
    }

    fn employer_fit(adapted: &AdaptedProfile, t: &LetterPhrases) -> String {
        let ctx = &adapted.job_context;
        let company = &adapted.company;

        let intro = if let Some(growth_stage) = &ctx.growth_stage {
            format!("{}{}{}{}", company, t.member_of, growth_stage, t.embodies_ambition)
        } else {
            match ctx.company_type {
                CompanyType::Startup => {
                    format!("{} {} {}", t.startup_intro, company, t.offers_environment)
                }
                CompanyType::ScaleUp => format!("{}{}", company, t.scaleup_intro),
                _ => format!("{} {} {}", t.mission_caught, company, t.caught_attention),
            }
        };

        let mut complements = Vec::new();
        if !ctx.values.is_empty() {
            let joiner = format!(" {} ", t.and_word);
            let values_text = ctx.values[..ctx.values.len().min(2)].join(joiner.as_str());
            complements.push(format!("{}{} {}", t.values_of, values_text, t.animating_team));
        }
        if !ctx.tech_stack.is_empty() {
            let stack_text = ctx.tech_stack[..ctx.tech_stack.len().min(4)]
                .iter()
                .map(|tech| tech.to_uppercase())
                .collect::<Vec<_>>()
                .join(", ");
            complements.push(format!("{} ({})", t.your_stack, stack_text));
        }
        if !ctx.challenges.is_empty() {
            complements.push(t.ambitious_challenges.to_string());
        }

        match complements.len() {
            0 => format!("{}.", intro),
            1 => format!("{}. {} {}.", intro, t.appreciate, complements[0]),
            2 => format!(
                "{}. {} {}, {} {}.",
                intro, t.appreciate, complements[0], t.as_well_as, complements[1]
            ),
            _ => format!(
                "{}. {} {}, {}, {} {}.",
                intro, t.appreciate, complements[0], complements[1], t.and_word, complements[2]
            ),
        }
    }

    fn candidate_fit(adapted: &AdaptedProfile, t: &LetterPhrases) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(main) = adapted.experiences.first() {
            if !main.selected_bullets.is_empty() {
                let window: Vec<&String> =
                    adapted.job_keywords.iter().take(BULLET_KEYWORD_WINDOW).collect();
                let mut relevant: Vec<&String> = main
                    .selected_bullets
                    .iter()
                    .take(3)
                    .filter(|b| {
                        let b = b.to_lowercase();
                        window.iter().any(|kw| b.contains(kw.as_str()))
                    })
                    .collect();
                if relevant.is_empty() {
                    relevant = main.selected_bullets.iter().take(2).collect();
                }

                if let Some(first) = relevant.first() {
                    let bullet = Self::inline_bullet(first);
                    parts.push(format!(
                        "{} {} {} {}, {} {}",
                        t.currently,
                        main.experience.title,
                        t.at,
                        main.experience.company,
                        t.developed_expertise,
                        bullet
                    ));
                }
            }
        }

        if let Some(second) = adapted.experiences.get(1) {
            parts.push(format!(
                "{} {} {} {} {}",
                t.previous_exp,
                second.experience.title,
                t.at,
                second.experience.company,
                t.allowed_develop
            ));
        }

        if let Some(edu) = adapted.education.first() {
            parts.push(format!(
                "{} {} {} {} {}",
                t.education_complement, edu.title, t.at_school, edu.school, t.completes_path
            ));
        }

        let joined = format!("{}.", parts.join(". "));
        joined.replace("..", ".")
    }

    /// Drop the bullet's trailing period and lowercase its first letter so
    /// it reads as a clause continuation.
    fn inline_bullet(bullet: &str) -> String {
        let trimmed = bullet.strip_suffix('.').unwrap_or(bullet);
        let mut chars = trimmed.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn collaboration(adapted: &AdaptedProfile, profile: &Profile, t: &LetterPhrases) -> String {
        let description = adapted.job_description.to_lowercase();

        let mut matching: Vec<String> = Vec::new();
        for group in &adapted.skills {
            for item in &group.items {
                let item_lower = item.to_lowercase();
                let is_match = adapted.job_keywords.contains(&item_lower)
                    || description.contains(&item_lower)
                    || adapted
                        .job_keywords
                        .iter()
                        .any(|kw| {
                            kw.len() >= SUBSTRING_KEYWORD_MIN && item_lower.contains(kw.as_str())
                        });
                if is_match && !matching.contains(item) {
                    matching.push(item.clone());
                }
            }
        }

        let skills_text = if matching.is_empty() {
            // Fallback: leading items of the most relevant groups.
            let mut top: Vec<String> = Vec::new();
            for group in adapted.skills.iter().take(3) {
                top.extend(group.items.iter().take(2).cloned());
            }
            top.truncate(4);
            top.join(", ")
        } else {
            matching.truncate(4);
            matching.join(", ")
        };

        let qualities_text = if profile.qualities.is_empty() {
            t.qualities_default.to_string()
        } else {
            profile.qualities[..profile.qualities.len().min(3)]
                .join(", ")
                .to_lowercase()
        };

        format!(
            "{} {} {} ({}) {} {} {}",
            t.joining_team,
            adapted.job_title,
            t.represents_opportunity,
            skills_text,
            t.at_service,
            qualities_text,
            t.will_be_assets
        )
    }

    fn closing(adapted: &AdaptedProfile, t: &LetterPhrases) -> String {
        match adapted.job_context.tone {
            Tone::Formal => t.closing_formal.to_string(),
            Tone::Casual => t.closing_casual.to_string(),
            Tone::Professional => t.closing_default.to_string(),
        }
    }
}
