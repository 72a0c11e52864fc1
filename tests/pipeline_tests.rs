//! End-to-end pipeline tests over the JSON fixtures.

use cv_tailor::analysis::language::Language;
use cv_tailor::config::{CompilerSpec, Config, GenerationMode};
use cv_tailor::pipeline::{GenerateRequest, Pipeline};
use cv_tailor::processing::adapter::Archetype;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A config whose side effects all land inside `dir`.
fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.persistence.data_dir = dir.path().join("data");
    config.output.output_dir = dir.path().join("output");
    config
}

fn request(dir: &TempDir) -> GenerateRequest {
    GenerateRequest {
        posting_path: fixture("posting_fr.json"),
        profile_path: fixture("profile.json"),
        output_dir: Some(dir.path().join("output")),
        cv_only: false,
        cover_only: false,
        compile: false,
        overrides_path: None,
        generated_path: None,
    }
}

#[tokio::test]
async fn french_posting_is_classified_and_ranked() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(test_config(&dir));

    let outcome = pipeline.generate(&request(&dir)).await.unwrap();
    let adapted = &outcome.adapted;

    assert_eq!(adapted.language, Language::Fr);
    assert_eq!(adapted.archetype, Archetype::Engineering);

    // The Airflow/BigQuery experience outranks the Power BI one despite
    // being declared second.
    assert_eq!(adapted.experiences[0].experience.company, "Pipeline SA");
    assert!(adapted.experiences[0].score > adapted.experiences[1].score);

    // Ranking is a permutation of the declared experiences.
    assert_eq!(adapted.experiences.len(), 2);

    // Posting title is domain-relevant: truncated at " - ".
    assert_eq!(adapted.display_title, "Data Engineer");

    assert!(adapted.job_keywords.contains("airflow"));
    assert!(adapted.job_keywords.contains("bigquery"));
    assert_eq!(adapted.job_context.team_size, Some(8));
}

#[tokio::test]
async fn all_local_letter_has_five_populated_segments() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(test_config(&dir));

    let outcome = pipeline.generate(&request(&dir)).await.unwrap();
    let letter = &outcome.letter;

    assert!(!letter.hook.is_empty());
    assert!(!letter.employer_fit.is_empty());
    assert!(!letter.candidate_fit.is_empty());
    assert!(!letter.collaboration.is_empty());
    assert!(!letter.closing.is_empty());

    // The tagged opening statement matches the posting keywords.
    assert!(letter.hook.starts_with("Après trois ans"));

    // Both documents landed as .tex sources.
    assert!(outcome.cv_tex.as_ref().unwrap().exists());
    assert!(outcome.letter_tex.as_ref().unwrap().exists());

    // Filenames are normalized, accents stripped.
    let cv_name = outcome
        .cv_tex
        .as_ref()
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert_eq!(cv_name, "CV_Jerome_Durand_Datacorp.tex");
}

#[tokio::test]
async fn generation_runs_fully_deterministic() {
    let dir1 = TempDir::new().unwrap();
    let dir2 = TempDir::new().unwrap();
    let first = Pipeline::new(test_config(&dir1))
        .generate(&request(&dir1))
        .await
        .unwrap();
    let second = Pipeline::new(test_config(&dir2))
        .generate(&request(&dir2))
        .await
        .unwrap();

    let cv1 = std::fs::read_to_string(first.cv_tex.unwrap()).unwrap();
    let cv2 = std::fs::read_to_string(second.cv_tex.unwrap()).unwrap();
    assert_eq!(cv1, cv2);

    let lm1 = std::fs::read_to_string(first.letter_tex.unwrap()).unwrap();
    let lm2 = std::fs::read_to_string(second.letter_tex.unwrap()).unwrap();
    assert_eq!(lm1, lm2);
}

#[tokio::test]
async fn user_override_wins_over_generated_text() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.generation.mode = GenerationMode::Enabled;

    let overrides_path = dir.path().join("edits.json");
    std::fs::write(
        &overrides_path,
        r#"{"hook": "Phrase choisie par le candidat, mot pour mot."}"#,
    )
    .unwrap();

    let generated_path = dir.path().join("generated.json");
    std::fs::write(
        &generated_path,
        "```json\n{\"accroche\": \"Accroche générée\", \"conclusion\": \"Conclusion générée.\"}\n```",
    )
    .unwrap();

    let mut request = request(&dir);
    request.overrides_path = Some(overrides_path);
    request.generated_path = Some(generated_path);

    let outcome = Pipeline::new(config).generate(&request).await.unwrap();

    // User edit beats the generated hook; the generated closing fills the
    // segment the user left alone; untouched segments stay local.
    assert_eq!(
        outcome.letter.hook,
        "Phrase choisie par le candidat, mot pour mot."
    );
    assert_eq!(outcome.letter.closing, "Conclusion générée.");
    assert!(outcome.letter.employer_fit.contains("Datacorp"));

    // The chosen text appears verbatim in the rendered letter.
    let tex = std::fs::read_to_string(outcome.letter_tex.unwrap()).unwrap();
    assert!(tex.contains("Phrase choisie par le candidat, mot pour mot."));
}

#[tokio::test]
async fn malformed_generated_content_degrades_to_local() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.generation.mode = GenerationMode::Enabled;

    let generated_path = dir.path().join("generated.json");
    std::fs::write(&generated_path, "this is { not json").unwrap();

    let mut request = request(&dir);
    request.generated_path = Some(generated_path);

    let outcome = Pipeline::new(config).generate(&request).await.unwrap();
    assert!(outcome.letter.hook.starts_with("Après trois ans"));
}

#[tokio::test]
async fn compiler_list_falls_through_to_working_entry() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    // First compiler does not exist; the second stands in for a real one
    // by copying the source to the artifact path.
    config.compile.compilers = vec![
        CompilerSpec {
            name: "ghost".to_string(),
            program: "cv-tailor-no-such-compiler".to_string(),
            args: vec!["{tex}".to_string()],
        },
        CompilerSpec {
            name: "copy".to_string(),
            program: "cp".to_string(),
            args: vec!["{tex}".to_string(), "{pdf}".to_string()],
        },
    ];

    let mut request = request(&dir);
    request.compile = true;

    let outcome = Pipeline::new(config).generate(&request).await.unwrap();
    assert!(outcome.compiled);
    assert!(outcome
        .output_dir
        .join("CV_Jerome_Durand_Datacorp.pdf")
        .exists());
}

#[tokio::test]
async fn all_compilers_failing_still_keeps_tex_sources() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.compile.compilers = vec![CompilerSpec {
        name: "failing".to_string(),
        program: "false".to_string(),
        args: vec![],
    }];

    let mut request = request(&dir);
    request.compile = true;

    let outcome = Pipeline::new(config).generate(&request).await.unwrap();
    assert!(!outcome.compiled);
    assert!(outcome.cv_tex.unwrap().exists());
    assert!(outcome.letter_tex.unwrap().exists());
}

#[tokio::test]
async fn application_record_is_persisted_locally() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let data_dir = config.persistence.data_dir.clone();

    Pipeline::new(config).generate(&request(&dir)).await.unwrap();

    let stored = std::fs::read_to_string(data_dir.join("applications.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let record = &records.as_array().unwrap()[0];
    assert_eq!(record["company"], "Datacorp");
    assert_eq!(record["language"], "fr");
    assert!(record["match_score"].as_u64().unwrap() >= 60);
}

#[test]
fn analyze_reports_context_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(test_config(&dir));

    let (posting, context) = pipeline.analyze(&fixture("posting_fr.json")).unwrap();
    assert_eq!(posting.language(), Language::Fr);
    assert!(posting.keywords.contains("airflow"));
    assert_eq!(context.team_size, Some(8));
    assert!(context.tech_stack.contains(&"python".to_string()));
    assert!(!dir.path().join("output").exists());
}
