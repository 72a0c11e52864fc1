//! Per-request orchestration
//!
//! Runs analyze -> adapt -> compose -> render -> compile for one posting
//! and one profile. Each stage failure is labelled with the stage name.
//! Rendering and compilation happen in a request-unique scratch directory
//! that is removed on every exit path; finished artifacts are copied into
//! the output directory only after their stage succeeded.

use crate::analysis::context::JobContext;
use crate::analysis::keywords::{KeywordExtractor, Vocabulary};
use crate::config::Config;
use crate::error::{CvTailorError, Result, Stage};
use crate::generation::{OverrideChain, SegmentOverrides};
use crate::input::posting::JobPosting;
use crate::input::profile::Profile;
use crate::output::compiler::CompilationOrchestrator;
use crate::output::renderer::DocumentRenderer;
use crate::output::store::{ApplicationRecord, ApplicationStore};
use crate::processing::adapter::{AdaptedProfile, ProfileAdapter};
use crate::processing::composer::{CoverLetterComposer, CoverLetterContent};
use chrono::Local;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub posting_path: PathBuf,
    pub profile_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub cv_only: bool,
    pub cover_only: bool,
    pub compile: bool,
    pub overrides_path: Option<PathBuf>,
    pub generated_path: Option<PathBuf>,
}

pub struct GenerateOutcome {
    pub output_dir: PathBuf,
    pub cv_tex: Option<PathBuf>,
    pub letter_tex: Option<PathBuf>,
    /// False when compilation was skipped or every compiler failed; the
    /// `.tex` sources are still in place either way.
    pub compiled: bool,
    pub adapted: AdaptedProfile,
    pub letter: CoverLetterContent,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn vocabulary(&self) -> Result<Vocabulary> {
        match &self.config.output.vocabulary_path {
            Some(path) => Vocabulary::from_json_file(path),
            None => Ok(Vocabulary::default()),
        }
    }

    /// Load and finalize a posting, returning it with its derived context.
    /// Backs the `analyze` subcommand and the generate pipeline's first
    /// stage.
    pub fn analyze(&self, posting_path: &Path) -> Result<(JobPosting, JobContext)> {
        let vocabulary = self
            .vocabulary()
            .map_err(|e| CvTailorError::at_stage(Stage::Analyze, e))?;
        let extractor = KeywordExtractor::new(&vocabulary)
            .map_err(|e| CvTailorError::at_stage(Stage::Analyze, e))?;
        let posting = JobPosting::from_json_file(posting_path)
            .map_err(|e| CvTailorError::at_stage(Stage::Analyze, e))?
            .finalize(&extractor, None);
        let context = JobContext::analyze(&posting);
        Ok((posting, context))
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome> {
        // Analyze
        let (posting, _context) = self.analyze(&request.posting_path)?;
        info!(
            "posting analyzed: {} at {} [{}]",
            posting.title,
            posting.company,
            posting.language().tag()
        );

        // Adapt
        let profile = Profile::from_json_file(&request.profile_path)
            .map_err(|e| CvTailorError::at_stage(Stage::Adapt, e))?;
        let adapter = ProfileAdapter::new(&self.config.scoring);
        let adapted = adapter.adapt(&profile, &posting);

        // Compose
        let overrides = self
            .load_overrides(request)
            .map_err(|e| CvTailorError::at_stage(Stage::Compose, e))?;
        let letter = CoverLetterComposer::compose(&adapted, &profile, &overrides);

        // Render into a scratch directory first.
        let output_dir = self.resolve_output_dir(request, &posting);
        let scratch = TempDir::new().map_err(|e| CvTailorError::at_stage(Stage::Render, e))?;
        let (cv_base, lm_base) =
            DocumentRenderer::output_basenames(&adapted.personal.name, &adapted.company);

        let mut scratch_docs: Vec<(String, String)> = Vec::new();
        if !request.cover_only {
            scratch_docs.push((
                format!("{}.tex", cv_base),
                DocumentRenderer::render_resume(&adapted),
            ));
        }
        if !request.cv_only {
            scratch_docs.push((
                format!("{}.tex", lm_base),
                DocumentRenderer::render_letter(&adapted, &letter, None),
            ));
        }

        let mut scratch_paths = Vec::new();
        for (file_name, content) in &scratch_docs {
            let path = scratch.path().join(file_name);
            std::fs::write(&path, content)
                .map_err(|e| CvTailorError::at_stage(Stage::Render, e))?;
            scratch_paths.push(path);
        }

        // Compile in the scratch directory, then move everything over.
        let mut compiled = false;
        if request.compile {
            let orchestrator = CompilationOrchestrator::new(&self.config.compile);
            compiled = true;
            for tex in &scratch_paths {
                compiled &= orchestrator.compile(tex, scratch.path()).await;
            }
            if !compiled {
                warn!("compilation incomplete, keeping the .tex sources only");
            }
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| CvTailorError::at_stage(Stage::Render, e))?;
        let mut cv_tex = None;
        let mut letter_tex = None;
        for entry in
            std::fs::read_dir(scratch.path()).map_err(|e| CvTailorError::at_stage(Stage::Render, e))?
        {
            let entry = entry.map_err(|e| CvTailorError::at_stage(Stage::Render, e))?;
            let target = output_dir.join(entry.file_name());
            std::fs::copy(entry.path(), &target)
                .map_err(|e| CvTailorError::at_stage(Stage::Render, e))?;
            if target.extension().is_some_and(|e| e == "tex") {
                if target
                    .file_stem()
                    .is_some_and(|s| s.to_string_lossy().starts_with("CV_"))
                {
                    cv_tex = Some(target);
                } else {
                    letter_tex = Some(target);
                }
            }
        }

        self.persist(&adapted, &letter, &posting, &cv_tex, &letter_tex, &output_dir)?;

        Ok(GenerateOutcome {
            output_dir,
            cv_tex,
            letter_tex,
            compiled,
            adapted,
            letter,
        })
    }

    fn load_overrides(&self, request: &GenerateRequest) -> Result<OverrideChain> {
        // User edits are strict: a malformed edit file is an error.
        let user = match &request.overrides_path {
            Some(path) => SegmentOverrides::from_json_file(path)?,
            None => SegmentOverrides::default(),
        };

        // Generated content is lenient: unreadable or malformed degrades
        // to "no override".
        let generated = match &request.generated_path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(raw) => SegmentOverrides::parse_generated(&raw),
                Err(e) => {
                    warn!("cannot read generated content {}: {}", path.display(), e);
                    SegmentOverrides::default()
                }
            },
            None => SegmentOverrides::default(),
        };

        Ok(OverrideChain::new(user, generated, self.config.generation.mode))
    }

    fn resolve_output_dir(&self, request: &GenerateRequest, posting: &JobPosting) -> PathBuf {
        if let Some(dir) = &request.output_dir {
            return dir.clone();
        }
        let company = crate::output::renderer::normalize_for_filename(&posting.company);
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.config
            .output
            .output_dir
            .join(format!("{}_{}", company, stamp))
    }

    fn persist(
        &self,
        adapted: &AdaptedProfile,
        letter: &CoverLetterContent,
        posting: &JobPosting,
        cv_tex: &Option<PathBuf>,
        letter_tex: &Option<PathBuf>,
        output_dir: &Path,
    ) -> Result<()> {
        let record = ApplicationRecord::new(
            adapted,
            letter,
            &posting.contract_type,
            &posting.salary,
            cv_tex.as_deref().unwrap_or_else(|| Path::new("")),
            letter_tex.as_deref().unwrap_or_else(|| Path::new("")),
        );
        let store = ApplicationStore::new(
            self.config.persistence.mode,
            self.config.persistence.data_dir.join("applications.json"),
        );
        store
            .save(&record, output_dir)
            .map_err(|e| CvTailorError::Persistence(e.to_string()))
    }
}
