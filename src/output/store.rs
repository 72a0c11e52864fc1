//! Application persistence
//!
//! Saves one record per generated application so documents can be
//! re-edited later without recomputation. Local mode prepends to a single
//! newest-first JSON file under the data directory; remote mode drops the
//! record next to the rendered documents for an external sync service to
//! pick up.

use crate::config::PersistenceMode;
use crate::error::Result;
use crate::processing::adapter::AdaptedProfile;
use crate::processing::composer::CoverLetterContent;
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub contract_type: String,
    pub salary: String,
    pub url: String,
    pub status: String,
    pub applied_date: String,
    pub match_score: u32,
    pub language: String,
    pub cv_path: String,
    pub letter_path: String,
    /// Everything needed to re-render without re-running the pipeline.
    pub cv_data: AdaptedProfile,
    pub cover_letter: CoverLetterContent,
}

impl ApplicationRecord {
    pub fn new(
        adapted: &AdaptedProfile,
        letter: &CoverLetterContent,
        contract_type: &str,
        salary: &str,
        cv_path: &Path,
        letter_path: &Path,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("app-{}", now.timestamp_millis()),
            company: adapted.company.clone(),
            position: adapted.job_title.clone(),
            location: adapted.job_location.clone(),
            contract_type: contract_type.to_string(),
            salary: salary.to_string(),
            url: adapted.job_url.clone(),
            status: "submitted".to_string(),
            applied_date: now.format("%Y-%m-%d").to_string(),
            match_score: adapted.match_score,
            language: adapted.language.tag().to_string(),
            cv_path: cv_path.display().to_string(),
            letter_path: letter_path.display().to_string(),
            cv_data: adapted.clone(),
            cover_letter: letter.clone(),
        }
    }
}

pub struct ApplicationStore {
    mode: PersistenceMode,
    local_path: PathBuf,
}

impl ApplicationStore {
    pub fn new(mode: PersistenceMode, local_path: PathBuf) -> Self {
        Self { mode, local_path }
    }

    /// Persist the record. `output_dir` is where the rendered documents
    /// landed; remote mode writes its drop-file there.
    pub fn save(&self, record: &ApplicationRecord, output_dir: &Path) -> Result<()> {
        match self.mode {
            PersistenceMode::Local => {
                let mut applications = self.load()?;
                applications.insert(0, record.clone());
                if let Some(parent) = self.local_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let content = serde_json::to_string_pretty(&applications)?;
                std::fs::write(&self.local_path, content)?;
                info!("application saved to {}", self.local_path.display());
                Ok(())
            }
            PersistenceMode::Remote => {
                let drop_path = output_dir.join("application.json");
                let content = serde_json::to_string_pretty(record)?;
                std::fs::write(&drop_path, content)?;
                info!(
                    "application record dropped at {} for the sync service",
                    drop_path.display()
                );
                Ok(())
            }
        }
    }

    /// Stored records, newest first. Missing file means no records yet.
    pub fn load(&self) -> Result<Vec<ApplicationRecord>> {
        if !self.local_path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.local_path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::{KeywordExtractor, Vocabulary};
    use crate::config::Config;
    use crate::generation::OverrideChain;
    use crate::input::posting::JobPosting;
    use crate::input::profile::Profile;
    use crate::processing::adapter::ProfileAdapter;
    use crate::processing::composer::CoverLetterComposer;

    fn sample_record() -> ApplicationRecord {
        let extractor = KeywordExtractor::new(&Vocabulary::default()).unwrap();
        let posting = JobPosting {
            title: "Data Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Nous recherchons python pour notre équipe".to_string(),
            ..JobPosting::default()
        }
        .finalize(&extractor, None);
        let profile = Profile::default();
        let config = Config::default();
        let adapted = ProfileAdapter::new(&config.scoring).adapt(&profile, &posting);
        let letter = CoverLetterComposer::compose(&adapted, &profile, &OverrideChain::default());
        ApplicationRecord::new(
            &adapted,
            &letter,
            "CDI",
            "",
            Path::new("out/CV_X_Acme.tex"),
            Path::new("out/LM_X_Acme.tex"),
        )
    }

    #[test]
    fn test_local_save_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(
            PersistenceMode::Local,
            dir.path().join("applications.json"),
        );

        let first = sample_record();
        let mut second = sample_record();
        second.id = "app-later".to_string();

        store.save(&first, dir.path()).unwrap();
        store.save(&second, dir.path()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "app-later");
        assert_eq!(loaded[1].id, first.id);
    }

    #[test]
    fn test_remote_mode_drops_record_beside_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(
            PersistenceMode::Remote,
            dir.path().join("applications.json"),
        );
        store.save(&sample_record(), dir.path()).unwrap();

        assert!(dir.path().join("application.json").exists());
        // The local list stays untouched in remote mode.
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_carries_editable_content() {
        let record = sample_record();
        assert_eq!(record.company, "Acme");
        assert!(record.match_score >= 60);
        assert_eq!(record.language, "fr");
        assert!(!record.cover_letter.hook.is_empty());
    }
}
