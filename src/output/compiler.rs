//! External LaTeX compilation
//!
//! Runs the configured compilers in order against a `.tex` file until one
//! produces a PDF. A missing binary, a "not found" stderr signature, a
//! non-zero exit or a timeout all fall through to the next compiler;
//! exhausting the list yields `false`, never an error.

use crate::config::{CompileConfig, CompilerSpec};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

pub struct CompilationOrchestrator<'a> {
    config: &'a CompileConfig,
}

impl<'a> CompilationOrchestrator<'a> {
    pub fn new(config: &'a CompileConfig) -> Self {
        Self { config }
    }

    /// Compile `tex_path` into `out_dir`. Returns whether any compiler
    /// succeeded; no partial artifact is promised on `false`.
    pub async fn compile(&self, tex_path: &Path, out_dir: &Path) -> bool {
        for spec in &self.config.compilers {
            if self.try_compiler(spec, tex_path, out_dir).await {
                return true;
            }
        }
        warn!(
            "no LaTeX compiler succeeded for {}; install tectonic or pdflatex",
            tex_path.display()
        );
        false
    }

    async fn try_compiler(&self, spec: &CompilerSpec, tex_path: &Path, out_dir: &Path) -> bool {
        let pdf_path = out_dir.join(
            tex_path
                .with_extension("pdf")
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default(),
        );
        let args: Vec<String> = spec
            .args
            .iter()
            .map(|arg| {
                arg.replace("{tex}", &tex_path.display().to_string())
                    .replace("{out_dir}", &out_dir.display().to_string())
                    .replace("{pdf}", &pdf_path.display().to_string())
            })
            .collect();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Compiling with {}...", spec.name));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let run = Command::new(&spec.program).args(&args).output();
        let result = timeout(Duration::from_secs(self.config.timeout_secs), run).await;
        spinner.finish_and_clear();

        match result {
            Err(_) => {
                warn!("{} timed out after {}s", spec.name, self.config.timeout_secs);
                false
            }
            Ok(Err(e)) => {
                debug!("{} is not available: {}", spec.name, e);
                false
            }
            Ok(Ok(output)) => {
                if output.status.success() {
                    debug!("{} produced {}", spec.name, pdf_path.display());
                    return true;
                }
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.to_lowercase().contains("not found") {
                    debug!("{} reported itself missing, trying next", spec.name);
                    return false;
                }
                let stdout = String::from_utf8_lossy(&output.stdout);
                if let Some(line) = stdout
                    .lines()
                    .find(|l| l.contains('!') || l.to_lowercase().contains("error"))
                {
                    warn!("{} failed on {}: {}", spec.name, tex_path.display(), line);
                } else {
                    warn!("{} failed on {}", spec.name, tex_path.display());
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(compilers: Vec<CompilerSpec>) -> CompileConfig {
        CompileConfig {
            timeout_secs: 10,
            compilers,
        }
    }

    fn spec(name: &str, program: &str, args: &[&str]) -> CompilerSpec {
        CompilerSpec {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_falls_through_to_next() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();

        // First compiler does not exist; the second fakes success by
        // copying the source to the expected artifact path.
        let config = config_with(vec![
            spec("ghost", "cv-tailor-no-such-compiler", &["{tex}"]),
            spec("copy", "cp", &["{tex}", "{pdf}"]),
        ]);
        let orchestrator = CompilationOrchestrator::new(&config);
        assert!(orchestrator.compile(&tex, dir.path()).await);
        assert!(dir.path().join("doc.pdf").exists());
    }

    #[tokio::test]
    async fn test_all_compilers_failing_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();

        let config = config_with(vec![
            spec("ghost", "cv-tailor-no-such-compiler", &["{tex}"]),
            spec("failing", "false", &[]),
        ]);
        let orchestrator = CompilationOrchestrator::new(&config);
        assert!(!orchestrator.compile(&tex, dir.path()).await);
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("doc.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();

        let config = config_with(vec![spec("noop", "true", &[])]);
        let orchestrator = CompilationOrchestrator::new(&config);
        assert!(orchestrator.compile(&tex, dir.path()).await);
    }
}
