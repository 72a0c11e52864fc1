//! cv-tailor: turns a job posting and a personal profile into an adapted
//! resume and cover letter.

use clap::Parser;
use colored::Colorize;
use cv_tailor::cli::{Cli, Commands, ConfigAction};
use cv_tailor::config::Config;
use cv_tailor::error::Result;
use cv_tailor::pipeline::{GenerateRequest, Pipeline};
use log::error;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load_from(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Generate {
            posting,
            profile,
            out,
            cv_only,
            cover_only,
            no_compile,
            overrides,
            generated,
        } => {
            println!("🚀 {}", "Generating application documents".bold());
            println!("💼 Posting: {}", posting.display());
            println!("👤 Profile: {}", profile.display());

            let pipeline = Pipeline::new(config);
            let request = GenerateRequest {
                posting_path: posting,
                profile_path: profile,
                output_dir: out,
                cv_only,
                cover_only,
                compile: !no_compile,
                overrides_path: overrides,
                generated_path: generated,
            };

            let outcome = pipeline.generate(&request).await?;

            println!();
            println!(
                "🏢 {} - {} [{}]",
                outcome.adapted.company.bold(),
                outcome.adapted.job_title,
                outcome.adapted.language
            );
            println!("🎯 Match score: {}%", outcome.adapted.match_score);
            if let Some(cv) = &outcome.cv_tex {
                println!("📄 Resume: {}", cv.display());
            }
            if let Some(lm) = &outcome.letter_tex {
                println!("✉️  Cover letter: {}", lm.display());
            }
            if outcome.compiled {
                println!("{}", "📑 PDF compiled".green());
            } else if !no_compile {
                println!(
                    "{}",
                    "⚠️  No LaTeX compiler succeeded; .tex sources were kept".yellow()
                );
            }
            println!("📁 Output directory: {}", outcome.output_dir.display());
            println!("\n{}", "✅ Done".green().bold());
        }

        Commands::Analyze { posting } => {
            let pipeline = Pipeline::new(config);
            let (posting, context) = pipeline.analyze(&posting)?;

            println!("🔍 {}", "Posting analysis".bold());
            println!("🏢 {} - {}", posting.company.bold(), posting.title);
            println!("🌍 Language: {}", posting.language());
            println!("🏷️  Company type: {:?}", context.company_type);
            println!("🗣️  Tone: {:?}", context.tone);
            if let Some(size) = context.team_size {
                println!("👥 Team size: {}", size);
            }
            println!("🏠 Remote policy: {:?}", context.remote_policy);
            if !context.tech_stack.is_empty() {
                println!("🛠️  Stack: {}", context.tech_stack.join(", "));
            }
            if !context.values.is_empty() {
                println!("💡 Values: {}", context.values.join(", "));
            }
            if !context.challenges.is_empty() {
                println!("⚡ Challenges: {}", context.challenges.join("; "));
            }
            println!("\n🔤 Keywords ({}):", posting.keywords.len());
            for keyword in &posting.keywords {
                println!("  • {}", keyword);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Generation: {:?}", config.generation.mode);
                println!("Persistence: {:?}", config.persistence.mode);
                println!("Data directory: {}", config.persistence.data_dir.display());
                println!("Output directory: {}", config.output.output_dir.display());
                println!("\nScoring:");
                println!("  Exact match weight: {}", config.scoring.exact_match_weight);
                println!("  Text match weight: {}", config.scoring.text_match_weight);
                println!("  Keyword weight: {}", config.scoring.keyword_weight);
                println!("\nCompilers (in order):");
                for compiler in &config.compile.compilers {
                    println!("  • {} ({})", compiler.name, compiler.program);
                }
                println!("Compile timeout: {}s", config.compile.timeout_secs);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}
