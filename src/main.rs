//! Ruster ATS - resume ATS compatibility scorer
//!
//! Scores plain-text resumes against a job description or a keyword list:
//! - Embedding similarity with a word-overlap fallback
//! - Section, keyword, formatting and context heuristics
//! - Batch scoring of whole directories, honouring `.atsignore`

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use ruster_ats::{
    calculate_ats_score, score_directory, AtsReport, AtsScorer, BatchOptions, BatchSummary,
    EmbeddingBackend, IgnoreList, KeywordScore, ScorerConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "ruster_ats", version)]
#[command(about = "Score resumes for ATS compatibility")]
struct Cli {
    /// Embedding endpoint base URL, `hashing` or `none` (overrides ATS_EMBEDDING_URL)
    #[arg(long, global = true)]
    embedding: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full ATS report for one resume against a job description
    Score {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        job: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Heuristic score against an explicit keyword list
    Keywords {
        #[arg(long)]
        resume: PathBuf,
        /// Comma-separated keywords
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Score every resume in a directory
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        job: PathBuf,
        /// Max concurrent scorings (default: ATS_BATCH_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
        /// Extra gitignore-style exclude pattern, repeatable
        #[arg(long)]
        exclude: Vec<String>,
        /// Resume file extension, repeatable (default: txt, md)
        #[arg(long = "ext")]
        extensions: Vec<String>,
        /// Walk hidden files and directories
        #[arg(long)]
        hidden: bool,
        #[arg(long)]
        json: bool,
    },

    /// Validate an ignore file; exits non-zero when any line is invalid
    CheckIgnore { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ScorerConfig::from_env()?;
    if let Some(value) = cli.embedding.as_deref() {
        config.embedding = EmbeddingBackend::from_env_value(Some(value));
    }

    match cli.command {
        Command::Score { resume, job, json } => {
            let scorer = AtsScorer::from_config(&config);
            let resume_text = read_text(&resume).await?;
            let job_text = read_text(&job).await?;

            let report = calculate_ats_score(&scorer, &resume_text, &job_text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Keywords {
            resume,
            keywords,
            json,
        } => {
            let resume_text = read_text(&resume).await?;
            let score = KeywordScore::evaluate(&resume_text, &keywords);
            if json {
                println!("{}", serde_json::to_string_pretty(&score)?);
            } else {
                print_keyword_score(&score);
            }
        }

        Command::Batch {
            dir,
            job,
            concurrency,
            exclude,
            extensions,
            hidden,
            json,
        } => {
            let scorer = Arc::new(AtsScorer::from_config(&config));
            let job_text = read_text(&job).await?;

            let mut opts = BatchOptions {
                exclude,
                concurrency: concurrency.unwrap_or(config.batch_concurrency),
                include_hidden: hidden,
                ..BatchOptions::default()
            };
            if !extensions.is_empty() {
                opts.extensions = extensions
                    .into_iter()
                    .map(|e| e.trim_start_matches('.').to_string())
                    .collect();
            }

            let summary = score_directory(scorer, &dir, &job_text, &opts).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_batch(&summary);
            }
        }

        Command::CheckIgnore { file } => {
            let contents = read_text(&file).await?;
            let issues = IgnoreList::validate(&contents);
            if issues.is_empty() {
                let root = file.parent().unwrap_or(Path::new("."));
                let list = IgnoreList::parse(root, &contents)?;
                println!("✅ {}: {} patterns OK", file.display(), list.len());
            } else {
                for issue in &issues {
                    println!("❌ {}: {}", file.display(), issue);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", title);
    for item in items {
        println!("   • {}", item);
    }
}

fn print_report(report: &AtsReport) {
    println!("\n📄 {}", report.summary());
    println!(
        "   Format: {:.0}/100 | Keywords matched: {}",
        report.format_analysis.score, report.content_analysis.keyword_match
    );

    print_list("Format issues:", &report.format_analysis.issues);
    print_list("Strengths:", &report.strengths);
    print_list("Weaknesses:", &report.weaknesses);
    print_list("Improvements:", &report.improvements);
    print_list("Content suggestions:", &report.content_analysis.suggestions);
}

fn print_keyword_score(score: &KeywordScore) {
    println!(
        "\n{} ATS {:.2}/100 [{}]",
        score.level.emoji(),
        score.total,
        score.level.as_str()
    );
    for factor in &score.breakdown {
        println!(
            "   {:<12} {:>6.2} (x{:.2})  {}",
            factor.name, factor.score, factor.weight, factor.reason
        );
    }
    println!("\n{}", score.recommendation);
}

fn print_batch(summary: &BatchSummary) {
    println!(
        "\n📦 {} resumes: {} scored, {} failed, average {:.2}",
        summary.total, summary.succeeded, summary.failed, summary.average_score
    );
    for (level, count) in &summary.by_level {
        println!("   {:<10} {}", level, count);
    }
    println!();
    for item in &summary.results {
        match (&item.report, &item.error) {
            (Some(report), _) => println!(
                "   {} {:>6.2}  {}",
                report.level.emoji(),
                report.ats_score,
                item.id
            ),
            (None, Some(err)) => println!("   ❌ {:>6}  {} ({}: {})", "-", item.id, err.code, err.message),
            (None, None) => println!("   ❔ {:>6}  {}", "-", item.id),
        }
    }
}
