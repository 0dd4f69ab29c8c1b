mod db;
mod loader;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quizbank", about = "Markdown question-bank parser and store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse quiz markdown files and import them into the bank
    Import {
        /// Directory to scan for .md quiz files
        #[arg(short, long, default_value = "questions")]
        dir: PathBuf,
        /// Max files to import (default: all discovered)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Parse a single file and print its questions as JSON
    Parse {
        file: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Questions overview table
    Overview {
        /// Filter by specialty (e.g. "Cardiology")
        #[arg(short, long)]
        specialty: Option<String>,
        /// Filter by quiz name
        #[arg(short, long)]
        quiz: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show bank statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { dir, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let mut files = loader::discover(&dir)?;
            if let Some(n) = limit {
                files.truncate(n);
            }
            if files.is_empty() {
                println!("No .md files found in {}.", dir.display());
                return Ok(());
            }
            let total_bytes: u64 = files.iter().map(|f| f.size).sum();
            println!(
                "Importing {} quiz files ({} KB)...",
                files.len(),
                total_bytes / 1024
            );
            let counts = import_files(&conn, &files)?;
            counts.print();
            Ok(())
        }
        Commands::Parse { file, output } => {
            let loaded = loader::load(&file)?;
            let json = serde_json::to_string_pretty(&*loaded.records)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!(
                        "Wrote {} questions to {}",
                        loaded.records.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Overview { specialty, quiz, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, specialty.as_deref(), quiz.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No questions found.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<20} | {:<18} | {:<32} | {:>4} | {:<3} | {:<3}",
                "#", "Quiz", "Specialty", "Title", "Opts", "Ans", "Img"
            );
            println!("{}", "-".repeat(100));
            for row in &rows {
                println!(
                    "{:>4} | {:<20} | {:<18} | {:<32} | {:>4} | {:<3} | {:<3}",
                    row.question_id,
                    truncate(&row.quiz_name, 20),
                    truncate(&row.specialty, 18),
                    truncate(&row.title, 32),
                    row.option_count,
                    if row.has_answer { "yes" } else { "-" },
                    if row.has_image { "yes" } else { "-" },
                );
            }
            println!("\n{} questions", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Quizzes:          {}", s.quizzes);
            println!("Questions:        {}", s.questions);
            println!("Specialties:      {}", s.specialties);
            println!("With answer:      {}", s.answered);
            println!("With image:       {}", s.with_image);
            println!("With explanation: {}", s.with_explanation);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ImportCounts {
    quizzes: usize,
    questions: usize,
    errors: usize,
}

impl ImportCounts {
    fn print(&self) {
        println!(
            "Imported {} quizzes, {} questions ({} errors).",
            self.quizzes, self.questions, self.errors,
        );
    }
}

fn import_files(
    conn: &rusqlite::Connection,
    files: &[loader::QuizFile],
) -> anyhow::Result<ImportCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut counts = ImportCounts {
        quizzes: 0,
        questions: 0,
        errors: 0,
    };

    for chunk in files.chunks(32) {
        let loaded: Vec<_> = chunk.par_iter().map(|f| loader::load(&f.path)).collect();

        for (file, result) in chunk.iter().zip(loaded) {
            match result {
                Ok(quiz) => {
                    let meta = db::QuizMeta {
                        name: quiz.name.clone(),
                        source_path: file.path.display().to_string(),
                        content_hash: quiz.hash.clone(),
                    };
                    db::save_quiz(conn, &meta, &quiz.records)?;
                    counts.quizzes += 1;
                    counts.questions += quiz.records.len();
                }
                Err(e) => {
                    tracing::warn!("{}: {:#}", file.path.display(), e);
                    counts.errors += 1;
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
