use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod catalog;
mod chatbot;
mod classify;
mod db;
mod models;
mod report;
mod risk;
mod service;
mod session;

use catalog::Catalog;
use service::{Action, InMemorySessionStore, TriageService};

#[derive(Parser)]
#[command(name = "symptom-triage")]
#[command(about = "Symptom-guided triage questionnaire with severity scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a triage questionnaire for a symptom
    Ask {
        /// Free-text symptom, e.g. "stomach pain since lunch"
        symptom: String,
        #[arg(long)]
        description: Option<String>,
        /// CSV of question_id,answer rows for a non-interactive run
        #[arg(long)]
        answers: Option<PathBuf>,
        /// Write the markdown report to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Archive the report in Postgres (requires DATABASE_URL)
        #[arg(long)]
        save: bool,
    },
    /// Keyword chatbot on stdin
    Chat,
    /// Create or upgrade the database schema
    InitDb,
    /// List archived reports
    History {
        #[arg(long, default_value_t = 10)]
        limit: i64,
        #[arg(long)]
        severity: Option<String>,
    },
    /// Print an archived report
    Show { session_id: String },
    /// Delete an archived report and its feedback
    Delete { session_id: String },
    /// Attach feedback to an archived report
    Feedback {
        session_id: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        rating: Option<i32>,
        #[arg(long, default_value = "general")]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            symptom,
            description,
            answers,
            out,
            save,
        } => {
            let catalog = Catalog::load().context("template catalog failed validation")?;
            let mut service = TriageService::new(catalog, InMemorySessionStore::new());

            let started = service.start(&symptom, description.as_deref().unwrap_or(""));
            println!("{}", started.message);
            log::debug!("{} active session(s)", service.active_sessions());
            if started.question.is_none() {
                println!("No questions configured for this symptom.");
                return Ok(());
            }

            match &answers {
                Some(path) => run_scripted(&mut service, &started.session_id, path)?,
                None => run_interactive(&mut service, &started.session_id)?,
            }

            let report = service.report(&started.session_id)?;
            let rendered = report::render_markdown(&report);
            match &out {
                Some(path) => {
                    std::fs::write(path, &rendered)?;
                    println!("Report written to {}.", path.display());
                }
                None => println!("\n{rendered}"),
            }

            if save {
                let pool = connect().await?;
                let session = service.session(&started.session_id)?;
                db::save_report(&pool, session, &report).await?;
                println!("Report archived under session {}.", started.session_id);
            }
            service.finish(&started.session_id)?;
        }
        Commands::Chat => run_chat()?,
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::History { limit, severity } => {
            let pool = connect().await?;
            let summaries = db::list_reports(&pool, limit, severity.as_deref()).await?;
            if summaries.is_empty() {
                println!("No archived reports.");
                return Ok(());
            }
            for summary in summaries {
                println!(
                    "- {} \"{}\" severity {} (score {}) at {}",
                    summary.session_id,
                    summary.symptom,
                    summary.severity,
                    summary.risk_score,
                    summary.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Commands::Show { session_id } => {
            let pool = connect().await?;
            let archived = db::fetch_report(&pool, &session_id)
                .await?
                .with_context(|| format!("no archived report for session {session_id}"))?;
            println!(
                "Session {} (archived {})",
                archived.session_id,
                archived.created_at.format("%Y-%m-%d %H:%M")
            );
            println!(
                "Symptom: {} ({}), severity {} (score {})",
                archived.symptom, archived.initial_description, archived.severity,
                archived.risk_score
            );
            println!();
            let report: models::Report = serde_json::from_value(archived.report)
                .context("archived report payload is malformed")?;
            println!("{}", report::render_markdown(&report));

            let feedback = db::list_feedback(&pool, &session_id).await?;
            if !feedback.is_empty() {
                println!("## Feedback");
                for entry in feedback {
                    let rating = entry
                        .rating
                        .map(|r| format!("{r}/5"))
                        .unwrap_or_else(|| "unrated".to_string());
                    println!(
                        "- [{}] {} ({}) at {}",
                        entry.feedback_type,
                        entry.comment,
                        rating,
                        entry.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        Commands::Delete { session_id } => {
            let pool = connect().await?;
            if db::delete_report(&pool, &session_id).await? {
                println!("Deleted archived report for session {session_id}.");
            } else {
                println!("No archived report for session {session_id}.");
            }
        }
        Commands::Feedback {
            session_id,
            comment,
            rating,
            kind,
        } => {
            let pool = connect().await?;
            db::add_feedback(&pool, &session_id, rating, &comment, &kind).await?;
            println!("Feedback recorded for session {session_id}.");
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn run_chat() -> anyhow::Result<()> {
    println!("{}", chatbot::respond("hello"));
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        println!("{}", chatbot::respond(input));
        if input.eq_ignore_ascii_case("bye") {
            break;
        }
    }
    Ok(())
}

fn run_interactive(
    service: &mut TriageService<InMemorySessionStore>,
    session_id: &str,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(question) = service.current_question(session_id)? else {
            break;
        };

        println!();
        println!(
            "[{}/{}, {:.0}%] {}",
            question.current, question.total, question.progress, question.question
        );
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}. {}", index + 1, option);
        }
        print!("> answer (number or text, `s` skip, `b` back): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed; the report treats the rest as unanswered.
            break;
        };
        let line = line?;
        let input = line.trim();

        let outcome = if input.eq_ignore_ascii_case("s") {
            service.submit_answer(session_id, "", Action::Skip)?
        } else if input.eq_ignore_ascii_case("b") {
            service.submit_answer(session_id, "", Action::Previous)?
        } else {
            let answer = match input.parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => {
                    question.options[n - 1].clone()
                }
                _ => input.to_string(),
            };
            service.submit_answer(session_id, &answer, Action::Next)?
        };

        if outcome.completed {
            println!("\nQuestionnaire completed!");
            break;
        }
    }

    Ok(())
}

fn run_scripted(
    service: &mut TriageService<InMemorySessionStore>,
    session_id: &str,
    path: &Path,
) -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct AnswerRow {
        question_id: String,
        answer: String,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open answers file {}", path.display()))?;
    let mut answers: HashMap<String, String> = HashMap::new();
    for result in reader.deserialize::<AnswerRow>() {
        let row: AnswerRow = result?;
        answers.insert(row.question_id, row.answer);
    }

    loop {
        let Some(question) = service.current_question(session_id)? else {
            break;
        };
        let outcome = match answers.get(&question.id) {
            Some(answer) => service.submit_answer(session_id, answer, Action::Next)?,
            None => {
                log::warn!("no scripted answer for `{}`; skipping", question.id);
                service.submit_answer(session_id, "", Action::Skip)?
            }
        };
        if outcome.completed {
            break;
        }
    }

    Ok(())
}
