//! deja application binary - composition root.
//!
//! Ties the crates together:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Open the SQLite store and build the model client
//! 4. Run the requested surface: interactive prompt loop, one-shot `ask`,
//!    or `history` listing
//!
//! Requests are processed strictly one at a time: the prompt loop does not
//! accept the next question until the current one has finished (retrieval,
//! possibly generation, possibly persistence).

mod cli;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use deja_chat::{format_error, format_reply, AnswerWorkflow};
use deja_core::DejaConfig;
use deja_model::GeminiClient;
use deja_store::{ConversationRepository, Database};

use crate::cli::{CliArgs, Command};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let config = DejaConfig::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    args.resolve_log_level(&config.general.log_level),
                )
            }),
        )
        .init();

    info!("Using configuration from {}", config_path.display());

    let db_path = args.resolve_db_path(&config.general.data_dir);
    let db = match Database::new(&db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("deja: cannot open database at {}: {}", db_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // Credential missing or client construction failing is fatal for the
    // session and reported exactly once.
    let model = match GeminiClient::from_env(&config.model) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("deja: {}", e);
            eprintln!(
                "deja: set the API key in the {} environment variable and restart.",
                config.model.api_key_env
            );
            return ExitCode::FAILURE;
        }
    };

    let model_label = model.model().to_string();
    let repo = ConversationRepository::new(Arc::clone(&db), config.storage.answer_capacity);
    let workflow = AnswerWorkflow::new(repo, model, &config.retrieval);

    match args.command {
        Some(Command::Ask { question }) => {
            answer_one(&workflow, &question.join(" "), &model_label);
            ExitCode::SUCCESS
        }
        Some(Command::History { limit }) => match print_history(&workflow, limit) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("deja: {}", e);
                ExitCode::FAILURE
            }
        },
        None => match prompt_loop(&workflow, &model_label) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("deja: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Resolve one question and print the outcome.
///
/// Generation failures are printed inline with the question still visible;
/// they never end the session.
fn answer_one(workflow: &AnswerWorkflow<GeminiClient>, question: &str, model_label: &str) {
    // The model call is unbounded, so show a notice before the wait.
    println!("deja is thinking...");
    match workflow.ask(question) {
        Ok(reply) => println!("{}\n", format_reply(question, &reply, model_label)),
        Err(e) => println!("{}\n", format_error(question, &e)),
    }
}

/// Interactive prompt loop: one request at a time, `quit`/`exit` to leave.
fn prompt_loop(workflow: &AnswerWorkflow<GeminiClient>, model_label: &str) -> io::Result<()> {
    println!("deja — ask a question ('quit' to leave)");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        answer_one(workflow, input, model_label);
    }

    Ok(())
}

/// Print stored exchanges, newest first.
fn print_history(
    workflow: &AnswerWorkflow<GeminiClient>,
    limit: u64,
) -> Result<(), deja_core::DejaError> {
    let records = workflow.repository().recent(limit)?;
    if records.is_empty() {
        println!("no stored exchanges yet");
        return Ok(());
    }
    for record in records {
        println!("[{}]", record.created_at_display());
        println!("Q: {}", record.question);
        println!("A: {}\n", record.answer);
    }
    Ok(())
}
