// src/cli/repl.rs

// --- Imports ---
use crate::assistant::Assistant;
use crate::cli::helper::ReplHelper;
use crate::error::Result;
use crate::intent::{classify, Intent};
use crate::news::{display_news, parse_news_structure};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

// --- Constants ---
const HISTORY_FILE: &str = "history.txt";
const PROMPT: &str = "\nВаш вопрос: ";
const FAREWELL_MSG: &str = "До свидания!";
const STOPPED_MSG: &str = "\n\n[ОСТАНОВЛЕНО] Работа прервана пользователем";
const RULE_WIDTH: usize = 50;

/// What the loop does after one line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// --- History File Helper ---
fn get_history_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("news-chat");
    std::fs::create_dir_all(&path).ok();
    path.push(HISTORY_FILE);
    path
}

// --- Main REPL Function ---
pub async fn run_interactive(assistant: &mut Assistant) -> Result<()> {
    info!(provider = assistant.provider_name(), model = assistant.model(), "Starting interactive news chat session.");

    // --- Setup Rustyline Editor ---
    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ReplHelper::new()));
    let history_path = get_history_path();
    if let Err(e) = rl.load_history(&history_path) {
        warn!("Failed to load command history from {:?}: {}", history_path, e);
    }

    print_banner(&mut io::stdout(), assistant)?;

    // --- Main Loop ---
    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    if let Err(e) = rl.add_history_entry(input) {
                        warn!("Failed to add line to history: {}", e);
                    }
                }

                let flow = run_turn(assistant, input, &mut io::stdout(), tokio::signal::ctrl_c()).await;
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(err) => {
                handle_readline_error(&err, &mut io::stdout())?;
                break;
            }
        }
    } // --- End Main Loop ---

    // --- Save history ---
    if let Err(e) = rl.save_history(&history_path) {
        error!("Failed to save command history to {:?}: {}", history_path, e);
    }

    info!("Exiting interactive news chat session.");
    Ok(())
}

/// Runs one line against `interrupt`; an interrupt drops the in-flight request and ends the session.
pub async fn run_turn<F>(assistant: &mut Assistant, input: &str, out: &mut impl Write, interrupt: F) -> Flow
where
    F: Future,
{
    let outcome = tokio::select! {
        res = handle_input(assistant, input, &mut *out) => Some(res),
        _ = interrupt => None,
    };

    let (flow, shown) = match outcome {
        Some(Ok(flow)) => return flow,
        Some(Err(e)) => {
            error!("Iteration failed: {:?}", e);
            (Flow::Continue, writeln!(out, "\n[ОШИБКА] Ошибка: {}", e))
        }
        None => (Flow::Exit, writeln!(out, "{}", STOPPED_MSG)),
    };
    if let Err(e) = shown {
        error!("Failed to write to the terminal: {}", e);
    }
    flow
}

// Every readline error ends the session; only the message differs.
fn handle_readline_error(err: &ReadlineError, out: &mut impl Write) -> Result<()> {
    match err {
        ReadlineError::Interrupted => writeln!(out, "{}", STOPPED_MSG)?,
        ReadlineError::Eof => writeln!(out, "{}", FAREWELL_MSG)?,
        other => {
            error!("Readline error: {:?}", other);
            eprintln!("Input Error: {}", other);
        }
    }
    Ok(())
}

// --- Helper Functions ---

fn print_banner(out: &mut impl Write, assistant: &Assistant) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "ИНТЕРАКТИВНЫЙ ПАРСЕР НОВОСТЕЙ")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Провайдер: {} (модель: {})", assistant.provider_name(), assistant.model())?;
    writeln!(out, "Доступные команды:")?;
    writeln!(out, "* 'новости' - получить свежие новости")?;
    writeln!(out, "* 'выход' или 'quit' - завершить работу")?;
    writeln!(out, "* Любой другой вопрос - получить ответ на тему")?;
    writeln!(out, "{}", rule)?;
    Ok(())
}

fn print_block(out: &mut impl Write, title: &str, body: &str) -> Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(out, "\n{}", title)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", body)?;
    writeln!(out, "{}", rule)?;
    Ok(())
}

/// Handles one trimmed input line and writes everything it shows to `out`.
pub async fn handle_input(assistant: &mut Assistant, input: &str, out: &mut impl Write) -> Result<Flow> {
    match classify(input) {
        Intent::Skip => Ok(Flow::Continue),
        Intent::Exit => {
            writeln!(out, "{}", FAREWELL_MSG)?;
            Ok(Flow::Exit)
        }
        Intent::News => {
            handle_news_request(assistant, out).await?;
            Ok(Flow::Continue)
        }
        Intent::Question(question) => {
            handle_question(assistant, question, out).await?;
            Ok(Flow::Continue)
        }
    }
}

// --- News Handler ---
async fn handle_news_request(assistant: &Assistant, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n[ОЖИДАНИЕ] Получение актуальных новостей...")?;
    out.flush()?;

    let digest = match assistant.get_news_response().await {
        Ok(digest) => digest,
        Err(e) => {
            warn!(error = %e, "News request failed");
            writeln!(out, "[ОШИБКА] {}", e)?;
            return Ok(());
        }
    };

    let items = parse_news_structure(&digest);
    debug!(items = items.len(), "Parsed news digest");
    if items.is_empty() {
        print_block(out, "НОВОСТИ:", &digest)
    } else {
        display_news(&items, out)
    }
}

// --- Question Handler ---
async fn handle_question(assistant: &mut Assistant, question: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n[ОЖИДАНИЕ] Обработка запроса...")?;
    out.flush()?;

    match assistant.get_interactive_response(question).await {
        Ok(answer) => print_block(out, "ОТВЕТ:", &answer),
        Err(e) => {
            writeln!(out, "\n[ОШИБКА] {}", e)?;
            Ok(())
        }
    }
}
