// src/cli/helper.rs
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result as RustylineResult};

// Words the loop reacts to specially
const APP_COMMANDS: [&str; 6] = ["новости", "что нового", "выход", "quit", "exit", "q"];

/// Commands that start with what has been typed so far, ignoring case.
pub fn matching_commands(typed: &str) -> Vec<&'static str> {
    let typed = typed.trim_start().to_lowercase();
    if typed.is_empty() {
        return Vec::new();
    }
    APP_COMMANDS
        .iter()
        .copied()
        .filter(|cmd| cmd.starts_with(&typed) && *cmd != typed)
        .collect()
}

#[derive(Helper)]
pub struct ReplHelper {}

impl ReplHelper {
    pub fn new() -> Self {
        Self {}
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> RustylineResult<(usize, Vec<Self::Candidate>)> {
        // Only complete when the cursor sits at the end of the line
        if pos != line.len() {
            return Ok((pos, Vec::new()));
        }
        let start = line.len() - line.trim_start().len();
        let completions = matching_commands(line)
            .into_iter()
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        match matching_commands(line).as_slice() {
            [only] => {
                let typed = line.trim_start().chars().count();
                Some(only.chars().skip(typed).collect())
            }
            _ => None,
        }
    }
}

impl Validator for ReplHelper {}

impl Highlighter for ReplHelper {}
