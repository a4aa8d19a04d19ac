//! Wallet top-up input
//!
//! The amount is asked for synchronously. Only non-empty input that parses
//! entirely as a finite, strictly positive number is sent to the server;
//! business limits are left to the server.

use std::io::{BufRead, Write};

pub const TOP_UP_PROMPT: &str = "Enter amount to add to wallet:";

/// Source of the amount typed by the user
pub trait AmountPrompt: Send + Sync {
    /// Ask the user. `None` means the prompt was cancelled.
    fn ask(&self, message: &str) -> Option<String>;
}

/// Prompt answered ahead of time (command-line flag, scripted input)
#[derive(Debug, Clone, Default)]
pub struct FixedAmount(pub Option<String>);

impl AmountPrompt for FixedAmount {
    fn ask(&self, _message: &str) -> Option<String> {
        self.0.clone()
    }
}

/// Prompt on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl AmountPrompt for TerminalPrompt {
    fn ask(&self, message: &str) -> Option<String> {
        print!("{} ", message);
        std::io::stdout().flush().ok()?;

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Validate a typed amount. Returns the amount to credit, or `None` when
/// the input must not reach the server.
pub fn parse_top_up_amount(input: Option<&str>) -> Option<f64> {
    let text = input?.trim();
    if text.is_empty() {
        return None;
    }

    let amount: f64 = text.parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}
