//! Operator approval between discovery and processing

use std::io::{self, BufRead, Write};
use url::Url;

/// Number of discovered URLs listed before the prompt
const PREVIEW_LEN: usize = 10;

/// Decides whether a discovered URL set gets processed
pub trait Confirmation: Send {
    fn confirm(&mut self, discovered: &[Url]) -> bool;
}

/// Approves every run without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&mut self, _discovered: &[Url]) -> bool {
        true
    }
}

/// Asks on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&mut self, discovered: &[Url]) -> bool {
        println!("Discovered {} URLs:", discovered.len());
        for url in discovered.iter().take(PREVIEW_LEN) {
            println!("  - {}", url);
        }
        if discovered.len() > PREVIEW_LEN {
            println!("  ... and {} more", discovered.len() - PREVIEW_LEN);
        }
        print!("Process these URLs? [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

/// Accepts `y`, `yes`, `o` and `oui`, case-insensitively
fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "o" | "oui"
    )
}
