use super::messages::{header, warning};
use crate::core::prompt::{Alert, ConfirmRequest, Prompt};
use std::io::{self, BufRead, Write};

/// Yes/no questions on stdin; anything but an explicit yes declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "j" | "ja")
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, request: &ConfirmRequest) -> bool {
        header(&request.title);
        warning(&request.message);
        print!(
            "[y] {} / [N] {}: ",
            request.confirm_text, request.cancel_text
        );
        let _ = io::stdout().flush();

        let mut s = String::new();
        match io::stdin().lock().read_line(&mut s) {
            Ok(_) => is_yes(&s),
            Err(_) => false,
        }
    }

    fn alert(&self, alert: &Alert) {
        warning(&alert.message);
    }
}

/// Confirms everything (`--yes`); alerts are still shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, _request: &ConfirmRequest) -> bool {
        true
    }

    fn alert(&self, alert: &Alert) {
        warning(&alert.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("ja"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
