use colored::Colorize;

use crate::session::DisabledReason;

/// Terminal status lines on stderr. Stdout is reserved for command output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Always shown, even with `--quiet`.
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", warning_line(msg));
    }

    pub fn note(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", note_line(msg));
        }
    }

    pub fn done(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{} {}", "done!".green().bold(), msg);
        }
    }

    /// A missing declaration file is a warning; an empty one is informational.
    pub fn disabled(&self, reason: &DisabledReason) {
        match reason {
            DisabledReason::MissingDeclarations(_) => self.warn(&reason.to_string()),
            DisabledReason::NoVariables(_) => self.note(&reason.to_string()),
        }
    }
}

pub fn warning_line(msg: &str) -> String {
    format!("{} {}", "warning:".yellow().bold(), msg)
}

pub fn note_line(msg: &str) -> String {
    format!("  {} {}", "note:".yellow().bold(), msg)
}

/// Pluralize `noun` for `count`, e.g. `1 file`, `3 files`.
pub fn count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
