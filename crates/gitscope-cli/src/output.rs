//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use gitscope_core::Revision;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for the result of a command, like resolved ids or commit lines.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// First seven hex digits of an id, colored.
#[must_use]
pub fn short_id(id: &str) -> String {
    id.get(..7).unwrap_or(id).yellow().to_string()
}

/// One resolved revision: name, abbreviated id and object type. Annotated
/// tags also show what they peel to.
#[must_use]
pub fn revision(rev: &Revision) -> String {
    if rev.is_null() {
        return format!("{} (empty tree)", "∅".dimmed());
    }

    let mut line = format!(
        "{} {} ({})",
        rev.name().bold(),
        short_id(&rev.id().to_string()),
        rev.kind()
    );
    if rev.peeled_id() != rev.id() {
        line.push_str(&format!(
            " -> {} ({})",
            short_id(&rev.peeled_id().to_string()),
            rev.peeled_kind()
        ));
    }
    line
}

/// `visible` or `hidden`, colored.
#[must_use]
pub fn visibility(visible: bool) -> String {
    if visible {
        "visible".green().to_string()
    } else {
        "hidden".red().to_string()
    }
}
