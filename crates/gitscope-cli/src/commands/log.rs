//! `gitscope log` command - show one page of history.

use anyhow::{Context, Result, bail};
use gitscope_git::{ObjectId, ObjectReader};

use super::utils::open_session;
use super::{Global, Target};
use crate::output;
use crate::services::{LogPage, LogService};

/// Run the log command.
pub fn run(
    global: &Global<'_>,
    target: &Target,
    path: &str,
    limit: Option<usize>,
    start: Option<&str>,
    json: bool,
) -> Result<()> {
    let session = open_session(global, target)?;
    let limit = session.config.log.page_limit(limit);
    let start = start
        .map(|hex| {
            ObjectId::from_str(hex).with_context(|| format!("'{hex}' is not a full object id"))
        })
        .transpose()?;

    let service = LogService::new(&session.repo, &session.access, &session.gate);
    let Some(page) = service.page(session.repo.walk()?, path, limit, start)? else {
        bail!("{path}: not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page, session.repo.name());
    }
    Ok(())
}

/// Print a page in human-readable format.
fn print_page(page: &LogPage, repository: &str) {
    match &page.old_revision {
        Some(old) => output::info(&format!(
            "{repository}: {} .. {}",
            output::revision(old),
            output::revision(&page.revision)
        )),
        None => output::info(&format!("{repository}: {}", output::revision(&page.revision))),
    }

    if page.commits.is_empty() {
        output::warn("No commits in range");
    }
    for commit in &page.commits {
        output::essential(&format!(
            "{} {:<50} {}",
            output::short_id(&commit.id),
            commit.summary,
            commit.author
        ));
    }

    if let Some(previous) = &page.previous {
        output::info(&format!("previous page: --start {previous}"));
    }
    if let Some(next) = &page.next {
        output::info(&format!("next page: --start {next}"));
    }
}
