//! `gitscope resolve` command - split a request path.

use anyhow::{Result, bail};

use super::utils::open_session;
use super::{Global, Target};
use crate::output;
use crate::services::{ResolveResult, ResolveService};

/// Run the resolve command.
pub fn run(global: &Global<'_>, target: &Target, path: &str, json: bool) -> Result<()> {
    let session = open_session(global, target)?;
    let service = ResolveService::new(&session.repo, &session.access, &session.gate);
    let mut walk = session.repo.walk()?;

    let Some(result) = service.resolve(&mut walk, path)? else {
        bail!("{path}: not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &ResolveResult) {
    output::essential(&format!("revision  {}", output::revision(&result.revision)));
    if let Some(old) = &result.old_revision {
        output::essential(&format!("old       {}", output::revision(old)));
    }
    if !result.path.is_empty() {
        output::essential(&format!("path      {}", result.path));
    }
}
