//! `gitscope visible` command - check an object id against the gate.

use anyhow::Result;

use super::utils::open_session;
use super::{Global, Target};
use crate::output;
use crate::services::VisibleService;

/// Run the visible command.
pub fn run(global: &Global<'_>, target: &Target, id: &str) -> Result<()> {
    let session = open_session(global, target)?;
    let service = VisibleService::new(&session.repo, &session.access, &session.gate);
    let mut walk = session.repo.walk()?;

    let visible = service.check(&mut walk, id)?;
    output::essential(&output::visibility(visible));
    Ok(())
}
