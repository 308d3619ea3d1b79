use std::path::PathBuf;

use anyhow::{Context, Result};
use gitscope_core::{Config, PrincipalKey, StaticAccess, VisibilityGate};
use gitscope_git::Repository;
use tracing::debug;

use super::{Global, Target};

/// Config file looked up inside the git directory.
pub const CONFIG_FILE: &str = "gitscope.toml";

/// Everything a command needs to serve one request.
pub struct Session {
    pub repo: Repository,
    pub config: Config,
    pub gate: VisibilityGate,
    pub access: StaticAccess,
}

/// Helper to open the target repository with its configuration.
pub fn open_session(global: &Global<'_>, target: &Target) -> Result<Session> {
    let repo = Repository::open(&target.repo)
        .with_context(|| format!("Not inside a git repository: {}", target.repo.display()))?;

    let config_path = global
        .config
        .map_or_else(|| repo.git_dir().join(CONFIG_FILE), PathBuf::from);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    debug!(path = %config_path.display(), "loaded config");

    let repo = repo.with_reachability_limit(config.walk.reachability_limit);
    let gate = VisibilityGate::from_config(&config.visibility);
    let access = target
        .user
        .as_deref()
        .map_or_else(StaticAccess::anonymous, |user| {
            StaticAccess::new(PrincipalKey::new(user))
        });

    Ok(Session {
        repo,
        config,
        gate,
        access,
    })
}
