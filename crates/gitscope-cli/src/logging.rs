//! Diagnostic logging to stderr.
//!
//! Filtered by `GITSCOPE_LOG` using `EnvFilter` directives, e.g.
//! `GITSCOPE_LOG=gitscope_core=debug`. Without it only warnings are shown,
//! or everything from gitscope at debug level with `--verbose`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "GITSCOPE_LOG";

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,gitscope_core=debug,gitscope_git=debug,gitscope=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
