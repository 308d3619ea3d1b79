//! gitscope CLI - resolve, page and gate git browser requests.

use clap::Parser;

mod commands;
mod logging;
mod output;
mod services;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    output::set_quiet(cli.quiet);
    logging::init(cli.verbose);

    let global = commands::Global {
        config: cli.config.as_deref(),
    };
    let result = match cli.command {
        Commands::Resolve { path, target, json } => {
            commands::resolve::run(&global, &target, &path, json)
        }
        Commands::Log {
            path,
            target,
            limit,
            start,
            json,
        } => commands::log::run(&global, &target, &path, limit, start.as_deref(), json),
        Commands::Visible { id, target } => commands::visible::run(&global, &target, &id),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
