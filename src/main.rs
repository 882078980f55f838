use clap::Parser;
use lockbox::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref label,
            ref value,
        } => lockbox::cli::commands::add::execute(&cli, label, value.as_deref()),
        Commands::Get { id } => lockbox::cli::commands::get::execute(&cli, id),
        Commands::List => lockbox::cli::commands::list::execute(&cli),
        Commands::Delete { id, force } => {
            lockbox::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Completions { ref shell } => {
            lockbox::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        lockbox::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
