use clap::Parser;
use std::process;
use taskchat::cli::{Cli, Commands};
use taskchat::cli_handlers;
use taskchat::config::Settings;

fn main() {
    // Logs go to stderr so stdout stays clean for the console protocol
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::new(cli.data_dir);

    let result = match cli.command {
        Commands::Chat { llm, greet } => {
            cli_handlers::handle_chat(&settings.with_llm(llm.into()), greet)
        }
        Commands::Add { task } => cli_handlers::handle_add(&settings, &task),
        Commands::List => cli_handlers::handle_list(&settings),
        Commands::Remove { task } => cli_handlers::handle_remove(&settings, &task),
        Commands::Echo => cli_handlers::handle_echo(),
        Commands::Ask { prompt, llm } => {
            cli_handlers::handle_ask(&settings.with_llm(llm.into()), &prompt)
        }
        Commands::Todo { id, mock } => cli_handlers::handle_todo(id, mock.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
