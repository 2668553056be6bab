use colored::Colorize;
use phishscan::commands::command_argument_builder;
use phishscan::handlers::{handle_analyze, handle_features, print_banner};
use tracing::Level;

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if quiet { Level::WARN } else { Level::INFO })
        .init();

    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("analyze", primary_command)) => handle_analyze(primary_command).await,
        Some(("features", primary_command)) => handle_features(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
