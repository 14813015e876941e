use std::process::ExitCode;

use colored::Colorize;
use rgs_types::cli::CommandLineInterface;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command_line_interface = CommandLineInterface::load();
    match command_line_interface.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", format!("{}:", error.label()).as_str().red().bold());
            ExitCode::from(error.exit_code())
        }
    }
}
