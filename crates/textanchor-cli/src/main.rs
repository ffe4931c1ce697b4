mod chunks_cmd;
mod cli;
mod invoice_cmd;
mod overlay_cmd;
mod page_range;
mod search_cmd;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Text {
            ref file,
            ref pages,
            ref format,
        } => text_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Chunks {
            ref file,
            ref pages,
            ref format,
        } => chunks_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Search {
            ref file,
            ref query,
            all,
            ref pages,
            ref format,
        } => search_cmd::run(file, query, all, pages.as_deref(), format),
        cli::Commands::Invoice {
            ref file,
            ref settings,
            ref format,
        } => invoice_cmd::run(file, settings.as_deref(), format),
        cli::Commands::Overlay {
            ref file,
            ref text,
            ref reference,
            offset,
            align,
            all,
        } => overlay_cmd::run(file, text, reference, offset, align.into(), all),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
