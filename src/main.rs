mod cli;
mod control;
mod editor;
mod error;
mod logging;
mod processing;
mod track;
mod video;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::LoggingConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&LoggingConfig {
        level: cli.log_level,
        json: cli.log_json,
    });

    match cli.command {
        Commands::Track(args) => {
            track::run(args.into())?;
        }
        Commands::Image {
            inputs,
            output,
            effect,
        } => {
            println!("Applying {} to {} image(s)", effect, inputs.len());
            let saved = editor::process_images(&inputs, effect, &output)?;
            for path in &saved {
                println!("  {}", path.display());
            }
            println!("\nDone! Output saved to: {}", output.display());
        }
    }

    Ok(())
}
