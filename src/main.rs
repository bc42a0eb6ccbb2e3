// pimpterm - Terminal background image customizer
// Applies an alpha cap to an image and points the terminal config at it

mod app;
mod cli;
mod collection;
mod composer;
mod qterminal;

use anyhow::Result;
use log::info;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    // Parse command line arguments
    let args = cli::parse_args();

    info!(
        "Customizing {} with target: {}, alpha: {}",
        args.terminal,
        args.target.display(),
        args.alpha
    );

    match app::App::new(args).run(&mut rand::thread_rng())? {
        app::Outcome::Applied { image } => {
            info!("Background image set to {}", image.display());
        }
        app::Outcome::Unsupported(name) => {
            info!("Work in progress: {name} is not supported yet");
        }
    }
    Ok(())
}
