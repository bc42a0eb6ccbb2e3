// Application module
// Dispatches on the target terminal and runs its customization flow

use crate::cli::{ParsedArgs, Terminal};
use crate::collection;
use crate::composer::{self, ComposeError};
use crate::qterminal::{PatchError, QTerminalConfig};
use log::info;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} is not an absolute path")]
    RelativeTarget(PathBuf),

    #[error("{0} does not exist")]
    TargetNotFound(PathBuf),

    #[error("could not locate user qterminal config file {0}")]
    ConfigNotFound(PathBuf),

    #[error("no usable images found in {0}")]
    EmptyCollection(PathBuf),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// What a run ended up doing
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The terminal config now points at `image`
    Applied { image: PathBuf },
    /// No config writer for this terminal yet
    Unsupported(String),
}

/// Main application state
pub struct App {
    target: PathBuf,
    alpha: u8,
    terminal: Terminal,
    config: QTerminalConfig,
}

impl App {
    pub fn new(args: ParsedArgs) -> Self {
        Self {
            target: args.target,
            alpha: args.alpha,
            terminal: args.terminal,
            config: QTerminalConfig::new(args.config_path),
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Outcome, AppError> {
        match &self.terminal {
            Terminal::QTerminal => self.run_qterminal(rng),
            Terminal::Unsupported(name) => Ok(Outcome::Unsupported(name.clone())),
        }
    }

    fn run_qterminal<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Outcome, AppError> {
        if !self.target.is_absolute() {
            return Err(AppError::RelativeTarget(self.target.clone()));
        }

        info!("Searching for user qterminal config file...");
        info!("Config file: {}", self.config.path().display());
        if !self.config.exists() {
            return Err(AppError::ConfigNotFound(self.config.path().to_path_buf()));
        }
        info!("Located user qterminal config file");

        let source = self.pick_source(rng)?;
        let image = composer::compose_or_original(&source, self.alpha, self.terminal.name())?;

        self.config.patch(&image)?;
        info!("Restart the terminal to apply changes");
        Ok(Outcome::Applied { image })
    }

    /// The target itself, or a random image when it is a collection
    fn pick_source<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathBuf, AppError> {
        if self.target.is_file() {
            return Ok(self.target.clone());
        }
        if !self.target.exists() {
            return Err(AppError::TargetNotFound(self.target.clone()));
        }

        info!("Pulling random image from {}", self.target.display());
        let images = collection::scan(&self.target, self.terminal.name());
        let picked = collection::choose(&images, rng)
            .ok_or_else(|| AppError::EmptyCollection(self.target.clone()))?;
        info!("Picked {} of {} images", file_label(picked), images.len());
        Ok(picked.clone())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
