// QTerminal configuration module
// Points qterminal.ini at a new background image

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where QTerminal keeps its per-user settings
pub const DEFAULT_CONFIG: &str = "~/.config/qterminal.org/qterminal.ini";

const IMAGE_KEY: &str = "TerminalBackgroundImage";
const MODE_KEY: &str = "TerminalBackgroundMode";
/// Stretch the image across the whole terminal
const STRETCH_MODE: &str = "1";

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("could not locate terminal config file {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// How many lines a patch rewrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchSummary {
    pub image_lines: usize,
    pub mode_lines: usize,
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// A QTerminal configuration file
#[derive(Debug, Clone)]
pub struct QTerminalConfig {
    path: PathBuf,
}

impl QTerminalConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Rewrite the background image and mode keys, leaving every other line
    /// untouched and in place.
    pub fn patch(&self, image_path: &Path) -> Result<PatchSummary, PatchError> {
        if !self.exists() {
            return Err(PatchError::NotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| PatchError::Read {
            path: self.path.clone(),
            source,
        })?;

        let (patched, summary) = patch_lines(&contents, &image_path.to_string_lossy());
        debug!(
            "Rewrote {} image and {} mode lines in {}",
            summary.image_lines,
            summary.mode_lines,
            self.path.display()
        );

        self.write_atomic(&patched)?;
        info!("Background image updated in {}", self.path.display());
        Ok(summary)
    }

    // Write to a temp file beside the real (symlink-resolved) config, then
    // rename it over that file with the original permissions
    fn write_atomic(&self, contents: &str) -> Result<(), PatchError> {
        let write_err = |source| PatchError::Write {
            path: self.path.clone(),
            source,
        };
        let target = fs::canonicalize(&self.path).map_err(write_err)?;
        let permissions = fs::metadata(&target).map_err(write_err)?.permissions();

        let mut temp_name = target.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = target.with_file_name(temp_name);

        let result = fs::write(&temp_path, contents)
            .and_then(|_| fs::set_permissions(&temp_path, permissions))
            .and_then(|_| fs::rename(&temp_path, &target));
        if result.is_err() && temp_path.is_file() {
            let _ = fs::remove_file(&temp_path);
        }
        result.map_err(write_err)
    }
}

/// Patch config text line by line. Line terminators of untouched lines are
/// kept as they were, including a missing one on the last line.
pub fn patch_lines(contents: &str, image_path: &str) -> (String, PatchSummary) {
    let mut summary = PatchSummary::default();
    let mut out = String::with_capacity(contents.len() + image_path.len());

    for line in contents.split_inclusive('\n') {
        let mut line = line.to_string();
        if line.contains(IMAGE_KEY) {
            line = format!("{IMAGE_KEY}={image_path}\n");
            summary.image_lines += 1;
        }
        if line.contains(MODE_KEY) {
            line = format!("{MODE_KEY}={STRETCH_MODE}\n");
            summary.mode_lines += 1;
        }
        out.push_str(&line);
    }

    (out, summary)
}
