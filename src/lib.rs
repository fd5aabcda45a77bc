use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub mod fit;
pub mod logging;
pub mod present;
pub mod questions;
pub mod render;
pub mod session;
mod test_util;
pub mod viewer;

pub use fit::{Fit, Offset, Size, fit};
pub use present::{DrawPlan, ImageSource, present};
pub use questions::{Question, QuestionFileError, QuestionReader, read_questions};
pub use render::{FontConfig, ImageStore, Renderer};
pub use session::{Session, SessionState};
pub use viewer::{Command, Flow, Viewer, WindowOptions};

#[derive(Debug, Clone)]
pub struct Config {
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub font: FontConfig,
}

/// Shows the quiz in `config.file` until the user quits.
///
/// A malformed first record fails before any window is created; later records
/// are read only when the viewer reaches them.
pub fn run(config: Config) -> Result<()> {
    let questions = read_questions(&config.file)?;
    let mut session = Session::new(questions);
    session
        .state()
        .with_context(|| format!("failed to load {}", config.file.display()))?;

    let renderer = Renderer::new(&config.font)?;
    info!(
        "rendering {} with font {}",
        config.file.display(),
        renderer.family()
    );
    let viewer = Viewer::new(session, ImageStore::new(), renderer);

    let name = config
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.file.display().to_string());
    let options = WindowOptions {
        title: format!("{} - quiz-slides", name),
        width: config.width,
        height: config.height,
    };
    viewer::run_window(viewer, &options)
}
