use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use quiz_slides::{Config, FontConfig};

#[derive(Parser, Debug)]
#[command(
    name = "quiz-slides",
    version,
    about = "Show a quiz one question at a time; SPACE reveals and advances, ESC quits"
)]
struct Cli {
    /// Question file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Initial window width in pixels
    #[arg(long = "width", default_value_t = 800)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long = "height", default_value_t = 600)]
    height: u32,

    /// Font file (ttf/otf/ttc) used for all text
    #[arg(long = "font")]
    font: Option<PathBuf>,

    /// Installed font family used for all text
    #[arg(long = "font-family", conflicts_with = "font")]
    font_family: Option<String>,

    /// Font size in pixels
    #[arg(long = "font-size", default_value_t = 24.0)]
    font_size: f32,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    quiz_slides::logging::init(cli.verbose)?;
    quiz_slides::run(Config {
        file: cli.file,
        width: cli.width,
        height: cli.height,
        font: FontConfig {
            path: cli.font,
            family: cli.font_family,
            size: cli.font_size,
        },
    })
}
