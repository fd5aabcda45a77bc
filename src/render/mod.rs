//! Rasterizes a draw plan: the plan becomes an SVG scene that resvg paints
//! onto a tiny-skia pixmap.

mod font;
mod images;
mod svg;

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use tiny_skia::Pixmap;
use usvg::{Options, Tree, fontdb};

use crate::present::DrawPlan;

pub use images::ImageStore;

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub family: Option<String>,
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            family: None,
            size: 24.0,
        }
    }
}

pub struct Renderer {
    fontdb: Arc<fontdb::Database>,
    family: String,
    font_size: f32,
}

impl Renderer {
    pub fn new(config: &FontConfig) -> Result<Self> {
        let fonts = font::load_fonts(
            config.path.as_deref(),
            config.family.as_deref(),
            font::fallback_fonts(),
        )?;
        Ok(Self {
            fontdb: Arc::new(fonts.db),
            family: fonts.family,
            font_size: config.size,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn render(&self, plan: &DrawPlan, images: &mut ImageStore) -> Result<Pixmap> {
        let scene = svg::build_scene(plan, &self.family, self.font_size, images)?;
        let options = Options {
            fontdb: self.fontdb.clone(),
            ..Options::default()
        };
        let tree = Tree::from_str(&scene, &options).with_context(|| "failed to parse SVG")?;
        let mut pixmap = Pixmap::new(plan.viewport.w, plan.viewport.h).ok_or_else(|| {
            anyhow!(
                "cannot render into an empty viewport ({}x{})",
                plan.viewport.w,
                plan.viewport.h
            )
        })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

/// Packs the pixmap into `0x00RRGGBB` words, the layout softbuffer presents.
pub fn fill_buffer(pixmap: &Pixmap, buffer: &mut [u32]) {
    for (out, pixel) in buffer.iter_mut().zip(pixmap.pixels()) {
        let color = pixel.demultiply();
        *out = (u32::from(color.red()) << 16)
            | (u32::from(color.green()) << 8)
            | u32::from(color.blue());
    }
}
