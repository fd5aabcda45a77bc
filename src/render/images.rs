use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;
use image::imageops::FilterType;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fit::Size;
use crate::present::ImageSource;

/// Decoded question images, keyed by path. Each file is read at most once;
/// the scaled copy for the most recent size is kept as a PNG data URI.
#[derive(Default)]
pub struct ImageStore {
    decoded: HashMap<PathBuf, DynamicImage>,
    scaled: HashMap<PathBuf, (Size, String)>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of decoded images held.
    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.decoded.contains_key(path)
    }

    /// Drops every decoded and scaled image.
    pub fn clear(&mut self) {
        debug!("dropping {} cached images", self.decoded.len());
        self.decoded.clear();
        self.scaled.clear();
    }

    fn load(&mut self, path: &Path) -> Result<&DynamicImage> {
        let image = match self.decoded.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("loading {}", path.display());
                let image = image::open(path)
                    .with_context(|| format!("failed to load image: {}", path.display()))?;
                entry.insert(image)
            }
        };
        Ok(&*image)
    }

    /// `data:` URI of the image rescaled to exactly `size`.
    pub(crate) fn scaled_data_uri(&mut self, path: &Path, size: Size) -> Result<&str> {
        let fresh = matches!(self.scaled.get(path), Some((cached, _)) if *cached == size);
        if !fresh {
            let resized = self
                .load(path)?
                .resize_exact(size.w, size.h, FilterType::Triangle);
            let mut bytes = Vec::new();
            resized
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .with_context(|| format!("failed to encode scaled image: {}", path.display()))?;
            let uri = format!("data:image/png;base64,{}", BASE64.encode(&bytes));
            self.scaled.insert(path.to_path_buf(), (size, uri));
        }
        Ok(self
            .scaled
            .get(path)
            .map(|(_, uri)| uri.as_str())
            .unwrap_or_default())
    }
}

impl ImageSource for ImageStore {
    fn dimensions(&mut self, path: &Path) -> Result<Size> {
        let image = self.load(path)?;
        Ok(Size::new(image.width(), image.height()))
    }
}
