use anyhow::{Context, Result, anyhow};
use std::path::Path;
use ttf_parser::Face;
use ttf_parser::name_id;
use tracing::{debug, warn};
use usvg::fontdb;

pub(crate) const GENERIC_FAMILY: &str = "sans-serif";

#[cfg(target_os = "macos")]
pub(crate) fn fallback_fonts() -> &'static [&'static str] {
    &["NotoSans", "Helvetica Neue", "sans-serif"]
}

#[cfg(target_os = "windows")]
pub(crate) fn fallback_fonts() -> &'static [&'static str] {
    &["NotoSans", "Segoe UI", "sans-serif"]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub(crate) fn fallback_fonts() -> &'static [&'static str] {
    &["NotoSans", "DejaVu Sans", "sans-serif"]
}

/// Font database for the renderer plus the family name to put in the scene.
pub(crate) struct LoadedFonts {
    pub(crate) db: fontdb::Database,
    pub(crate) family: String,
}

pub(crate) fn load_fonts(
    font_path: Option<&Path>,
    font_family: Option<&str>,
    fallback: &[&str],
) -> Result<LoadedFonts> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    if let Some(path) = font_path {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font: {}", path.display()))?;
        let family = family_from_data(&data)
            .ok_or_else(|| anyhow!("failed to parse font: {}", path.display()))?;
        db.load_font_data(data);
        debug!("using font {} from {}", family, path.display());
        return Ok(LoadedFonts { db, family });
    }

    if let Some(family) = font_family {
        let family = resolve_family(&db, family)?;
        return Ok(LoadedFonts { db, family });
    }

    for candidate in fallback {
        if let Ok(family) = resolve_family(&db, candidate) {
            debug!("using fallback font {}", family);
            return Ok(LoadedFonts { db, family });
        }
    }

    warn!("no fallback fonts found; text may not render");
    Ok(LoadedFonts {
        db,
        family: GENERIC_FAMILY.to_string(),
    })
}

fn resolve_family(db: &fontdb::Database, family: &str) -> Result<String> {
    let is_sans = family.eq_ignore_ascii_case(GENERIC_FAMILY);
    let families = if is_sans {
        vec![fontdb::Family::SansSerif]
    } else {
        vec![fontdb::Family::Name(family)]
    };
    let query = fontdb::Query {
        families: &families,
        ..Default::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| anyhow!("font not found: {}", family))?;
    let found = db
        .with_face_data(id, |data, index| {
            Face::parse(data, index)
                .ok()
                .and_then(|face| extract_family_name(&face))
        })
        .ok_or_else(|| anyhow!("failed to load font data: {}", family))?;
    Ok(found.unwrap_or_else(|| family.to_string()))
}

fn family_from_data(data: &[u8]) -> Option<String> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    (0..count)
        .filter_map(|index| Face::parse(data, index).ok())
        .find_map(|face| extract_family_name(&face))
}

fn extract_family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}
