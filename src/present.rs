//! Layout decisions for one frame: which text goes where, and where each
//! image lands once fitted into its region.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::fit::{Size, fit};
use crate::questions::{Question, option_label};
use crate::session::SessionState;

pub const EXHAUSTED_NOTICE: &str = "No more questions are left. Press 'ESC' to quit.";

// Anchors and regions are in per-mille of the viewport so that every
// coordinate is an exact integer.
const TITLE_AT: (u32, u32) = (10, 10);
const BODY_AT: (u32, u32) = (50, 100);
const OPTIONS_AT: (u32, u32) = (70, 300);
const OPTION_STEP_PX: u32 = 40;
const FINAL_IMAGE_REGION: Region = Region {
    x: 50,
    y: 550,
    w: 900,
    h: 450,
};
const IMAGES_INDENT: u32 = 100;
const IMAGES_TOP: u32 = 550;
const IMAGES_HEIGHT: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BODY: Rgb = Rgb(100, 0, 0);
    pub const HIGHLIGHT: Rgb = Rgb(225, 20, 30);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Notice,
    Title,
    Body,
    /// `position` is 1-based.
    Option { position: usize, highlighted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `(x, y)` is the top-left corner of the first line.
    TopLeft,
    /// `(x, y)` is the center of the first line.
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub role: TextRole,
    pub lines: Vec<String>,
    pub x: u32,
    pub y: u32,
    pub anchor: Anchor,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub path: PathBuf,
    pub x: u32,
    pub y: u32,
    pub size: Size,
}

/// Everything to draw for one frame, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPlan {
    pub viewport: Size,
    pub background: Rgb,
    pub texts: Vec<TextItem>,
    pub images: Vec<ImageItem>,
}

impl DrawPlan {
    fn new(viewport: Size) -> Self {
        Self {
            viewport,
            background: Rgb::WHITE,
            texts: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn highlighted_options(&self) -> Vec<usize> {
        self.texts
            .iter()
            .filter_map(|text| match text.role {
                TextRole::Option {
                    position,
                    highlighted: true,
                } => Some(position),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for DrawPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewport {}x{}", self.viewport.w, self.viewport.h)?;
        for text in &self.texts {
            let role = match text.role {
                TextRole::Notice => "notice".to_string(),
                TextRole::Title => "title".to_string(),
                TextRole::Body => "body".to_string(),
                TextRole::Option {
                    position,
                    highlighted,
                } => format!(
                    "option {}{}",
                    position,
                    if highlighted { " highlighted" } else { "" }
                ),
            };
            let anchor = match text.anchor {
                Anchor::TopLeft => "",
                Anchor::Center => " centered",
            };
            write!(
                f,
                "\ntext {} ({}, {}){} {} {:?}",
                role,
                text.x,
                text.y,
                anchor,
                text.color.hex(),
                text.lines.join("\n")
            )?;
        }
        for image in &self.images {
            write!(
                f,
                "\nimage ({}, {}) {}x{} {}",
                image.x,
                image.y,
                image.size.w,
                image.size.h,
                image.path.display()
            )?;
        }
        Ok(())
    }
}

/// Supplies the pixel size of an image before it is placed.
pub trait ImageSource {
    /// Fails when the image cannot be loaded; the error names the path.
    fn dimensions(&mut self, path: &Path) -> Result<Size>;
}

#[derive(Debug, Clone, Copy)]
struct Region {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Region {
    fn scaled(&self, viewport: Size) -> Region {
        Region {
            x: per_mille(viewport.w, self.x),
            y: per_mille(viewport.h, self.y),
            w: per_mille(viewport.w, self.w),
            h: per_mille(viewport.h, self.h),
        }
    }
}

fn per_mille(length: u32, share: u32) -> u32 {
    (u64::from(length) * u64::from(share) / 1000) as u32
}

/// Computes the draw plan for `state` in a viewport of the given size.
pub fn present(
    state: &SessionState<'_>,
    viewport: Size,
    images: &mut impl ImageSource,
) -> Result<DrawPlan> {
    let mut plan = DrawPlan::new(viewport);
    let (question, revealed) = match *state {
        SessionState::Active { question, revealed } => (question, revealed),
        SessionState::Exhausted => {
            plan.texts.push(TextItem {
                role: TextRole::Notice,
                lines: vec![EXHAUSTED_NOTICE.to_string()],
                x: viewport.w / 2,
                y: viewport.h / 2,
                anchor: Anchor::Center,
                color: Rgb::BLACK,
            });
            return Ok(plan);
        }
    };

    if let Some(title) = &question.title {
        plan.texts.push(top_left(
            TextRole::Title,
            title,
            viewport,
            TITLE_AT,
            0,
            Rgb::BLACK,
        ));
    }
    plan.texts.push(top_left(
        TextRole::Body,
        question.body(revealed),
        viewport,
        BODY_AT,
        0,
        Rgb::BODY,
    ));
    // Each option takes one row per line, so a wrapped option pushes the
    // rest down instead of overlapping them.
    let mut row = 0;
    for (index, option) in question.options.iter().enumerate() {
        let position = index + 1;
        let highlighted = revealed && question.is_answer(position);
        let text = format!("{}. {}", option_label(position), option);
        let color = if highlighted { Rgb::HIGHLIGHT } else { Rgb::BLACK };
        let mut item = top_left(
            TextRole::Option {
                position,
                highlighted,
            },
            &text,
            viewport,
            OPTIONS_AT,
            row * OPTION_STEP_PX,
            color,
        );
        item.lines = text.split("\\n").map(str::to_string).collect();
        row += item.lines.len() as u32;
        plan.texts.push(item);
    }

    place_images(&mut plan, question, revealed, images)?;
    Ok(plan)
}

fn top_left(
    role: TextRole,
    text: &str,
    viewport: Size,
    at: (u32, u32),
    dy: u32,
    color: Rgb,
) -> TextItem {
    TextItem {
        role,
        lines: vec![text.to_string()],
        x: per_mille(viewport.w, at.0),
        y: per_mille(viewport.h, at.1) + dy,
        anchor: Anchor::TopLeft,
        color,
    }
}

fn place_images(
    plan: &mut DrawPlan,
    question: &Question,
    revealed: bool,
    images: &mut impl ImageSource,
) -> Result<()> {
    let viewport = plan.viewport;
    if revealed {
        if let Some(path) = &question.final_image {
            let region = FINAL_IMAGE_REGION.scaled(viewport);
            place_in(plan, path, region, images)?;
            return Ok(());
        }
    }
    if question.images.is_empty() {
        return Ok(());
    }

    let indent = per_mille(viewport.w, IMAGES_INDENT);
    let usable = viewport.w.saturating_sub(indent * 2);
    let slot_w = usable / question.images.len() as u32;
    let top = per_mille(viewport.h, IMAGES_TOP);
    let height = per_mille(viewport.h, IMAGES_HEIGHT);
    for (index, path) in question.images.iter().enumerate() {
        let region = Region {
            x: indent + index as u32 * slot_w,
            y: top,
            w: slot_w,
            h: height,
        };
        place_in(plan, path, region, images)?;
    }
    Ok(())
}

fn place_in(
    plan: &mut DrawPlan,
    path: &Path,
    region: Region,
    images: &mut impl ImageSource,
) -> Result<()> {
    let natural = images.dimensions(path)?;
    let placed = fit(natural, Size::new(region.w, region.h), true);
    plan.images.push(ImageItem {
        path: path.to_path_buf(),
        x: region.x + placed.offset.x,
        y: region.y + placed.offset.y,
        size: placed.size,
    });
    Ok(())
}
