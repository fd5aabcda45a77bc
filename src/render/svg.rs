use anyhow::Result;

use super::images::ImageStore;
use crate::present::{Anchor, DrawPlan, TextItem};

const LINE_HEIGHT: f32 = 1.2;

/// Builds the SVG document for `plan`: background, text, then images.
pub(crate) fn build_scene(
    plan: &DrawPlan,
    font_family: &str,
    font_size: f32,
    images: &mut ImageStore,
) -> Result<String> {
    let width = plan.viewport.w;
    let height = plan.viewport.h;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{fill}"/>"#,
        w = width,
        h = height,
        fill = plan.background.hex()
    ));

    for text in &plan.texts {
        push_text(&mut svg, text, font_family, font_size);
    }

    for image in &plan.images {
        if image.size.is_empty() {
            continue;
        }
        let uri = images.scaled_data_uri(&image.path, image.size)?;
        svg.push_str(&format!(
            r#"<image href="{uri}" xlink:href="{uri}" x="{x}" y="{y}" width="{w}" height="{h}" preserveAspectRatio="none"/>"#,
            uri = uri,
            x = image.x,
            y = image.y,
            w = image.size.w,
            h = image.size.h
        ));
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn push_text(svg: &mut String, text: &TextItem, font_family: &str, font_size: f32) {
    let x = text.x as f32;
    let (baseline, anchor) = match text.anchor {
        Anchor::TopLeft => (text.y as f32 + font_size, "start"),
        Anchor::Center => ((text.y as f32 + font_size * 0.35).round(), "middle"),
    };
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" font-size="{size}" fill="{color}" font-family="{family}" text-anchor="{anchor}" xml:space="preserve">"#,
        x = x,
        y = baseline,
        size = font_size,
        color = text.color.hex(),
        family = escape_xml(font_family),
        anchor = anchor
    ));
    for (idx, line) in text.lines.iter().enumerate() {
        let escaped = escape_xml(line);
        if idx == 0 {
            svg.push_str(&escaped);
        } else {
            svg.push_str(&format!(
                r#"<tspan x="{x}" dy="{dy}">{text}</tspan>"#,
                x = x,
                dy = (font_size * LINE_HEIGHT).round(),
                text = escaped
            ));
        }
    }
    svg.push_str("</text>");
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
