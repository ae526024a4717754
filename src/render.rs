use crate::config::{RenderConfig, TreeConfig};
use crate::ir::Sex;
use crate::layout::{DrawableEdge, EdgeKind, PositionedPerson, TreeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

const CARD_RADIUS: f32 = 10.0;
const CURVE_BEND: f32 = 0.3;

pub fn render_svg(
    layout: &TreeLayout,
    theme: &Theme,
    config: &TreeConfig,
    render: &RenderConfig,
) -> String {
    let mut svg = String::new();
    let (min_x, min_y, width, height) = if layout.is_empty() {
        (0.0, 0.0, render.width.max(1.0), render.height.max(1.0))
    } else {
        let bounds = &layout.bounds;
        (bounds.min_x, bounds.min_y, bounds.width().max(1.0), bounds.height().max(1.0))
    };

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{min_x:.2} {min_y:.2} {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect x=\"{min_x:.2}\" y=\"{min_y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        render.background
    );

    let by_id: HashMap<&str, &PositionedPerson> =
        layout.persons.iter().map(|person| (person.id(), person)).collect();

    for edge in &layout.edges {
        let (Some(from), Some(to)) = (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str()))
        else {
            continue;
        };
        let dash = if edge.kind == EdgeKind::Sibling {
            " stroke-dasharray=\"6 4\""
        } else {
            ""
        };
        let _ = write!(
            svg,
            "<path class=\"edge-{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\"{dash}/>",
            edge_class(edge),
            connection_path(from, to, edge.kind),
            theme.line_color
        );
    }

    for person in &layout.persons {
        svg.push_str(&card_svg(person, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn edge_class(edge: &DrawableEdge) -> &'static str {
    match edge.kind {
        EdgeKind::Spouse => "spouse",
        EdgeKind::ParentChild => "parent",
        EdgeKind::Sibling => "sibling",
    }
}

/// Spouses and siblings get a straight line, parent to child a quadratic
/// curve leaving the parent downwards.
pub fn connection_path(from: &PositionedPerson, to: &PositionedPerson, kind: EdgeKind) -> String {
    match kind {
        EdgeKind::ParentChild => {
            let bend = (to.y - from.y).abs() * CURVE_BEND;
            format!(
                "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                from.x,
                from.y,
                from.x,
                from.y + bend,
                to.x,
                to.y
            )
        }
        EdgeKind::Spouse | EdgeKind::Sibling => {
            format!("M {:.2} {:.2} L {:.2} {:.2}", from.x, from.y, to.x, to.y)
        }
    }
}

fn card_svg(person: &PositionedPerson, theme: &Theme, config: &TreeConfig) -> String {
    let x = person.x - config.card_width / 2.0;
    let y = person.y - config.card_height / 2.0;
    let fill = match person.person.sex {
        Some(Sex::Male) => &theme.card_fill_male,
        Some(Sex::Female) => &theme.card_fill_female,
        None => &theme.card_fill,
    };
    let (stroke, stroke_width) = if person.is_current_user {
        (&theme.current_user_border, 3.0)
    } else {
        (&theme.card_border, 1.4)
    };

    let mut card = String::new();
    let _ = write!(
        card,
        "<g class=\"person\" data-id=\"{}\"><rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CARD_RADIUS}\" ry=\"{CARD_RADIUS}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
        escape_xml(person.id()),
        config.card_width,
        config.card_height,
    );
    let _ = write!(
        card,
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        person.x,
        person.y - theme.font_size * 0.2,
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(&person.person.display_name())
    );
    if let Some(years) = life_years(person) {
        let _ = write!(
            card,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            person.x,
            person.y + theme.font_size * 1.3,
            theme.font_family,
            theme.font_size * 0.85,
            theme.secondary_text_color,
            escape_xml(&years)
        );
    }
    card.push_str("</g>");
    card
}

fn life_years(person: &PositionedPerson) -> Option<String> {
    use chrono::Datelike;
    let born = person.person.birth_day().map(|date| date.year());
    let died = person.person.death_day().map(|date| date.year());
    match (born, died) {
        (Some(b), Some(d)) => Some(format!("{b} – {d}")),
        (Some(b), None) => Some(format!("{b}")),
        (None, Some(d)) => Some(format!("? – {d}")),
        (None, None) => None,
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid default render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
