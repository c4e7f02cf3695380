use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raylib::prelude::*;
use serde::Deserialize;

use crate::registry::StepRecord;
use crate::theme::{self, Family, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    LoggerFirst,
    LoggerSecond,
    DashboardFirst,
    DashboardSecond,
    DocsiteFirst,
    DocsiteSecond,
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub accent: Color,
    pub strong: Color,
}

impl Palette {
    pub fn from_record(record: &StepRecord) -> Self {
        Self {
            background: record.background.color(),
            accent: record.accent.color(),
            strong: record.accent.shade(700).color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill { rect: Rectangle, color: Color },
    Rounded { rect: Rectangle, roundness: f32, color: Color },
    Outline { rect: Rectangle, thickness: f32, color: Color },
    Line { from: Vector2, to: Vector2, thickness: f32, color: Color },
    Circle { center: Vector2, radius: f32, color: Color },
    Text { text: String, position: Vector2, size: i32, color: Color },
}

impl Primitive {
    /// Bounding box of shapes. Text has no known extent until measured.
    #[cfg(test)]
    pub fn bounds(&self) -> Option<Rectangle> {
        match self {
            Primitive::Fill { rect, .. }
            | Primitive::Rounded { rect, .. }
            | Primitive::Outline { rect, .. } => Some(*rect),
            Primitive::Line { from, to, .. } => Some(Rectangle::new(
                from.x.min(to.x),
                from.y.min(to.y),
                (from.x - to.x).abs(),
                (from.y - to.y).abs(),
            )),
            Primitive::Circle { center, radius, .. } => Some(Rectangle::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            )),
            Primitive::Text { .. } => None,
        }
    }
}

pub fn inset(rect: Rectangle, amount: f32) -> Rectangle {
    Rectangle::new(
        rect.x + amount,
        rect.y + amount,
        (rect.width - 2.0 * amount).max(0.0),
        (rect.height - 2.0 * amount).max(0.0),
    )
}

pub fn compose(kind: PanelKind, area: Rectangle, palette: &Palette) -> Vec<Primitive> {
    let mut out = Vec::new();
    match kind {
        PanelKind::LoggerFirst => logger_first(area, palette, &mut out),
        PanelKind::LoggerSecond => logger_second(area, palette, &mut out),
        PanelKind::DashboardFirst => dashboard_first(area, palette, &mut out),
        PanelKind::DashboardSecond => dashboard_second(area, palette, &mut out),
        PanelKind::DocsiteFirst => docsite_first(area, palette, &mut out),
        PanelKind::DocsiteSecond => docsite_second(area, palette, &mut out),
    }
    out
}

fn font_size(height: f32) -> i32 {
    (height.round() as i32).max(8)
}

fn text(out: &mut Vec<Primitive>, text: &str, x: f32, y: f32, size: i32, color: Color) {
    out.push(Primitive::Text { text: text.to_string(), position: Vector2::new(x, y), size, color });
}

/// Draws an app window and returns its body.
fn window(area: Rectangle, title: &str, palette: &Palette, out: &mut Vec<Primitive>) -> Rectangle {
    let header = area.height * 0.08;
    out.push(Primitive::Fill { rect: area, color: theme::SURFACE });
    out.push(Primitive::Fill {
        rect: Rectangle::new(area.x, area.y, area.width, header),
        color: palette.background,
    });
    out.push(Primitive::Outline { rect: area, thickness: 2.0, color: theme::with_alpha(palette.strong, 0.4) });
    for i in 0..3 {
        out.push(Primitive::Circle {
            center: Vector2::new(area.x + header * (0.5 + i as f32 * 0.45), area.y + header * 0.5),
            radius: header * 0.14,
            color: palette.strong,
        });
    }
    text(out, title, area.x + header * 1.8, area.y + header * 0.3, font_size(header * 0.4), theme::INK);

    let pad = header * 0.5;
    Rectangle::new(
        area.x + pad,
        area.y + header + pad,
        (area.width - 2.0 * pad).max(0.0),
        (area.height - header - 2.0 * pad).max(0.0),
    )
}

const EVENTS: [&str; 5] = [
    "page_view  /produkt/4411",
    "click      kjop_knapp",
    "add_to_cart  sku=4411",
    "checkout_start",
    "purchase  total=499",
];

fn logger_first(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let body = window(area, "nettbutikk.no", palette, out);
    let size = font_size(body.height * 0.035);

    let product = Rectangle::new(body.x, body.y, body.width, body.height * 0.35);
    out.push(Primitive::Rounded { rect: product, roundness: 0.1, color: palette.background });
    text(out, "Produktside", product.x + product.width * 0.05, product.y + product.height * 0.15, size, theme::INK);
    let button = Rectangle::new(
        product.x + product.width * 0.6,
        product.y + product.height * 0.6,
        product.width * 0.32,
        product.height * 0.25,
    );
    out.push(Primitive::Rounded { rect: button, roundness: 0.5, color: palette.strong });
    text(out, "Kjop", button.x + button.width * 0.3, button.y + button.height * 0.25, size, theme::SURFACE);

    let log_top = body.y + body.height * 0.42;
    let row = body.height * 0.5 / (EVENTS.len() + 1) as f32;
    text(out, "Hendelser", body.x, log_top, size, theme::MUTED_INK);
    for (i, event) in EVENTS.iter().enumerate() {
        let y = log_top + (i + 1) as f32 * row;
        out.push(Primitive::Circle {
            center: Vector2::new(body.x + row * 0.25, y + row * 0.3),
            radius: row * 0.12,
            color: palette.strong,
        });
        text(out, event, body.x + row * 0.6, y, size, theme::INK);
    }
}

const WEEKDAYS: [&str; 7] = ["Ma", "Ti", "On", "To", "Fr", "Lo", "So"];

fn logger_second(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let body = window(area, "Looker - hendelser per dag", palette, out);
    let size = font_size(body.height * 0.035);

    text(out, "SELECT dag, COUNT(*) AS antall", body.x, body.y, size, theme::MUTED_INK);
    text(out, "FROM logger.events GROUP BY dag", body.x, body.y + body.height * 0.06, size, theme::MUTED_INK);

    let chart = Rectangle::new(body.x, body.y + body.height * 0.2, body.width, body.height * 0.8);
    let plot_height = chart.height * 0.85;
    let baseline = chart.y + plot_height;
    out.push(Primitive::Line {
        from: Vector2::new(chart.x, chart.y),
        to: Vector2::new(chart.x, baseline),
        thickness: 2.0,
        color: theme::MUTED_INK,
    });
    out.push(Primitive::Line {
        from: Vector2::new(chart.x, baseline),
        to: Vector2::new(chart.x + chart.width, baseline),
        thickness: 2.0,
        color: theme::MUTED_INK,
    });

    let mut rng = StdRng::seed_from_u64(7);
    let slot = chart.width / WEEKDAYS.len() as f32;
    for (i, day) in WEEKDAYS.iter().enumerate() {
        let value: f32 = rng.random_range(0.25..0.95);
        let bar_height = plot_height * value;
        let x = chart.x + i as f32 * slot + slot * 0.2;
        let color = if i % 2 == 0 { palette.strong } else { palette.accent };
        out.push(Primitive::Fill {
            rect: Rectangle::new(x, baseline - bar_height, slot * 0.6, bar_height),
            color,
        });
        text(out, day, x, baseline + chart.height * 0.04, size, theme::INK);
    }
}

const PACKAGE: &str = "@core/ui";
const DEPENDENTS: [&str; 6] = ["checkout", "search", "profile", "admin", "blog", "docs"];

fn dashboard_first(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let body = window(area, "dependency dashboard", palette, out);
    let extent = body.width.min(body.height);
    let size = font_size(extent * 0.035);
    let center = Vector2::new(body.x + body.width * 0.5, body.y + body.height * 0.5);
    let ring = extent * 0.35;
    let node = extent * 0.08;

    let positions: Vec<Vector2> = (0..DEPENDENTS.len())
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / DEPENDENTS.len() as f32;
            Vector2::new(center.x + ring * angle.cos(), center.y + ring * angle.sin())
        })
        .collect();

    for position in &positions {
        out.push(Primitive::Line { from: center, to: *position, thickness: 3.0, color: palette.accent });
    }
    out.push(Primitive::Circle { center, radius: node * 1.3, color: palette.strong });
    text(out, PACKAGE, center.x - node, center.y + node * 1.4, size, theme::INK);
    for (name, position) in DEPENDENTS.iter().zip(&positions) {
        out.push(Primitive::Circle { center: *position, radius: node, color: palette.background });
        out.push(Primitive::Circle { center: *position, radius: node * 0.55, color: palette.accent });
        text(out, name, position.x - node, position.y + node * 1.1, size, theme::INK);
    }
}

const MESSAGES: [&str; 3] = [
    "@core/ui 2.4.0 er publisert",
    "checkout avhenger av @core/ui ^2.3.0",
    "search avhenger av @core/ui ^2.1.0",
];

fn dashboard_second(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let body = window(area, "#frontend-pakker", palette, out);
    let card_height = body.height * 0.26;
    let gap = body.height * 0.05;
    let size = font_size(card_height * 0.14);

    for (i, message) in MESSAGES.iter().enumerate() {
        let card = Rectangle::new(body.x, body.y + i as f32 * (card_height + gap), body.width, card_height);
        out.push(Primitive::Rounded { rect: card, roundness: 0.15, color: palette.background });
        out.push(Primitive::Circle {
            center: Vector2::new(card.x + card_height * 0.3, card.y + card_height * 0.3),
            radius: card_height * 0.18,
            color: palette.strong,
        });
        text(out, "deps-bot", card.x + card_height * 0.6, card.y + card_height * 0.15, size, theme::INK);
        text(out, message, card.x + card_height * 0.6, card.y + card_height * 0.5, size, theme::MUTED_INK);
    }
}

const SNIPPET: [&str; 9] = [
    "import { Button } from '@core/ui';",
    "",
    "export default function App() {",
    "  return (",
    "    <Button variant=\"primary\">",
    "      Hei verden",
    "    </Button>",
    "  );",
    "}",
];

/// Code editor with line numbers. Returns the editor rect and its line height.
fn editor(area: Rectangle, out: &mut Vec<Primitive>) -> (Rectangle, f32) {
    let code_background = Token::palette(Family::Slate, 700).color();
    out.push(Primitive::Fill { rect: area, color: code_background });
    let line_height = area.height / (SNIPPET.len() + 2) as f32;
    let size = font_size(line_height * 0.45);
    let gutter = area.width * 0.08;
    for (i, line) in SNIPPET.iter().enumerate() {
        let y = area.y + (i + 1) as f32 * line_height;
        text(out, &(i + 1).to_string(), area.x + gutter * 0.3, y, size, theme::MUTED_INK);
        if !line.is_empty() {
            text(out, line, area.x + gutter, y, size, theme::SURFACE);
        }
    }
    (area, line_height)
}

fn sandbox(area: Rectangle, title: &str, palette: &Palette, out: &mut Vec<Primitive>) -> (Rectangle, f32) {
    let body = window(area, title, palette, out);
    let code = Rectangle::new(body.x, body.y, body.width * 0.6, body.height);
    let preview = Rectangle::new(body.x + body.width * 0.63, body.y, body.width * 0.37, body.height);
    let editor = editor(code, out);

    out.push(Primitive::Outline { rect: preview, thickness: 2.0, color: palette.accent });
    let button = Rectangle::new(
        preview.x + preview.width * 0.15,
        preview.y + preview.height * 0.4,
        preview.width * 0.7,
        preview.height * 0.08,
    );
    out.push(Primitive::Rounded { rect: button, roundness: 0.5, color: palette.strong });
    text(
        out,
        "Hei verden",
        button.x + button.width * 0.15,
        button.y + button.height * 0.25,
        font_size(button.height * 0.45),
        theme::SURFACE,
    );
    editor
}

fn docsite_first(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let (code, line_height) = sandbox(area, "kode-sandkasse", palette, out);
    let run = Rectangle::new(
        code.x + code.width * 0.7,
        code.y + code.height - line_height * 0.9,
        code.width * 0.25,
        line_height * 0.7,
    );
    out.push(Primitive::Rounded { rect: run, roundness: 0.5, color: palette.accent });
    text(out, "Kjor", run.x + run.width * 0.3, run.y + run.height * 0.2, font_size(run.height * 0.55), theme::INK);
}

fn docsite_second(area: Rectangle, palette: &Palette, out: &mut Vec<Primitive>) {
    let (code, line_height) = sandbox(area, "kode-sandkasse - live", palette, out);
    let collaborators = [
        ("Kari", 4, 0.55, Token::palette(Family::Rose, 500).color()),
        ("Ola", 6, 0.35, Token::palette(Family::Blue, 500).color()),
    ];

    for (name, line, column, color) in collaborators {
        let x = code.x + code.width * column;
        let y = code.y + line as f32 * line_height;
        out.push(Primitive::Fill { rect: Rectangle::new(x, y, 3.0, line_height * 0.6), color });
        let tag = Rectangle::new(x, y - line_height * 0.45, code.width * 0.12, line_height * 0.42);
        out.push(Primitive::Rounded { rect: tag, roundness: 0.4, color });
        text(out, name, tag.x + tag.width * 0.12, tag.y + tag.height * 0.1, font_size(tag.height * 0.75), theme::SURFACE);
    }

    text(
        out,
        "2 tilkoblet via WebRTC",
        code.x + code.width * 0.05,
        code.y + code.height - line_height * 0.8,
        font_size(line_height * 0.4),
        theme::MUTED_INK,
    );
}
