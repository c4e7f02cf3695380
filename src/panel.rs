use raylib::prelude::*;
use tracing::debug;

use crate::constants::*;
use crate::demos::{self, Palette, PanelKind, Primitive};
use crate::registry::{Length, StepRecord};
use crate::spring::{Spring, SpringConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The panel's declared layout: pinned to one horizontal edge, full viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub width: Length,
}

impl LayoutBox {
    pub fn for_step(record: &StepRecord) -> Self {
        Self {
            left: record.left(),
            right: record.right(),
            width: Length::Percent(PANEL_WIDTH_FRACTION * 100.0),
        }
    }

    pub fn resolve(&self, viewport: Viewport) -> Rectangle {
        let width = self.width.resolve(viewport.width);
        let x = match (self.left, self.right) {
            (Some(left), _) => left.resolve(viewport.width),
            (None, Some(right)) => viewport.width - width - right.resolve(viewport.width),
            (None, None) => 0.0,
        };
        Rectangle::new(x, 0.0, width, viewport.height)
    }
}

#[derive(Debug, Clone)]
struct Content {
    kind: PanelKind,
    palette: Palette,
}

/// The side panel. Content swaps immediately; the frame springs to its new box.
#[derive(Debug, Clone)]
pub struct ContentPanel {
    content: Option<Content>,
    x: Spring,
    width: Spring,
    height: Spring,
}

impl ContentPanel {
    pub fn new(spring: SpringConfig) -> Self {
        Self {
            content: None,
            x: Spring::new(0.0, spring),
            width: Spring::new(0.0, spring),
            height: Spring::new(0.0, spring),
        }
    }

    /// Shows `record` and animates towards its box.
    pub fn show(&mut self, record: &StepRecord, viewport: Viewport) {
        let target = self.set_content(record, viewport);
        self.x.set_target(target.x);
        self.width.set_target(target.width);
        self.height.set_target(target.height);
    }

    /// Shows `record` already in place, with no transition.
    pub fn place(&mut self, record: &StepRecord, viewport: Viewport) {
        let target = self.set_content(record, viewport);
        self.x.snap_to(target.x);
        self.width.snap_to(target.width);
        self.height.snap_to(target.height);
    }

    fn set_content(&mut self, record: &StepRecord, viewport: Viewport) -> Rectangle {
        let target = LayoutBox::for_step(record).resolve(viewport);
        debug!(ordinal = %record.ordinal, panel = ?record.panel, x = target.x, "panel target");

        self.content = Some(Content {
            kind: record.panel,
            palette: Palette::from_record(record),
        });
        target
    }

    pub fn update(&mut self, dt: f32) {
        self.x.update(dt);
        self.width.update(dt);
        self.height.update(dt);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.width.is_settled() && self.height.is_settled()
    }

    #[cfg(test)]
    pub fn kind(&self) -> Option<PanelKind> {
        self.content.as_ref().map(|c| c.kind)
    }

    /// Where the panel is drawn this frame.
    pub fn frame(&self) -> Rectangle {
        Rectangle::new(self.x.value(), 0.0, self.width.value(), self.height.value())
    }

    /// Accent fill followed by the demo, laid out inside the current frame.
    pub fn display_list(&self) -> Vec<Primitive> {
        let Some(content) = &self.content else {
            return Vec::new();
        };
        let frame = self.frame();
        let mut primitives = vec![Primitive::Fill { rect: frame, color: content.palette.accent }];
        let margin = frame.width.min(frame.height) * 0.06;
        let area = demos::inset(frame, margin);
        if area.width > 0.0 && area.height > 0.0 {
            primitives.extend(demos::compose(content.kind, area, &content.palette));
        }
        primitives
    }
}
