use raylib::prelude::*;
use tracing::{debug, info};

use crate::config::ScrollConfig;
use crate::constants::*;
use crate::observer::{ScrollObserver, StepEnter};
use crate::panel::{ContentPanel, Viewport};
use crate::registry::{Ordinal, Side, StepRecord, StepRegistry};
use crate::render::{self, draw_primitives};
use crate::spring::SpringConfig;
use crate::theme::{self, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub position: Vector2,
    pub width: f32,
}

/// A step's wrapped text, positioned on screen for the current scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub ordinal: Ordinal,
    pub bounds: Rectangle,
    pub lines: Vec<TextLine>,
    /// Inset-shadow bands under each line, tinted by the active step's shadow.
    pub highlights: Vec<Rectangle>,
    pub highlight_color: Option<Color>,
}

pub struct Presentation {
    registry: StepRegistry,
    observer: ScrollObserver,
    panel: ContentPanel,
    viewport: Viewport,
    background: Color,
    scroll: f32,
    active: Ordinal,
}

impl Presentation {
    pub fn new(registry: StepRegistry, spring: SpringConfig, scroll: &ScrollConfig, viewport: Viewport) -> Self {
        let observer = ScrollObserver::stacked(registry.len(), viewport.height, scroll.trigger_offset);
        let mut panel = ContentPanel::new(spring);
        let active = Ordinal(0);
        if let Some(record) = registry.get(active) {
            panel.place(record, viewport);
        }
        let background = PAGE_BACKGROUND.parse::<Token>().map_or(theme::SURFACE, |token| token.color());

        Self { registry, observer, panel, viewport, background, scroll: 0.0, active }
    }

    #[cfg(test)]
    pub fn panel(&self) -> &ContentPanel {
        &self.panel
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn active(&self) -> Ordinal {
        self.active
    }

    pub fn active_record(&self) -> Option<&StepRecord> {
        self.registry.get(self.active)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    pub fn max_scroll(&self) -> f32 {
        (self.observer.page_height() - self.viewport.height).max(0.0)
    }

    pub fn at_end(&self) -> bool {
        self.scroll >= self.max_scroll()
    }

    pub fn is_settled(&self) -> bool {
        self.panel.is_settled()
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll + delta);
    }

    /// Scrolls so the step's region sits at the top of the viewport.
    pub fn scroll_to_step(&mut self, ordinal: Ordinal) {
        if let Some(span) = self.observer.region(ordinal) {
            self.scroll_to(span.top);
        }
    }

    pub fn next_step(&mut self) {
        self.scroll_to_step(Ordinal(self.active.0 + 1));
    }

    pub fn previous_step(&mut self) {
        if let Some(previous) = self.active.0.checked_sub(1) {
            self.scroll_to_step(Ordinal(previous));
        }
    }

    /// Observes the scroll position, re-targets the panel on a step change and
    /// advances the panel animation.
    pub fn update(&mut self, dt: f32) -> Option<StepEnter> {
        let event = self.observer.observe(self.scroll, self.viewport.height);
        if let Some(event) = event {
            self.enter(event);
        }
        self.panel.update(dt);
        event
    }

    fn enter(&mut self, event: StepEnter) {
        self.active = event.ordinal;
        match self.registry.get(event.ordinal) {
            Some(record) => {
                info!(ordinal = %event.ordinal, direction = ?event.direction, panel = ?record.panel, "step entered");
                self.panel.show(record, self.viewport);
            }
            None => debug!(ordinal = %event.ordinal, "no step for ordinal, keeping panel"),
        }
    }

    /// Lays out every step's text for the current scroll offset.
    pub fn narrative(&self, measure: impl Fn(&str) -> f32) -> Vec<TextBlock> {
        let font = TEXT_FONT_SIZE as f32;
        let line_height = font * TEXT_LINE_SPACING;
        let column = self.viewport.width * TEXT_COLUMN_FRACTION;
        let wrap_width = (column - 2.0 * TEXT_PADDING).max(font);
        let highlight_color = self.active_record().map(|record| record.shadow.color());

        self.registry
            .iter()
            .filter_map(|record| {
                let span = self.observer.region(record.ordinal)?;
                let wrapped = render::wrap_text(&record.text, wrap_width, &measure);
                let text_height = wrapped.len() as f32 * line_height;
                let block_height = text_height + 2.0 * TEXT_PADDING;

                let x = match record.text_side {
                    Side::Left => 0.0,
                    Side::Right => self.viewport.width - column,
                };
                let y = span.top - self.scroll + (span.height() - block_height) * 0.5;
                let bounds = Rectangle::new(x, y, column, block_height);

                let lines: Vec<TextLine> = wrapped
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| TextLine {
                        width: measure(&text),
                        position: Vector2::new(x + TEXT_PADDING, y + TEXT_PADDING + i as f32 * line_height),
                        text,
                    })
                    .collect();

                let highlights = lines
                    .iter()
                    .filter(|line| line.width > 0.0)
                    .map(|line| Rectangle::new(line.position.x, line.position.y + font * 0.5, line.width, font * 0.5))
                    .collect();

                Some(TextBlock {
                    ordinal: record.ordinal,
                    bounds,
                    lines,
                    highlights,
                    highlight_color,
                })
            })
            .collect()
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D) {
        d.clear_background(self.background);

        let visible = |bounds: &Rectangle| bounds.y + bounds.height >= 0.0 && bounds.y <= self.viewport.height;
        for block in self.narrative(|text| render::measure_text(text, TEXT_FONT_SIZE)) {
            if !visible(&block.bounds) {
                continue;
            }
            if let Some(color) = block.highlight_color {
                for band in &block.highlights {
                    d.draw_rectangle_rec(*band, color);
                }
            }
            for line in &block.lines {
                d.draw_text(
                    &line.text,
                    line.position.x.round() as i32,
                    line.position.y.round() as i32,
                    TEXT_FONT_SIZE,
                    theme::INK,
                );
            }
        }

        draw_primitives(d, &self.panel.display_list());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::PanelKind;
    use crate::observer::Direction;

    const VIEWPORT: Viewport = Viewport { width: 1920.0, height: 1080.0 };
    const DT: f32 = 1.0 / 60.0;

    fn presentation() -> Presentation {
        Presentation::new(StepRegistry::builtin(), SpringConfig::default(), &ScrollConfig::default(), VIEWPORT)
    }

    fn mono(text: &str) -> f32 {
        text.chars().count() as f32 * 16.0
    }

    fn run_until_settled(p: &mut Presentation) {
        for _ in 0..10_000 {
            p.update(DT);
            if p.is_settled() {
                break;
            }
        }
    }

    #[test]
    fn session_starts_on_the_first_step() {
        let mut p = presentation();
        assert_eq!(p.active(), Ordinal(0));
        assert_eq!(p.scroll_offset(), 0.0);
        assert_eq!(p.panel().frame().x, 0.0);
        assert!(p.is_settled());

        let event = p.update(DT).unwrap();
        assert_eq!(event.ordinal, Ordinal(0));
        assert!(p.is_settled(), "re-entering the first step must not move the panel");
    }

    #[test]
    fn scroll_is_clamped_to_the_page() {
        let mut p = presentation();
        assert_eq!(p.max_scroll(), 5.0 * 1080.0);
        p.scroll_by(-100.0);
        assert_eq!(p.scroll_offset(), 0.0);
        p.scroll_by(1e9);
        assert_eq!(p.scroll_offset(), p.max_scroll());
        assert!(p.at_end());
    }

    #[test]
    fn scrolling_to_a_right_anchored_step_moves_the_panel_right() {
        let mut p = presentation();
        p.update(DT);
        p.scroll_to_step(Ordinal(2));
        let event = p.update(DT).unwrap();
        assert_eq!(event, StepEnter { ordinal: Ordinal(2), direction: Direction::Down });
        assert_eq!(p.active(), Ordinal(2));
        assert_eq!(p.panel().kind(), Some(PanelKind::DashboardFirst));

        run_until_settled(&mut p);
        assert_eq!(p.panel().frame().x, 960.0);
        let record = p.active_record().unwrap();
        assert!(record.left().is_none());
        assert!(record.right().is_some());
    }

    #[test]
    fn next_and_previous_step_walk_the_deck() {
        let mut p = presentation();
        p.update(DT);
        for expected in 1..6 {
            p.next_step();
            p.update(DT);
            assert_eq!(p.active(), Ordinal(expected));
        }
        p.next_step();
        p.update(DT);
        assert_eq!(p.active(), Ordinal(5));

        p.previous_step();
        let event = p.update(DT).unwrap();
        assert_eq!(event.direction, Direction::Up);
        assert_eq!(p.active(), Ordinal(4));
    }

    #[test]
    fn scrolling_through_and_back_ends_on_first_step() {
        let mut p = presentation();
        let mut entered = Vec::new();
        while !p.at_end() {
            p.scroll_by(97.0);
            if let Some(event) = p.update(DT) {
                entered.push(event.ordinal.0);
            }
        }
        assert_eq!(entered, vec![0, 1, 2, 3, 4, 5]);

        while p.scroll_offset() > 0.0 {
            p.scroll_by(-311.0);
            p.update(DT);
        }
        p.update(DT);
        assert_eq!(p.active(), Ordinal(0));
        run_until_settled(&mut p);
        assert_eq!(p.panel().frame().x, 0.0);
    }

    #[test]
    fn narrative_places_text_on_its_side() {
        let p = presentation();
        let blocks = p.narrative(mono);
        assert_eq!(blocks.len(), 6);

        // Step 0 text sits on the right half, step 2 on the left half
        assert_eq!(blocks[0].bounds.x, 960.0);
        assert_eq!(blocks[2].bounds.x, 0.0);
        for block in &blocks {
            assert_eq!(block.bounds.width, 960.0);
            for line in &block.lines {
                assert!(line.width <= 960.0 - 2.0 * TEXT_PADDING);
            }
        }

        // Vertically centred in the first viewport
        let first = &blocks[0].bounds;
        assert!((first.y + first.height * 0.5 - 540.0).abs() < 1e-3);
    }

    #[test]
    fn every_step_is_highlighted_in_the_active_color() {
        let mut p = presentation();
        p.update(DT);
        p.scroll_to_step(Ordinal(3));
        p.update(DT);

        let shadow = p.active_record().unwrap().shadow.color();
        let blocks = p.narrative(mono);
        for block in &blocks {
            assert_eq!(block.highlights.len(), block.lines.len());
            let color = block.highlight_color.unwrap();
            assert_eq!((color.r, color.g, color.b), (shadow.r, shadow.g, shadow.b));
            let band = block.highlights[0];
            let line = &block.lines[0];
            assert_eq!(band.y, line.position.y + TEXT_FONT_SIZE as f32 * 0.5);
            assert_eq!(band.width, line.width);
        }

        // Leaving the purple steps retints the outgoing block too
        p.scroll_to_step(Ordinal(4));
        p.update(DT);
        let teal = p.active_record().unwrap().shadow.color();
        let outgoing = p.narrative(mono).into_iter().find(|b| b.ordinal == Ordinal(3)).unwrap();
        let color = outgoing.highlight_color.unwrap();
        assert_eq!((color.r, color.g, color.b), (teal.r, teal.g, teal.b));
    }

    #[test]
    fn narrative_follows_scroll() {
        let mut p = presentation();
        let before = p.narrative(mono)[1].bounds.y;
        p.scroll_by(300.0);
        let after = p.narrative(mono)[1].bounds.y;
        assert!((before - after - 300.0).abs() < 1e-3);
    }
}
