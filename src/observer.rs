use crate::registry::Ordinal;

/// Vertical extent of a step region in page coordinates, `[top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f32,
    pub bottom: f32,
}

impl Span {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top: top.min(bottom), bottom: top.max(bottom) }
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// Emitted when the trigger line crosses into a different step region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEnter {
    pub ordinal: Ordinal,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct ScrollObserver {
    regions: Vec<(Ordinal, Span)>,
    offset: f32,
    active: Option<Ordinal>,
}

impl ScrollObserver {
    /// `regions` must be sorted by `top` and must not overlap.
    pub fn new(regions: Vec<(Ordinal, Span)>, offset: f32) -> Self {
        Self {
            regions,
            offset: offset.clamp(0.0, 1.0),
            active: None,
        }
    }

    /// `count` stacked regions, each `height` tall, starting at the top of the page.
    pub fn stacked(count: usize, height: f32, offset: f32) -> Self {
        let regions = (0..count)
            .map(|i| (Ordinal(i), Span::new(i as f32 * height, (i + 1) as f32 * height)))
            .collect();
        Self::new(regions, offset)
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<Ordinal> {
        self.active
    }

    #[cfg(test)]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn region(&self, ordinal: Ordinal) -> Option<Span> {
        self.regions.iter().find(|(o, _)| *o == ordinal).map(|(_, span)| *span)
    }

    pub fn page_height(&self) -> f32 {
        self.regions.last().map_or(0.0, |(_, span)| span.bottom)
    }

    /// Page coordinate of the trigger line for a given scroll position.
    pub fn trigger_line(&self, scroll_top: f32, viewport_height: f32) -> f32 {
        scroll_top + self.offset * viewport_height
    }

    /// Reports the step under the trigger line when it differs from the last one seen.
    /// Fast scrolls jump straight to the new region without reporting the ones in between.
    pub fn observe(&mut self, scroll_top: f32, viewport_height: f32) -> Option<StepEnter> {
        let line = self.trigger_line(scroll_top, viewport_height);
        let idx = self.regions.partition_point(|(_, span)| span.bottom <= line);
        let (ordinal, span) = self.regions.get(idx)?;
        if !span.contains(line) || self.active == Some(*ordinal) {
            return None;
        }

        let direction = match self.active {
            Some(previous) if previous > *ordinal => Direction::Up,
            _ => Direction::Down,
        };
        self.active = Some(*ordinal);
        Some(StepEnter { ordinal: *ordinal, direction })
    }
}
