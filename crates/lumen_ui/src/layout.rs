//! Linear layout for tab headers and panel children.

use lumen_core::Rect;

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    #[default]
    Horizontal,
    /// Vertical (top to bottom).
    Vertical,
}

/// Layout alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
    /// Stretch to fill available space.
    Stretch,
}

/// Arranges a run of elements along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Current layout direction.
    pub direction: Direction,
    /// Main axis alignment.
    pub main_alignment: Alignment,
    /// Cross axis alignment.
    pub cross_alignment: Alignment,
    /// Gap between elements.
    pub gap: f32,
    /// Padding around content.
    pub padding: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            direction: Direction::Horizontal,
            main_alignment: Alignment::Start,
            cross_alignment: Alignment::Start,
            gap: 4.0,
            padding: 0.0,
        }
    }
}

impl Layout {
    /// Creates a horizontal layout.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Default::default()
        }
    }

    /// Creates a vertical layout.
    #[must_use]
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            ..Default::default()
        }
    }

    /// Sets the gap between elements.
    #[must_use]
    pub const fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Sets padding around content.
    #[must_use]
    pub const fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Sets main axis alignment.
    #[must_use]
    pub const fn align_main(mut self, alignment: Alignment) -> Self {
        self.main_alignment = alignment;
        self
    }

    /// Sets cross axis alignment.
    #[must_use]
    pub const fn align_cross(mut self, alignment: Alignment) -> Self {
        self.cross_alignment = alignment;
        self
    }

    /// Lays out a list of sizes within the given bounds.
    ///
    /// Element `i` starts at the sum of the previous extents plus `i` gaps.
    #[must_use]
    pub fn arrange(&self, bounds: Rect, sizes: &[(f32, f32)]) -> Vec<Rect> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let content = bounds.shrink(self.padding);
        let total_gap = self.gap * (sizes.len() - 1) as f32;
        let mut results = Vec::with_capacity(sizes.len());

        match self.direction {
            Direction::Horizontal => {
                let total: f32 = sizes.iter().map(|(w, _)| *w).sum();
                let mut x = main_start(self.main_alignment, content.x, content.width, total + total_gap);

                for (w, h) in sizes {
                    let (y, height) = cross_place(self.cross_alignment, content.y, content.height, *h);
                    results.push(Rect::new(x, y, *w, height));
                    x += w + self.gap;
                }
            }
            Direction::Vertical => {
                let total: f32 = sizes.iter().map(|(_, h)| *h).sum();
                let mut y = main_start(self.main_alignment, content.y, content.height, total + total_gap);

                for (w, h) in sizes {
                    let (x, width) = cross_place(self.cross_alignment, content.x, content.width, *w);
                    results.push(Rect::new(x, y, width, *h));
                    y += h + self.gap;
                }
            }
        }

        results
    }
}

fn main_start(alignment: Alignment, start: f32, available: f32, used: f32) -> f32 {
    match alignment {
        Alignment::Start | Alignment::Stretch => start,
        Alignment::Center => start + (available - used) * 0.5,
        Alignment::End => start + available - used,
    }
}

fn cross_place(alignment: Alignment, start: f32, available: f32, size: f32) -> (f32, f32) {
    match alignment {
        Alignment::Start => (start, size),
        Alignment::Center => (start + (available - size) * 0.5, size),
        Alignment::End => (start + available - size, size),
        Alignment::Stretch => (start, available),
    }
}
