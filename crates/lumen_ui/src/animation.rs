//! Timed glides for switch knobs and progress fills.
//!
//! A [`Glide`] only remembers where it started, where it is heading and how
//! long it has been moving; the displayed value is derived on demand.

/// Seconds a switch knob takes to cross its track.
pub const KNOB_TRAVEL_SECS: f32 = 0.15;

/// Cubic ease-out over `t` in 0-1.
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let rest = 1.0 - t.clamp(0.0, 1.0);
    1.0 - rest * rest * rest
}

/// A value that glides towards its target over a fixed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    from: f32,
    to: f32,
    secs: f32,
    /// Time since the last retarget; `None` once settled.
    elapsed: Option<f32>,
}

impl Glide {
    /// Creates a glide resting at `value`. A non-positive `secs` makes every
    /// retarget instant.
    #[must_use]
    pub fn at_rest(value: f32, secs: f32) -> Self {
        Self {
            from: value,
            to: value,
            secs,
            elapsed: None,
        }
    }

    /// Returns the displayed value.
    #[must_use]
    pub fn value(&self) -> f32 {
        match self.elapsed {
            Some(elapsed) => self.from + (self.to - self.from) * ease_out(elapsed / self.secs),
            None => self.to,
        }
    }

    /// Returns the value being glided towards.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Returns true once the target is reached.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.elapsed.is_none()
    }

    /// Heads for a new target from wherever the glide currently is.
    pub fn retarget(&mut self, to: f32) {
        if (to - self.to).abs() <= f32::EPSILON {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed = (self.secs > 0.0).then_some(0.0);
    }

    /// Advances by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if let Some(elapsed) = self.elapsed {
            let elapsed = elapsed + dt;
            self.elapsed = (elapsed < self.secs).then_some(elapsed);
        }
    }
}
