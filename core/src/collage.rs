pub const PARALLAX_FACTOR: f64 = -0.05;
pub const PARALLAX_MAX_SHIFT_PX: f64 = 40.0;

/// Measured size of the horizontally scrolling collage viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollageGeometry {
    pub scroll_width: f64,
    pub client_width: f64,
}

impl CollageGeometry {
    pub fn new(scroll_width: f64, client_width: f64) -> Self {
        Self {
            scroll_width,
            client_width,
        }
    }

    pub fn section_width(&self, count: usize) -> f64 {
        if count == 0 || !self.scroll_width.is_finite() || self.scroll_width <= 0.0 {
            return 0.0;
        }
        self.scroll_width / count as f64
    }

    pub fn offset_for(&self, index: usize, count: usize) -> f64 {
        self.section_width(count) * index.min(count.saturating_sub(1)) as f64
    }

    /// Index of the category boundary closest to `scroll_left`, clamped to the sequence.
    pub fn nearest_index(&self, scroll_left: f64, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let section = self.section_width(count);
        if section <= 0.0 || !scroll_left.is_finite() {
            return Some(0);
        }
        let raw = (scroll_left / section).round();
        let max = (count - 1) as f64;
        Some(raw.clamp(0.0, max) as usize)
    }
}

/// Tile bounds relative to the viewport's left edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBounds {
    pub left: f64,
    pub width: f64,
}

pub fn parallax_shift(tile: TileBounds, viewport_width: f64) -> f64 {
    let offset = tile.left + tile.width / 2.0 - viewport_width / 2.0;
    if !offset.is_finite() {
        return 0.0;
    }
    (offset * PARALLAX_FACTOR).clamp(-PARALLAX_MAX_SHIFT_PX, PARALLAX_MAX_SHIFT_PX)
}

/// Per-tile horizontal media offsets, in tile order. Replaced wholesale on
/// every scroll pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parallax {
    shifts: Vec<f64>,
}

impl Parallax {
    pub fn compute(tiles: &[TileBounds], viewport_width: f64) -> Self {
        Self {
            shifts: tiles
                .iter()
                .map(|tile| parallax_shift(*tile, viewport_width))
                .collect(),
        }
    }

    pub fn shift(&self, tile: usize) -> f64 {
        self.shifts.get(tile).copied().unwrap_or(0.0)
    }

    pub fn shifts(&self) -> &[f64] {
        &self.shifts
    }

    pub fn transform(&self, tile: usize) -> String {
        format!("translateX({}px)", self.shift(tile))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    /// Gesture target sits inside a nested horizontally scrolling strip.
    pub in_strip: bool,
}

impl WheelInput {
    pub fn is_vertical(&self) -> bool {
        self.delta_y.abs() > self.delta_x.abs()
    }

    pub fn direction(&self) -> isize {
        if self.delta_y > 0.0 {
            1
        } else {
            -1
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    pub fn from_dom_key(value: &str) -> Self {
        match value {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }

    pub fn step(self) -> Option<isize> {
        match self {
            Key::ArrowLeft => Some(-1),
            Key::ArrowRight => Some(1),
            _ => None,
        }
    }
}

/// Wheel-step rate limiter. Events inside the window are dropped, not queued.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    window_ms: f64,
    last_ms: Option<f64>,
}

impl Cooldown {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_ms: None,
        }
    }

    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last < self.window_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
