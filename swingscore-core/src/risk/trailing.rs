/// Trailing-stop ratchet for a held long position.
///
/// **Core Rule:** the stop may tighten, never loosen, even when ATR expands.
/// Each update proposes `latest_close − multiple·atr20` and keeps the higher
/// of that and the current level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailingStop {
    level: f64,
    multiple: f64,
}

impl TrailingStop {
    pub fn new(initial_level: f64, multiple: f64) -> Self {
        Self {
            level: initial_level,
            multiple,
        }
    }

    /// Ratchet against the latest close. Non-finite proposals are ignored.
    pub fn update(&mut self, latest_close: f64, atr20: f64) -> f64 {
        let proposed = latest_close - self.multiple * atr20;
        if proposed.is_finite() && proposed > self.level {
            self.level = proposed;
        }
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// True when `price` is at or below the stop.
    pub fn is_hit(&self, price: f64) -> bool {
        price <= self.level
    }
}
