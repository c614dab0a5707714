//! Keyboard navigation model: movement keys and the speed table

use std::collections::HashSet;

use cloudview_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Movement keys understood by navigation mode.
///
/// Default bindings are W/S/A/D for forward/back/left/right and E/Q for up/down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Set of movement keys currently held down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationKeys {
    held: HashSet<NavigationKey>,
}

impl NavigationKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns true if the key was not already held
    pub fn press(&mut self, key: NavigationKey) -> bool {
        self.held.insert(key)
    }

    /// Record a key release; returns true if the key was held
    pub fn release(&mut self, key: NavigationKey) -> bool {
        self.held.remove(&key)
    }

    pub fn contains(&self, key: NavigationKey) -> bool {
        self.held.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Whether vertical movement is requested
    pub fn vertical(&self) -> bool {
        self.contains(NavigationKey::Up) || self.contains(NavigationKey::Down)
    }
}

impl FromIterator<NavigationKey> for NavigationKeys {
    fn from_iter<I: IntoIterator<Item = NavigationKey>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

/// Movement speeds in metres per second, default index 2 (2 m/s).
pub const DEFAULT_SPEEDS: [f64; 9] = [0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0];

/// Ascending table of navigation speeds with a clamped selection index.
///
/// The selected index never exceeds `len - 2`, so the last entry is never
/// reachable by stepping faster.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedTable {
    speeds: Vec<f64>,
    mode: usize,
}

impl SpeedTable {
    /// Validate `speeds` and select `mode`
    pub fn new(speeds: Vec<f64>, mode: usize) -> Result<Self> {
        if speeds.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "speed table needs at least two entries, got {}",
                speeds.len()
            )));
        }
        if speeds.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::InvalidParameter(
                "speeds must be finite and positive".to_string(),
            ));
        }
        if speeds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidParameter(
                "speeds must be strictly ascending".to_string(),
            ));
        }
        let max_mode = speeds.len() - 2;
        if mode > max_mode {
            return Err(Error::InvalidParameter(format!(
                "speed mode {mode} out of range 0..={max_mode}"
            )));
        }
        Ok(Self { speeds, mode })
    }

    /// Currently selected speed
    pub fn speed(&self) -> f64 {
        self.speeds[self.mode]
    }

    /// Index of the selected speed
    pub fn mode(&self) -> usize {
        self.mode
    }

    /// Largest index `faster` can reach
    pub fn max_mode(&self) -> usize {
        self.speeds.len() - 2
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Step to the next faster speed; returns false when already at the limit
    pub fn faster(&mut self) -> bool {
        if self.mode < self.max_mode() {
            self.mode += 1;
            true
        } else {
            false
        }
    }

    /// Step to the next slower speed; returns false when already at the limit
    pub fn slower(&mut self) -> bool {
        if self.mode > 0 {
            self.mode -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            speeds: DEFAULT_SPEEDS.to_vec(),
            mode: 2,
        }
    }
}
