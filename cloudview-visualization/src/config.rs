//! Camera configuration
//!
//! Settings are plain serde data so they can live in a TOML file next to the
//! other viewer preferences. Missing keys take their defaults.

use std::path::Path;
use std::time::Duration;

use cloudview_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::navigation::{SpeedTable, DEFAULT_SPEEDS};

/// Camera interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Virtual trackball: rotation about an arbitrary axis, no fixed up vector
    Trackball,
    /// Turntable: yaw about world Z, pitch about world X
    #[default]
    Turntable,
    /// First-person flight driven by position, yaw and pitch
    Navigation,
}

impl CameraMode {
    /// Whether the examiner (center, rotation, distance) formulation is active
    pub fn is_examiner(self) -> bool {
        !matches!(self, CameraMode::Navigation)
    }
}

/// Tunable camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    /// Vertical field of view in degrees
    pub field_of_view: f64,
    /// Initial eye to center distance in examiner modes
    pub distance: f64,
    /// Flip the z axis of the view transform
    pub reverse_handedness: bool,
    /// Navigation speeds in metres per second, strictly ascending
    pub speed_table: Vec<f64>,
    /// Initial index into `speed_table`
    pub speed_mode: usize,
    /// Radius of the virtual trackball in normalized viewport units
    pub trackball_radius: f64,
    /// Exponential zoom rate per viewport height dragged
    pub zoom_speed: f64,
    /// Largest navigation integration step in seconds
    pub max_navigation_step: f64,
    /// Mouse-look rate in degrees per pixel
    pub look_sensitivity: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Turntable,
            field_of_view: 60.0,
            distance: 5.0,
            reverse_handedness: false,
            speed_table: DEFAULT_SPEEDS.to_vec(),
            speed_mode: 2,
            trackball_radius: 1.1,
            zoom_speed: 3.0,
            max_navigation_step: 0.1,
            look_sensitivity: 0.2,
        }
    }
}

impl CameraConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded camera configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every setting, including the speed table and the step length
    pub fn validate(&self) -> Result<()> {
        check_field_of_view(self.field_of_view)?;
        check_distance(self.distance)?;
        for (name, value) in [
            ("trackball_radius", self.trackball_radius),
            ("zoom_speed", self.zoom_speed),
            ("max_navigation_step", self.max_navigation_step),
            ("look_sensitivity", self.look_sensitivity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        self.navigation_step()?;
        self.speeds()?;
        Ok(())
    }

    /// `max_navigation_step` as a [`Duration`]
    pub fn navigation_step(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.max_navigation_step).map_err(|e| {
            Error::Config(format!(
                "max_navigation_step {} is not a valid duration: {e}",
                self.max_navigation_step
            ))
        })
    }

    /// `speed_table` and `speed_mode` as a validated [`SpeedTable`]
    pub fn speeds(&self) -> Result<SpeedTable> {
        SpeedTable::new(self.speed_table.clone(), self.speed_mode)
    }
}

pub(crate) fn check_field_of_view(fov: f64) -> Result<()> {
    if fov.is_finite() && fov > 0.0 && fov < 180.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "field of view must lie strictly between 0 and 180 degrees, got {fov}"
        )))
    }
}

pub(crate) fn check_distance(distance: f64) -> Result<()> {
    if distance.is_finite() && distance > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "eye to center distance must be positive, got {distance}"
        )))
    }
}
