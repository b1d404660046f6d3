//! Simulation tunables
//!
//! Loaded from a JSON file; any key left out falls back to the default in
//! `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Runtime-tunable simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Collisions ===
    /// Damage per squared unit of impact speed
    pub damage_coefficient: f32,
    /// Squared center distance at or below which two bodies count as coincident
    pub collision_epsilon: f32,

    // === Timing ===
    /// Fixed ticks per second
    pub tick_rate_hz: u32,

    // === Camera ===
    /// Viewport width in world units (zoomed out)
    pub view_width: f32,
    /// Viewport height in world units (zoomed out)
    pub view_height: f32,
    /// 1.0 is zoomed out; 2.5 is the standard zoomed-in view
    pub zoom: f32,
    /// Pixels per world unit
    pub unit: f32,

    // === Ships ===
    pub max_thruster_power: f32,
    /// Linear acceleration per unit of thruster power, divided by ship mass
    pub thrust_per_power: f32,
    /// Angular acceleration (rad/s²) per unit of spin thruster power
    pub turn_per_power: f32,
    /// Fraction of angular velocity lost per second
    pub angular_damping: f32,
    /// Maximum speed relative to a planet that still allows landing
    pub landing_speed_limit: f32,

    // === Torpedoes ===
    pub torpedo_speed: f32,
    pub torpedo_radius: f32,
    pub torpedo_mass: f32,
    /// Ticks before an unexploded torpedo detonates on its own
    pub torpedo_fuse_ticks: u32,
    /// Ticks an explosion lingers before the torpedo is removed
    pub explosion_ticks: u32,
    pub torpedo_cooldown_ticks: u32,

    // === World ===
    /// Distance past the world edge at which removable objects are culled
    pub world_margin: f32,
    /// RNG seed for meteor showers and generated content
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            damage_coefficient: DAMAGE_COEFFICIENT,
            collision_epsilon: COLLISION_EPSILON,

            tick_rate_hz: TICK_RATE_HZ,

            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            zoom: 1.0,
            unit: UNIT_PIXELS,

            max_thruster_power: MAX_THRUSTER_POWER,
            thrust_per_power: 0.5,
            turn_per_power: 0.05,
            angular_damping: 0.5,
            landing_speed_limit: 2.0,

            torpedo_speed: 20.0,
            torpedo_radius: 0.3,
            torpedo_mass: 1.0,
            torpedo_fuse_ticks: 5 * TICK_RATE_HZ,
            explosion_ticks: TICK_RATE_HZ / 2,
            torpedo_cooldown_ticks: TICK_RATE_HZ,

            world_margin: 50.0,
            seed: 1,
        }
    }
}

impl Settings {
    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }

    /// Parse settings from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.zoom <= 0.0 {
            return Err(SimError::InvalidSettings(format!("zoom must be positive, got {}", self.zoom)));
        }
        if self.torpedo_mass <= 0.0 {
            return Err(SimError::InvalidSettings("torpedo mass must be positive".into()));
        }
        Ok(())
    }
}
