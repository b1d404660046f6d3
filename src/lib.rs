//! Colony Clash - an educational space-ship combat simulator
//!
//! Core modules:
//! - `sim`: Per-region simulation (bodies, collisions, damage, tick)
//! - `game`: Orchestrates regions, the watched ship and the camera
//! - `galaxy`: Content layout consumed at startup
//! - `snapshot`: Per-frame view handed to rendering/HUD collaborators
//! - `settings`: Data-driven tunables

pub mod error;
pub mod galaxy;
pub mod game;
pub mod math;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::{CommandError, SimError};
pub use game::Game;
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Damage per squared unit of head-on impact speed
    pub const DAMAGE_COEFFICIENT: f32 = 20.0;
    /// Exact zero check on the collision normal
    pub const COLLISION_EPSILON: f32 = 0.0;

    /// Fixed simulation rate (20ms per tick)
    pub const TICK_RATE_HZ: u32 = 50;

    /// Viewport size in world units
    pub const VIEW_WIDTH: f32 = 100.0;
    pub const VIEW_HEIGHT: f32 = 100.0;
    /// Pixels per world unit
    pub const UNIT_PIXELS: f32 = 10.0;

    pub const MAX_THRUSTER_POWER: f32 = 100.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 1.0;
    pub const SHIP_MASS: f32 = 10.0;
    pub const SHIP_HEALTH: f32 = 1000.0;

    /// Debris defaults
    pub const ASTEROID_MASS_PER_AREA: f32 = 50.0;
    pub const METEOR_RADIUS: f32 = 0.5;
    pub const METEOR_MASS: f32 = 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest rotation from `from` to `to`, in [-π, π)
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading_vector(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
