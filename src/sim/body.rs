//! Collidable bodies
//!
//! Everything that can be struck carries a [`Motion`]. Ships and removable
//! objects (asteroids, meteors, torpedoes) take part in elastic collisions;
//! planets and warp gates only implement [`Circle`], so they can be tested for
//! overlap (landing, warping) but never handed to the resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::control::{ShipController, Thrusters};

pub type ShipId = u32;
pub type ObjectId = u32;

/// Anything with a center and a radius
pub trait Circle {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Position, velocity, radius and mass of a body that can be struck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Motion {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel,
            radius: radius.max(0.0),
            mass,
        }
    }

    /// Advance position by one step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

impl Circle for Motion {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A piloted ship
#[derive(Debug)]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    pub motion: Motion,
    /// Facing (radians, normalized to [-π, π))
    pub angle: f32,
    pub angular_vel: f32,
    pub health: f32,
    pub max_health: f32,
    /// Watched ship: drives the camera and the HUD
    pub primary: bool,
    pub thrusters: Thrusters,
    /// Name of the planet the ship is sitting on
    pub landed_on: Option<String>,
    /// Ticks until the torpedo tubes are loaded
    pub torpedo_cooldown: u32,
    /// Destination solar system requested through a warp gate this tick
    pub pending_warp: Option<String>,
    pub controller: Box<dyn ShipController>,
}

impl Ship {
    pub fn new(
        id: ShipId,
        name: impl Into<String>,
        motion: Motion,
        health: f32,
        controller: Box<dyn ShipController>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            motion,
            angle: 0.0,
            angular_vel: 0.0,
            health,
            max_health: health,
            primary: false,
            thrusters: Thrusters::default(),
            landed_on: None,
            torpedo_cooldown: 0,
            pending_warp: None,
            controller,
        }
    }

    /// Subtract damage from health (floored at 0)
    ///
    /// Returns true when this hit is the one that disabled the ship.
    pub fn receive_damage(&mut self, damage: f32) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.health = (self.health - damage.max(0.0)).max(0.0);
        if self.is_disabled() {
            self.thrusters = Thrusters::default();
            log::info!("Ship {} disabled", self.name);
            return true;
        }
        false
    }

    /// No health left; commands are refused and the ship drifts
    pub fn is_disabled(&self) -> bool {
        self.health <= 0.0
    }

    /// Ships take damage through health, they never detonate
    pub fn has_exploded(&self) -> bool {
        false
    }

    pub fn is_landed(&self) -> bool {
        self.landed_on.is_some()
    }
}

impl Circle for Ship {
    fn pos(&self) -> Vec2 {
        self.motion.pos
    }
    fn radius(&self) -> f32 {
        self.motion.radius
    }
}

/// Torpedo state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Torpedo {
    pub has_exploded: bool,
    /// Ticks until self-detonation
    pub fuse_ticks: u32,
    /// Ticks left of the explosion once detonated
    pub explosion_ticks: u32,
    pub owner: Option<ShipId>,
}

/// Kinds of removable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Asteroid,
    Meteor,
    Torpedo(Torpedo),
}

/// An asteroid, meteor or torpedo: a body that can be destroyed and removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovableObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub motion: Motion,
    /// Marked for removal at the end of the tick
    pub destroyed: bool,
}

impl RemovableObject {
    pub fn asteroid(id: ObjectId, motion: Motion) -> Self {
        Self {
            id,
            kind: ObjectKind::Asteroid,
            motion,
            destroyed: false,
        }
    }

    pub fn meteor(id: ObjectId, motion: Motion) -> Self {
        Self {
            id,
            kind: ObjectKind::Meteor,
            motion,
            destroyed: false,
        }
    }

    pub fn torpedo(id: ObjectId, motion: Motion, fuse_ticks: u32, owner: Option<ShipId>) -> Self {
        Self {
            id,
            kind: ObjectKind::Torpedo(Torpedo {
                has_exploded: false,
                fuse_ticks,
                explosion_ticks: 0,
                owner,
            }),
            motion,
            destroyed: false,
        }
    }

    pub fn is_torpedo(&self) -> bool {
        matches!(self.kind, ObjectKind::Torpedo(_))
    }

    /// Torpedo that already went off, or debris that was already destroyed
    pub fn has_exploded(&self) -> bool {
        match self.kind {
            ObjectKind::Torpedo(t) => t.has_exploded,
            ObjectKind::Asteroid | ObjectKind::Meteor => self.destroyed,
        }
    }

    /// Detonation signal: torpedoes start exploding, debris is destroyed
    pub fn receive_detonation(&mut self, explosion_ticks: u32) {
        match &mut self.kind {
            ObjectKind::Torpedo(t) => {
                if !t.has_exploded {
                    t.has_exploded = true;
                    t.explosion_ticks = explosion_ticks;
                }
            }
            ObjectKind::Asteroid | ObjectKind::Meteor => self.destroyed = true,
        }
    }

    /// Move one step and run torpedo timers
    pub fn advance(&mut self, dt: f32, explosion_ticks: u32) {
        self.motion.integrate(dt);

        if let ObjectKind::Torpedo(t) = &mut self.kind {
            if t.has_exploded {
                t.explosion_ticks = t.explosion_ticks.saturating_sub(1);
                if t.explosion_ticks == 0 {
                    self.destroyed = true;
                }
            } else {
                t.fuse_ticks = t.fuse_ticks.saturating_sub(1);
                if t.fuse_ticks == 0 {
                    t.has_exploded = true;
                    t.explosion_ticks = explosion_ticks;
                }
            }
        }
    }
}

impl Circle for RemovableObject {
    fn pos(&self) -> Vec2 {
        self.motion.pos
    }
    fn radius(&self) -> f32 {
        self.motion.radius
    }
}

/// A planet ships can land on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
}

impl Circle for Planet {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A gate leading to another solar system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpGate {
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
    /// Solar system this gate leads to
    pub destination: String,
}

impl Circle for WarpGate {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}
