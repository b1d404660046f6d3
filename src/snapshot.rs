//! Render-facing view of one frame
//!
//! A flat list of what to draw and where, plus per-ship HUD rows. Nothing
//! here refers back into the live region, so a snapshot can be serialized or
//! handed to another thread.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Circle, ObjectKind, Region, RegionEvent, Ship, ThrusterName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpriteKind {
    Ship,
    DisabledShip,
    Asteroid,
    Meteor,
    Torpedo,
    Explosion,
    Planet,
    WarpGate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub radius: f32,
    pub angle: f32,
}

impl BodyView {
    fn of(kind: SpriteKind, body: &impl Circle, angle: f32) -> Self {
        Self {
            kind,
            pos: body.pos(),
            radius: body.radius(),
            angle,
        }
    }
}

/// One HUD row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipHud {
    pub name: String,
    pub health: f32,
    pub max_health: f32,
    pub exploded: bool,
    pub disabled: bool,
    pub landed_on: Option<String>,
    pub primary: bool,
    /// Power of each thruster
    pub thrusters: [(ThrusterName, f32); 4],
}

impl ShipHud {
    pub fn of(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            health: ship.health,
            max_health: ship.max_health,
            exploded: ship.has_exploded(),
            disabled: ship.is_disabled(),
            landed_on: ship.landed_on.clone(),
            primary: ship.primary,
            thrusters: ThrusterName::ALL.map(|name| (name, ship.thrusters.get(name))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Camera offset in pixels
    pub camera: Vec2,
    pub zoom: f32,
    pub solar_system: String,
    pub world_size: Vec2,
    /// Back to front: planets, gates, objects, ships
    pub bodies: Vec<BodyView>,
    pub hud: Vec<ShipHud>,
    pub events: Vec<RegionEvent>,
}

impl FrameSnapshot {
    pub fn capture(region: &Region, frame: u64, camera: Vec2, zoom: f32) -> Self {
        let mut bodies = Vec::with_capacity(
            region.planets.len() + region.warp_gates.len() + region.objects.len() + region.ships.len(),
        );

        bodies.extend(region.planets.iter().map(|p| BodyView::of(SpriteKind::Planet, p, 0.0)));
        bodies.extend(
            region
                .warp_gates
                .iter()
                .map(|g| BodyView::of(SpriteKind::WarpGate, g, 0.0)),
        );
        for object in &region.objects {
            let kind = match object.kind {
                ObjectKind::Asteroid => SpriteKind::Asteroid,
                ObjectKind::Meteor => SpriteKind::Meteor,
                ObjectKind::Torpedo(t) if t.has_exploded => SpriteKind::Explosion,
                ObjectKind::Torpedo(_) => SpriteKind::Torpedo,
            };
            let angle = object.motion.vel.to_angle();
            bodies.push(BodyView::of(kind, object, angle));
        }
        for ship in &region.ships {
            let kind = if ship.is_disabled() {
                SpriteKind::DisabledShip
            } else {
                SpriteKind::Ship
            };
            bodies.push(BodyView::of(kind, ship, ship.angle));
        }

        Self {
            frame,
            camera,
            zoom,
            solar_system: region.name.clone(),
            world_size: region.world_size,
            bodies,
            hud: region.ships.iter().map(ShipHud::of).collect(),
            events: region.events.clone(),
        }
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }
}
