//! Per-solar-system simulation state
//!
//! A region owns every live body in one solar system. Removable objects sit
//! in a plain vector and are only ever removed by [`Region::compact`] at the
//! end of a tick, so indices stay stable while the collision scans run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Motion, ObjectId, Planet, RemovableObject, Ship, ShipId, WarpGate};
use super::rules::RegionEvent;
use crate::consts::*;
use crate::settings::Settings;

/// Periodic burst of meteors from a fixed point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorShower {
    pub origin: Vec2,
    /// Ticks between bursts
    pub interval_ticks: u32,
    /// Meteors per burst
    pub burst: u32,
    /// Maximum meteor speed
    pub speed: f32,
}

/// One solar system's live bodies
#[derive(Debug)]
pub struct Region {
    pub index: usize,
    pub name: String,
    /// World extent in units
    pub world_size: Vec2,
    pub ships: Vec<Ship>,
    /// Asteroids, meteors and torpedoes
    pub objects: Vec<RemovableObject>,
    pub planets: Vec<Planet>,
    pub warp_gates: Vec<WarpGate>,
    pub meteor_shower: Option<MeteorShower>,
    /// Events from the most recent tick
    pub events: Vec<RegionEvent>,
    /// Ticks simulated since start
    pub time_ticks: u64,
    /// Watched ship, if it is in this region
    pub watched: Option<ShipId>,
    pub(crate) rng: Pcg32,
    next_id: ObjectId,
    running: bool,
}

impl Region {
    pub fn new(index: usize, name: impl Into<String>, world_size: Vec2, seed: u64) -> Self {
        Self {
            index,
            name: name.into(),
            world_size,
            ships: Vec::new(),
            objects: Vec::new(),
            planets: Vec::new(),
            warp_gates: Vec::new(),
            meteor_shower: None,
            events: Vec::new(),
            time_ticks: 0,
            watched: None,
            rng: Pcg32::seed_from_u64(seed.wrapping_add(index as u64)),
            next_id: 1,
            running: false,
        }
    }

    /// Allocate a new object ID
    pub fn next_entity_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin simulating with the given ships
    pub fn start(&mut self, ships: Vec<Ship>, watched: Option<ShipId>) {
        log::info!(
            "Region {} ({}) starting with {} ships, {} objects",
            self.index,
            self.name,
            ships.len(),
            self.objects.len()
        );
        self.ships = ships;
        self.watched = watched;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drop every body and stop simulating
    pub fn end(&mut self) {
        self.ships.clear();
        self.objects.clear();
        self.planets.clear();
        self.warp_gates.clear();
        self.events.clear();
        self.watched = None;
        self.running = false;
    }

    /// Take in a ship arriving by warp
    pub fn admit_ship(&mut self, ship: Ship) {
        if ship.primary {
            self.watched = Some(ship.id);
        }
        self.ships.push(ship);
    }

    pub fn add_asteroid(&mut self, pos: Vec2, vel: Vec2, radius: f32, mass: Option<f32>) -> ObjectId {
        let id = self.next_entity_id();
        let mass = mass.unwrap_or(ASTEROID_MASS_PER_AREA * radius * radius);
        self.objects
            .push(RemovableObject::asteroid(id, Motion::new(pos, vel, radius, mass)));
        id
    }

    pub fn add_meteor(&mut self, pos: Vec2, vel: Vec2) -> ObjectId {
        let id = self.next_entity_id();
        self.objects.push(RemovableObject::meteor(
            id,
            Motion::new(pos, vel, METEOR_RADIUS, METEOR_MASS),
        ));
        id
    }

    pub fn add_torpedo(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        owner: Option<ShipId>,
        settings: &Settings,
    ) -> ObjectId {
        let id = self.next_entity_id();
        let motion = Motion::new(pos, vel, settings.torpedo_radius, settings.torpedo_mass);
        self.objects.push(RemovableObject::torpedo(
            id,
            motion,
            settings.torpedo_fuse_ticks,
            owner,
        ));
        id
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id == id)
    }

    pub fn ship_by_name(&self, name: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.name == name)
    }

    pub fn object(&self, id: ObjectId) -> Option<&RemovableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Remove destroyed objects and objects that left the world
    ///
    /// Returns how many were removed.
    pub fn compact(&mut self, settings: &Settings) -> usize {
        let before = self.objects.len();
        let world = self.world_size;
        let margin = settings.world_margin;
        self.objects
            .retain(|o| !o.destroyed && within(world, o.motion.pos, margin));
        let removed = before - self.objects.len();
        if removed > 0 {
            log::debug!("Region {}: removed {} objects", self.name, removed);
        }
        removed
    }
}

/// True if `pos` lies within the world extended by `margin`
fn within(world: Vec2, pos: Vec2, margin: f32) -> bool {
    pos.x >= -margin && pos.y >= -margin && pos.x <= world.x + margin && pos.y <= world.y + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::control::Idle;

    #[test]
    fn test_ids_are_unique() {
        let mut region = Region::new(0, "Sol", Vec2::splat(100.0), 1);
        let a = region.add_asteroid(Vec2::ZERO, Vec2::ZERO, 2.0, None);
        let m = region.add_meteor(Vec2::ZERO, Vec2::ZERO);
        assert_ne!(a, m);
        assert_eq!(region.objects.len(), 2);
        assert!((region.object(a).unwrap().motion.mass - ASTEROID_MASS_PER_AREA * 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_compact_removes_destroyed_and_escaped() {
        let settings = Settings::default();
        let mut region = Region::new(0, "Sol", Vec2::splat(100.0), 1);
        let keep = region.add_meteor(Vec2::new(10.0, 10.0), Vec2::ZERO);
        let gone = region.add_meteor(Vec2::new(20.0, 20.0), Vec2::ZERO);
        region.add_meteor(Vec2::new(100.0 + settings.world_margin + 1.0, 0.0), Vec2::ZERO);
        region.objects[1].destroyed = true;

        assert_eq!(region.compact(&settings), 2);
        assert!(region.object(keep).is_some());
        assert!(region.object(gone).is_none());
    }

    #[test]
    fn test_start_and_end() {
        let mut region = Region::new(2, "Kepler", Vec2::splat(100.0), 1);
        let ship = Ship::new(
            9,
            "Normandy",
            Motion::new(Vec2::ONE, Vec2::ZERO, 1.0, 10.0),
            100.0,
            Box::new(Idle),
        );
        region.start(vec![ship], Some(9));
        assert!(region.is_running());
        assert_eq!(region.ship_by_name("Normandy").map(|s| s.id), Some(9));
        assert_eq!(region.watched, Some(9));

        region.end();
        assert!(!region.is_running());
        assert!(region.ships.is_empty());
        assert!(region.watched.is_none());
    }
}
