//! Game orchestration
//!
//! Owns one [`Region`] per solar system and drives them through a tick in
//! order. Also tracks the watched ship, the camera that follows it, and the
//! frame counter the renderer reads.

use glam::Vec2;

use crate::error::SimError;
use crate::galaxy::GalaxyLayout;
use crate::settings::Settings;
use crate::sim::{Region, Ship, ShipId, tick};
use crate::snapshot::FrameSnapshot;

/// Spacing between ships built together at the start position
const SHIP_SPACING: f32 = 3.0;

/// What the camera can see and how world units map to pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World extent in units
    pub world_size: Vec2,
    /// Viewport extent in units at zoom 1
    pub view_size: Vec2,
    pub zoom: f32,
    /// Pixels per unit
    pub unit: f32,
}

impl Viewport {
    /// Extent actually visible at the current zoom, in units
    pub fn visible_size(&self) -> Vec2 {
        self.view_size / self.zoom
    }

    /// Camera position (pixels from top-left) centred on `focus`, clamped so
    /// the view never leaves the world
    pub fn follow(&self, focus: Vec2) -> Vec2 {
        let visible = self.visible_size();
        let candidate = (focus - visible / 2.0) * self.unit;
        let max = ((self.world_size - visible) * self.unit).max(Vec2::ZERO);
        Vec2::new(clamp_axis(candidate.x, max.x), clamp_axis(candidate.y, max.y))
    }
}

fn clamp_axis(candidate: f32, max: f32) -> f32 {
    if candidate <= 0.0 {
        0.0
    } else if candidate <= max {
        candidate
    } else {
        max
    }
}

/// The whole simulation: every region, the watched ship and the camera
#[derive(Debug)]
pub struct Game {
    pub settings: Settings,
    pub regions: Vec<Region>,
    pub galaxy_name: String,
    /// Camera offset in pixels from the top-left of the world
    pub camera: Vec2,
    /// Increments every update
    pub frame: u64,
    pub paused: bool,
    /// 1.0 zoomed out; 2.5 standard zoomed in
    pub zoom: f32,
    /// Build every ship in the roster rather than only the watched one
    pub all_ships: bool,
    pub watch_ship: Option<ShipId>,
    pub watch_ship_name: String,
    pub drawn_region: Option<usize>,
    pub solar_system_name: String,
    initializing: bool,
    next_ship_id: ShipId,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let zoom = settings.zoom;
        Self {
            settings,
            regions: Vec::new(),
            galaxy_name: String::new(),
            camera: Vec2::ZERO,
            frame: 0,
            paused: false,
            zoom,
            all_ships: false,
            watch_ship: None,
            watch_ship_name: String::new(),
            drawn_region: None,
            solar_system_name: String::new(),
            initializing: true,
            next_ship_id: 1,
        }
    }

    fn next_ship_id(&mut self) -> ShipId {
        let id = self.next_ship_id;
        self.next_ship_id += 1;
        id
    }

    /// True until `start` has finished
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    /// Build regions and ships and hand the ships to the starting system
    pub fn start(
        &mut self,
        galaxy: &GalaxyLayout,
        all_ships: bool,
        watch_ship_name: &str,
    ) -> Result<(), SimError> {
        galaxy.validate()?;

        self.all_ships = all_ships;
        self.watch_ship_name = watch_ship_name.to_string();
        self.galaxy_name = galaxy.name.clone();
        self.solar_system_name = galaxy.starting_solar_system.clone();

        let start_index = galaxy
            .solar_system_index(&galaxy.starting_solar_system)
            .ok_or_else(|| SimError::UnknownSolarSystem {
                name: galaxy.starting_solar_system.clone(),
            })?;

        let mut ships = Vec::new();
        if all_ships {
            for (i, blueprint) in galaxy.ships.iter().enumerate() {
                let id = self.next_ship_id();
                let pos = galaxy.start_position + Vec2::new(i as f32 * SHIP_SPACING, 0.0);
                ships.push(blueprint.build(id, pos)?);
            }
        } else {
            let blueprint = galaxy
                .blueprint(watch_ship_name)
                .ok_or_else(|| SimError::WatchShipNotFound {
                    name: watch_ship_name.to_string(),
                })?;
            let id = self.next_ship_id();
            ships.push(blueprint.build(id, galaxy.start_position)?);
        }

        let watched = ships
            .iter_mut()
            .find(|s| s.name == watch_ship_name)
            .ok_or_else(|| SimError::WatchShipNotFound {
                name: watch_ship_name.to_string(),
            })?;
        watched.primary = true;
        let watch_id = watched.id;

        let mut regions: Vec<Region> = galaxy
            .solar_systems
            .iter()
            .enumerate()
            .map(|(i, system)| system.build_region(i, &self.settings))
            .collect();

        let mut ships = Some(ships);
        for region in regions.iter_mut() {
            if region.index == start_index {
                region.start(ships.take().unwrap_or_default(), Some(watch_id));
            } else {
                region.start(Vec::new(), None);
            }
        }

        self.regions = regions;
        self.watch_ship = Some(watch_id);
        self.drawn_region = Some(start_index);
        self.initializing = false;

        log::info!(
            "Game started in galaxy '{}' at {}, watching {}",
            self.galaxy_name,
            self.solar_system_name,
            watch_ship_name
        );
        Ok(())
    }

    /// Advance every region by one tick, move warping ships, follow the
    /// watched ship with the camera
    pub fn update(&mut self) -> Result<(), SimError> {
        let watch_id = self.watch_ship.ok_or(SimError::WatchShipNotSet)?;
        if self.paused {
            return Ok(());
        }

        let mut departures = Vec::new();
        for region in self.regions.iter_mut() {
            let origin = region.index;
            departures.extend(tick(region, &self.settings).into_iter().map(|s| (origin, s)));
        }
        for (origin, ship) in departures {
            self.arrive(origin, ship);
        }

        let (region_index, pos) = self
            .locate_ship(watch_id)
            .map(|(i, s)| (i, s.motion.pos))
            .ok_or(SimError::WatchShipNotSet)?;
        self.camera = self.viewport(region_index).follow(pos);
        self.frame += 1;
        Ok(())
    }

    /// Place a warping ship into its destination system
    fn arrive(&mut self, origin: usize, mut ship: Ship) {
        let destination = ship.pending_warp.take().unwrap_or_default();
        let origin_name = self.regions[origin].name.clone();

        let Some(target) = self.regions.iter().position(|r| r.name == destination) else {
            log::warn!("Ship {} cannot warp to unknown system {}", ship.name, destination);
            self.regions[origin].admit_ship(ship);
            return;
        };

        // Come out beside the gate that leads back, or mid-system
        let region = &mut self.regions[target];
        ship.motion.pos = region
            .warp_gates
            .iter()
            .find(|g| g.destination == origin_name)
            .map(|g| g.pos + Vec2::new(g.radius + ship.motion.radius + 1.0, 0.0))
            .unwrap_or(region.world_size / 2.0);
        ship.motion.vel = Vec2::ZERO;
        ship.angular_vel = 0.0;

        log::info!("Ship {} arrived in {}", ship.name, region.name);
        if ship.primary {
            self.solar_system_name = region.name.clone();
            self.drawn_region = Some(target);
        }
        region.admit_ship(ship);
    }

    /// Region index and ship for an ID, searching every region
    pub fn locate_ship(&self, id: ShipId) -> Option<(usize, &Ship)> {
        self.regions
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.ship(id).map(|s| (i, s)))
    }

    pub fn watched_ship(&self) -> Option<&Ship> {
        self.watch_ship
            .and_then(|id| self.locate_ship(id))
            .map(|(_, s)| s)
    }

    pub fn drawn_region(&self) -> Option<&Region> {
        self.drawn_region.and_then(|i| self.regions.get(i))
    }

    /// Viewport for a region at the current zoom
    pub fn viewport(&self, region_index: usize) -> Viewport {
        let world_size = self
            .regions
            .get(region_index)
            .map(|r| r.world_size)
            .unwrap_or(Vec2::new(self.settings.view_width, self.settings.view_height));
        Viewport {
            world_size,
            view_size: Vec2::new(self.settings.view_width, self.settings.view_height),
            zoom: self.zoom,
            unit: self.settings.unit,
        }
    }

    /// Snapshot of the drawn region for the renderer
    pub fn draw(&self) -> Result<FrameSnapshot, SimError> {
        let region = self.drawn_region().ok_or(SimError::NoDrawnRegion)?;
        Ok(FrameSnapshot::capture(region, self.frame, self.camera, self.zoom))
    }

    /// Tear down every region and release all ships
    pub fn end_game(&mut self) {
        for region in self.regions.iter_mut() {
            region.end();
        }
        self.regions.clear();
        self.watch_ship = None;
        self.drawn_region = None;
        log::info!("Game ended after {} frames", self.frame);
    }
}
