//! Galaxy content layout
//!
//! What the content loader hands the game at startup: solar systems with
//! their planets, warp gates and debris, plus the roster of ships that can be
//! built. Layouts are plain serde types so they can be read from JSON.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::{Autopilot, Idle, MeteorShower, Motion, Planet, Region, Ship, ShipController, ShipId, WarpGate};

fn default_start_position() -> Vec2 {
    Vec2::new(30.0, 30.0)
}

fn default_extent() -> f32 {
    100.0
}

/// Whole galaxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyLayout {
    pub name: String,
    pub starting_solar_system: String,
    /// Where newly built ships appear in the starting system
    #[serde(default = "default_start_position")]
    pub start_position: Vec2,
    pub solar_systems: Vec<SolarSystemLayout>,
    #[serde(default)]
    pub ships: Vec<ShipBlueprint>,
}

/// One solar system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystemLayout {
    pub name: String,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub height: f32,
    #[serde(default)]
    pub planets: Vec<Planet>,
    #[serde(default)]
    pub warp_gates: Vec<WarpGate>,
    #[serde(default)]
    pub asteroids: Vec<AsteroidLayout>,
    #[serde(default)]
    pub meteor_shower: Option<MeteorShower>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidLayout {
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
    pub radius: f32,
    /// Defaults to a mass proportional to the asteroid's area
    #[serde(default)]
    pub mass: Option<f32>,
}

fn default_controller() -> String {
    "idle".to_string()
}

/// A ship that can be built at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipBlueprint {
    pub name: String,
    #[serde(default = "ShipBlueprint::default_radius")]
    pub radius: f32,
    #[serde(default = "ShipBlueprint::default_mass")]
    pub mass: f32,
    #[serde(default = "ShipBlueprint::default_health")]
    pub health: f32,
    /// `"idle"` or `"autopilot"`
    #[serde(default = "default_controller")]
    pub controller: String,
    /// Autopilot destination
    #[serde(default)]
    pub target: Option<Vec2>,
}

impl ShipBlueprint {
    fn default_radius() -> f32 {
        SHIP_RADIUS
    }
    fn default_mass() -> f32 {
        SHIP_MASS
    }
    fn default_health() -> f32 {
        SHIP_HEALTH
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            radius: SHIP_RADIUS,
            mass: SHIP_MASS,
            health: SHIP_HEALTH,
            controller: default_controller(),
            target: None,
        }
    }

    fn build_controller(&self) -> Result<Box<dyn ShipController>, SimError> {
        match self.controller.to_lowercase().as_str() {
            "idle" => Ok(Box::new(Idle)),
            "autopilot" => {
                let target = self.target.ok_or_else(|| {
                    SimError::InvalidLayout(format!("ship '{}': autopilot needs a target", self.name))
                })?;
                Ok(Box::new(Autopilot::new(target)))
            }
            other => Err(SimError::UnknownController {
                kind: other.to_string(),
            }),
        }
    }

    /// Construct the ship at `pos`
    pub fn build(&self, id: ShipId, pos: Vec2) -> Result<Ship, SimError> {
        let controller = self.build_controller()?;
        let motion = Motion::new(pos, Vec2::ZERO, self.radius, self.mass);
        Ok(Ship::new(id, self.name.clone(), motion, self.health, controller))
    }
}

impl SolarSystemLayout {
    /// Build the region for this system with its static bodies and debris
    pub fn build_region(&self, index: usize, settings: &Settings) -> Region {
        let mut region = Region::new(index, self.name.clone(), Vec2::new(self.width, self.height), settings.seed);
        region.planets = self.planets.clone();
        region.warp_gates = self.warp_gates.clone();
        region.meteor_shower = self.meteor_shower.clone();
        for a in &self.asteroids {
            region.add_asteroid(a.pos, a.vel, a.radius, a.mass);
        }
        region
    }
}

impl GalaxyLayout {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let layout: GalaxyLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let layout = Self::from_json(&json)?;
        log::info!("Loaded galaxy '{}' from {}", layout.name, path.display());
        Ok(layout)
    }

    pub fn solar_system_index(&self, name: &str) -> Option<usize> {
        self.solar_systems.iter().position(|s| s.name == name)
    }

    pub fn blueprint(&self, name: &str) -> Option<&ShipBlueprint> {
        self.ships.iter().find(|s| s.name == name)
    }

    /// Check names, references and body parameters
    pub fn validate(&self) -> Result<(), SimError> {
        if self.solar_systems.is_empty() {
            return Err(SimError::InvalidLayout("galaxy has no solar systems".into()));
        }

        let mut names = HashSet::new();
        for system in &self.solar_systems {
            if !names.insert(system.name.as_str()) {
                return Err(SimError::InvalidLayout(format!(
                    "duplicate solar system '{}'",
                    system.name
                )));
            }
        }

        if !names.contains(self.starting_solar_system.as_str()) {
            return Err(SimError::UnknownSolarSystem {
                name: self.starting_solar_system.clone(),
            });
        }

        for system in &self.solar_systems {
            if system.width <= 0.0 || system.height <= 0.0 {
                return Err(SimError::InvalidLayout(format!(
                    "solar system '{}' has no extent",
                    system.name
                )));
            }
            for gate in &system.warp_gates {
                if !names.contains(gate.destination.as_str()) {
                    return Err(SimError::UnknownSolarSystem {
                        name: gate.destination.clone(),
                    });
                }
            }
            let negative_radius = system.planets.iter().any(|p| p.radius < 0.0)
                || system.warp_gates.iter().any(|g| g.radius < 0.0)
                || system.asteroids.iter().any(|a| a.radius < 0.0);
            if negative_radius {
                return Err(SimError::InvalidLayout(format!(
                    "solar system '{}' has a negative radius",
                    system.name
                )));
            }
            if system.asteroids.iter().any(|a| a.mass.is_some_and(|m| m <= 0.0)) {
                return Err(SimError::InvalidLayout(format!(
                    "solar system '{}' has a massless asteroid",
                    system.name
                )));
            }
        }

        let mut ship_names = HashSet::new();
        for ship in &self.ships {
            if !ship_names.insert(ship.name.as_str()) {
                return Err(SimError::InvalidLayout(format!("duplicate ship '{}'", ship.name)));
            }
            if ship.mass <= 0.0 || ship.radius < 0.0 {
                return Err(SimError::InvalidLayout(format!(
                    "ship '{}' needs positive mass and non-negative radius",
                    ship.name
                )));
            }
        }
        Ok(())
    }

    /// Two linked systems with seeded asteroid fields and a meteor shower
    pub fn demo(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut asteroid_field = |count: usize, center: Vec2, spread: f32| -> Vec<AsteroidLayout> {
            (0..count)
                .map(|_| AsteroidLayout {
                    pos: center
                        + Vec2::new(
                            rng.random_range(-spread..spread),
                            rng.random_range(-spread..spread),
                        ),
                    vel: Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
                    radius: rng.random_range(0.8..2.5),
                    mass: None,
                })
                .collect()
        };

        let sol = SolarSystemLayout {
            name: "Sol".into(),
            width: 100.0,
            height: 100.0,
            planets: vec![
                Planet {
                    name: "Terra".into(),
                    pos: Vec2::new(70.0, 30.0),
                    radius: 4.0,
                },
                Planet {
                    name: "Mars".into(),
                    pos: Vec2::new(20.0, 75.0),
                    radius: 3.0,
                },
            ],
            warp_gates: vec![WarpGate {
                name: "Sol-Kepler".into(),
                pos: Vec2::new(90.0, 90.0),
                radius: 2.0,
                destination: "Kepler".into(),
            }],
            asteroids: asteroid_field(12, Vec2::new(50.0, 55.0), 15.0),
            meteor_shower: Some(MeteorShower {
                origin: Vec2::new(60.0, 80.0),
                interval_ticks: 4 * TICK_RATE_HZ,
                burst: 3,
                speed: 4.0,
            }),
        };

        let kepler = SolarSystemLayout {
            name: "Kepler".into(),
            width: 120.0,
            height: 120.0,
            planets: vec![Planet {
                name: "Kepler-22b".into(),
                pos: Vec2::new(60.0, 60.0),
                radius: 6.0,
            }],
            warp_gates: vec![WarpGate {
                name: "Kepler-Sol".into(),
                pos: Vec2::new(10.0, 10.0),
                radius: 2.0,
                destination: "Sol".into(),
            }],
            asteroids: asteroid_field(20, Vec2::new(80.0, 40.0), 20.0),
            meteor_shower: None,
        };

        GalaxyLayout {
            name: "Milky Way".into(),
            starting_solar_system: "Sol".into(),
            start_position: default_start_position(),
            solar_systems: vec![sol, kepler],
            ships: vec![
                ShipBlueprint {
                    controller: "autopilot".into(),
                    target: Some(Vec2::new(70.0, 30.0)),
                    ..ShipBlueprint::new("Normandy")
                },
                ShipBlueprint::new("Rocinante"),
                ShipBlueprint {
                    controller: "autopilot".into(),
                    target: Some(Vec2::new(90.0, 90.0)),
                    ..ShipBlueprint::new("Serenity")
                },
            ],
        }
    }
}
