//! Fixed timestep region tick
//!
//! One call advances one solar system by one step:
//! controllers, kinematics, meteor spawns, collision scans, compaction.

use glam::Vec2;
use rand::Rng;

use super::body::{Ship, ShipId};
use super::control::{MapData, ShipCommands, ShipLink, ShipStatus};
use super::region::Region;
use super::rules::detect_collisions;
use crate::settings::Settings;
use crate::{heading_vector, normalize_angle};

/// Torpedo launch collected from a controller, spawned after the pass
struct Launch {
    pos: Vec2,
    vel: Vec2,
    owner: ShipId,
}

/// Advance a region by one fixed timestep
///
/// Returns the ships that asked to warp out this tick; the caller moves them
/// into their destination region.
pub fn tick(region: &mut Region, settings: &Settings) -> Vec<Ship> {
    if !region.is_running() {
        return Vec::new();
    }

    region.events.clear();
    region.time_ticks += 1;

    let launches = run_controllers(region, settings);
    for launch in launches {
        region.add_torpedo(launch.pos, launch.vel, Some(launch.owner), settings);
    }

    advance_kinematics(region, settings);
    spawn_meteors(region);

    detect_collisions(
        &mut region.ships,
        &mut region.objects,
        settings,
        &mut region.events,
    );

    region.compact(settings);
    take_departures(region)
}

/// Let every operational ship's controller issue commands, then apply them
fn run_controllers(region: &mut Region, settings: &Settings) -> Vec<Launch> {
    let Region {
        name,
        ships,
        planets,
        warp_gates,
        ..
    } = region;

    let mut launches = Vec::new();
    for ship in ships.iter_mut() {
        if ship.is_disabled() {
            continue;
        }

        let mut commands = ShipCommands::default();
        {
            let map = MapData {
                solar_system: name.as_str(),
                planets: planets.as_slice(),
                warp_gates: warp_gates.as_slice(),
            };
            let mut link = ShipLink::new(ShipStatus::of(ship), map, settings, &mut commands);
            ship.controller.update(&mut link);
        }

        if let Some(launch) = apply_commands(ship, commands, settings) {
            launches.push(launch);
        }
    }
    launches
}

fn apply_commands(ship: &mut Ship, commands: ShipCommands, settings: &Settings) -> Option<Launch> {
    for (name, power) in commands.thrusters {
        ship.thrusters.set(name, power);
    }

    if let Some(planet) = commands.land {
        log::info!("Ship {} landed on {}", ship.name, planet);
        ship.landed_on = Some(planet);
        ship.motion.vel = Vec2::ZERO;
        ship.angular_vel = 0.0;
        ship.thrusters = Default::default();
    }

    if let Some(destination) = commands.warp {
        log::info!("Ship {} warping to {}", ship.name, destination);
        ship.pending_warp = Some(destination);
    }

    let heading = commands.torpedo?;
    ship.torpedo_cooldown = settings.torpedo_cooldown_ticks;
    let dir = heading_vector(heading);
    let standoff = ship.motion.radius + settings.torpedo_radius + 0.1;
    Some(Launch {
        pos: ship.motion.pos + dir * standoff,
        vel: ship.motion.vel + dir * settings.torpedo_speed,
        owner: ship.id,
    })
}

/// Integrate ship thrust and every body's position
fn advance_kinematics(region: &mut Region, settings: &Settings) {
    let dt = settings.dt();

    for ship in region.ships.iter_mut() {
        ship.torpedo_cooldown = ship.torpedo_cooldown.saturating_sub(1);
        advance_ship(ship, settings, dt);
    }

    for object in region.objects.iter_mut() {
        object.advance(dt, settings.explosion_ticks);
    }
}

fn advance_ship(ship: &mut Ship, settings: &Settings, dt: f32) {
    if ship.is_landed() {
        if ship.thrusters.main <= 0.0 {
            return;
        }
        log::info!("Ship {} lifting off", ship.name);
        ship.landed_on = None;
    }

    let t = ship.thrusters;
    let spin = (t.counter_clockwise - t.clockwise) * settings.turn_per_power;
    ship.angular_vel += spin * dt;
    ship.angular_vel *= (1.0 - settings.angular_damping * dt).max(0.0);
    ship.angle = normalize_angle(ship.angle + ship.angular_vel * dt);

    let thrust = (t.main - t.bow) * settings.thrust_per_power / ship.motion.mass;
    ship.motion.vel += heading_vector(ship.angle) * thrust * dt;
    ship.motion.integrate(dt);
}

/// Fire a meteor burst when the shower is due
///
/// Every meteor in a burst starts on the same point.
fn spawn_meteors(region: &mut Region) {
    let Some(shower) = region.meteor_shower.clone() else {
        return;
    };
    if shower.interval_ticks == 0 || region.time_ticks % shower.interval_ticks as u64 != 0 {
        return;
    }

    for _ in 0..shower.burst {
        let angle = region.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = region.rng.random_range(0.5..=1.0) * shower.speed;
        region.add_meteor(shower.origin, heading_vector(angle) * speed);
    }
    log::debug!("Region {}: meteor burst of {}", region.name, shower.burst);
}

/// Detach ships that requested a warp
fn take_departures(region: &mut Region) -> Vec<Ship> {
    if region.ships.iter().all(|s| s.pending_warp.is_none()) {
        return Vec::new();
    }
    let (leaving, staying): (Vec<Ship>, Vec<Ship>) = std::mem::take(&mut region.ships)
        .into_iter()
        .partition(|s| s.pending_warp.is_some());
    region.ships = staying;
    if let Some(watched) = region.watched {
        if leaving.iter().any(|s| s.id == watched) {
            region.watched = None;
        }
    }
    leaving
}
