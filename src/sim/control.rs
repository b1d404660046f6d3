//! Ship controller interface
//!
//! A controller sees its ship only through a [`ShipLink`]: a read-only status
//! snapshot, the map of the current solar system, and a handful of commands.
//! Commands are buffered and applied by the tick before kinematics, so they
//! shape this tick's motion and collisions.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Circle, Planet, Ship, WarpGate};
use super::collision::if_collide;
use crate::error::CommandError;
use crate::settings::Settings;
use crate::{angle_diff, normalize_angle};

/// Ship thrusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThrusterName {
    /// Pushes forward along the facing
    Main,
    /// Pushes backward
    Bow,
    Clockwise,
    CounterClockwise,
}

impl ThrusterName {
    pub const ALL: [ThrusterName; 4] = [
        ThrusterName::Main,
        ThrusterName::Bow,
        ThrusterName::Clockwise,
        ThrusterName::CounterClockwise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThrusterName::Main => "main",
            ThrusterName::Bow => "bow",
            ThrusterName::Clockwise => "clockwise",
            ThrusterName::CounterClockwise => "counterClockwise",
        }
    }

}

impl fmt::Display for ThrusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThrusterName {
    type Err = CommandError;

    /// Case-insensitive thruster name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CommandError::UnknownThruster { name: s.to_string() })
    }
}

/// Current power of each thruster
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thrusters {
    pub main: f32,
    pub bow: f32,
    pub clockwise: f32,
    pub counter_clockwise: f32,
}

impl Thrusters {
    pub fn get(&self, name: ThrusterName) -> f32 {
        match name {
            ThrusterName::Main => self.main,
            ThrusterName::Bow => self.bow,
            ThrusterName::Clockwise => self.clockwise,
            ThrusterName::CounterClockwise => self.counter_clockwise,
        }
    }

    pub fn set(&mut self, name: ThrusterName, power: f32) {
        match name {
            ThrusterName::Main => self.main = power,
            ThrusterName::Bow => self.bow = power,
            ThrusterName::Clockwise => self.clockwise = power,
            ThrusterName::CounterClockwise => self.counter_clockwise = power,
        }
    }
}

/// Keys for scalar status lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKey {
    Angle,
    AngularVelocity,
    PositionX,
    PositionY,
    LinearVelocityX,
    LinearVelocityY,
    Radius,
    Health,
}

/// Read-only view of a ship at the start of the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStatus {
    pub angle: f32,
    pub angular_vel: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub landed: bool,
    pub disabled: bool,
    pub torpedo_cooldown: u32,
}

impl ShipStatus {
    pub fn of(ship: &Ship) -> Self {
        Self {
            angle: ship.angle,
            angular_vel: ship.angular_vel,
            pos: ship.motion.pos,
            vel: ship.motion.vel,
            radius: ship.motion.radius,
            health: ship.health,
            landed: ship.is_landed(),
            disabled: ship.is_disabled(),
            torpedo_cooldown: ship.torpedo_cooldown,
        }
    }

    pub fn get(&self, key: StatusKey) -> f32 {
        match key {
            StatusKey::Angle => self.angle,
            StatusKey::AngularVelocity => self.angular_vel,
            StatusKey::PositionX => self.pos.x,
            StatusKey::PositionY => self.pos.y,
            StatusKey::LinearVelocityX => self.vel.x,
            StatusKey::LinearVelocityY => self.vel.y,
            StatusKey::Radius => self.radius,
            StatusKey::Health => self.health,
        }
    }
}

impl Circle for ShipStatus {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Static features of the solar system a ship is in
#[derive(Debug, Clone, Copy)]
pub struct MapData<'a> {
    pub solar_system: &'a str,
    pub planets: &'a [Planet],
    pub warp_gates: &'a [WarpGate],
}

/// Commands issued by a controller during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipCommands {
    pub thrusters: Vec<(ThrusterName, f32)>,
    /// Heading of a torpedo to launch
    pub torpedo: Option<f32>,
    /// Planet to land on
    pub land: Option<String>,
    /// Destination solar system
    pub warp: Option<String>,
}

/// Capability handed to a controller for one tick
pub struct ShipLink<'a> {
    status: ShipStatus,
    map: MapData<'a>,
    settings: &'a Settings,
    commands: &'a mut ShipCommands,
}

impl<'a> ShipLink<'a> {
    pub fn new(
        status: ShipStatus,
        map: MapData<'a>,
        settings: &'a Settings,
        commands: &'a mut ShipCommands,
    ) -> Self {
        Self {
            status,
            map,
            settings,
            commands,
        }
    }

    pub fn status(&self) -> &ShipStatus {
        &self.status
    }

    pub fn status_value(&self, key: StatusKey) -> f32 {
        self.status.get(key)
    }

    pub fn map_data(&self) -> &MapData<'a> {
        &self.map
    }

    fn ensure_operational(&self) -> Result<(), CommandError> {
        if self.status.disabled {
            return Err(CommandError::ShipDisabled);
        }
        Ok(())
    }

    /// Set a thruster's power in `[0, max_thruster_power]`
    pub fn set_thruster(&mut self, name: ThrusterName, power: f32) -> Result<(), CommandError> {
        self.ensure_operational()?;
        let max = self.settings.max_thruster_power;
        if !power.is_finite() || !(0.0..=max).contains(&power) {
            return Err(CommandError::PowerOutOfRange { power, max });
        }
        self.commands.thrusters.push((name, power));
        Ok(())
    }

    /// [`set_thruster`](Self::set_thruster) by name (`"main"`, `"bow"`,
    /// `"clockwise"`, `"counterClockwise"`)
    pub fn set_thruster_named(&mut self, name: &str, power: f32) -> Result<(), CommandError> {
        let thruster = name.parse::<ThrusterName>()?;
        self.set_thruster(thruster, power)
    }

    /// Launch a torpedo along `heading` (radians)
    pub fn fire_torpedo(&mut self, heading: f32) -> Result<(), CommandError> {
        self.ensure_operational()?;
        if self.status.landed {
            return Err(CommandError::Landed);
        }
        if self.status.torpedo_cooldown > 0 {
            return Err(CommandError::TorpedoCooldown {
                ticks_left: self.status.torpedo_cooldown,
            });
        }
        self.commands.torpedo = Some(normalize_angle(heading));
        Ok(())
    }

    /// Land on the planet the ship overlaps
    pub fn land(&mut self) -> Result<(), CommandError> {
        self.ensure_operational()?;
        if self.status.landed {
            return Err(CommandError::AlreadyLanded);
        }
        let planet = self
            .map
            .planets
            .iter()
            .find(|p| if_collide(&self.status, *p))
            .ok_or(CommandError::NoPlanetInRange)?;

        let speed = self.status.vel.length();
        let limit = self.settings.landing_speed_limit;
        if speed > limit {
            return Err(CommandError::TooFast { speed, limit });
        }
        self.commands.land = Some(planet.name.clone());
        Ok(())
    }

    /// Jump through the warp gate the ship overlaps
    pub fn warp(&mut self) -> Result<(), CommandError> {
        self.ensure_operational()?;
        if self.status.landed {
            return Err(CommandError::Landed);
        }
        let gate = self
            .map
            .warp_gates
            .iter()
            .find(|g| if_collide(&self.status, *g))
            .ok_or(CommandError::NoWarpGateInRange)?;
        self.commands.warp = Some(gate.destination.clone());
        Ok(())
    }
}

/// Pluggable ship controller, updated once per tick
pub trait ShipController: fmt::Debug {
    fn update(&mut self, link: &mut ShipLink<'_>);
}

/// Does nothing; the ship drifts
#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl ShipController for Idle {
    fn update(&mut self, _link: &mut ShipLink<'_>) {}
}

/// Turns toward a target point and burns once aligned
///
/// On arrival it lands if a planet is underneath, or takes the warp gate if
/// there is one.
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub target: Vec2,
    /// Heading error below which the main thruster fires
    pub tolerance: f32,
    /// Distance to the target at which the ship stops burning
    pub arrive_radius: f32,
    /// Speed above which the main thruster stays off
    pub cruise_speed: f32,
    /// Distance inside which the bow thruster brakes
    pub brake_radius: f32,
    /// Power used on the spin thrusters, capped at the thruster maximum
    pub spin_power: f32,
}

impl Autopilot {
    pub fn new(target: Vec2) -> Self {
        Self {
            target,
            tolerance: 0.05,
            arrive_radius: 2.0,
            cruise_speed: 8.0,
            brake_radius: 10.0,
            spin_power: 2.0,
        }
    }
}

/// Issue a thruster command, logging a refusal
fn burn(link: &mut ShipLink<'_>, name: ThrusterName, power: f32) {
    if let Err(e) = link.set_thruster(name, power) {
        log::debug!("Autopilot {} thruster refused: {}", name, e);
    }
}

impl ShipController for Autopilot {
    fn update(&mut self, link: &mut ShipLink<'_>) {
        let status = *link.status();
        if status.disabled {
            return;
        }

        let pos = Vec2::new(
            link.status_value(StatusKey::PositionX),
            link.status_value(StatusKey::PositionY),
        );
        let angle = link.status_value(StatusKey::Angle);

        let to_target = self.target - pos;
        if to_target.length() < self.arrive_radius {
            for name in ThrusterName::ALL {
                burn(link, name, 0.0);
            }
            if !status.landed {
                if let Err(e) = link.land().or_else(|_| link.warp()) {
                    log::debug!("Autopilot idle at target: {}", e);
                }
            }
            return;
        }

        let heading = to_target.y.atan2(to_target.x);
        let heading_diff = angle_diff(angle, heading);

        let max = link.settings.max_thruster_power;
        let spin = self.spin_power.min(max);
        let (cw, ccw) = if heading_diff.abs() < self.tolerance {
            (0.0, 0.0)
        } else if heading_diff < 0.0 {
            (spin, 0.0)
        } else {
            (0.0, spin)
        };
        burn(link, ThrusterName::Clockwise, cw);
        burn(link, ThrusterName::CounterClockwise, ccw);

        let aligned = heading_diff.abs() < self.tolerance;
        let speed = status.vel.length();
        let braking = to_target.length() < self.brake_radius
            && speed > link.settings.landing_speed_limit * 0.5;

        let (main, bow) = match (aligned, braking) {
            (true, true) => (0.0, max),
            (true, false) if speed < self.cruise_speed => (max, 0.0),
            _ => (0.0, 0.0),
        };
        burn(link, ThrusterName::Main, main);
        burn(link, ThrusterName::Bow, bow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Motion;

    fn status_at(pos: Vec2, vel: Vec2) -> ShipStatus {
        let ship = Ship::new(
            1,
            "Test",
            Motion::new(pos, vel, 1.0, 10.0),
            100.0,
            Box::new(Idle),
        );
        ShipStatus::of(&ship)
    }

    fn planets() -> Vec<Planet> {
        vec![Planet {
            name: "Terra".into(),
            pos: Vec2::new(10.0, 10.0),
            radius: 3.0,
        }]
    }

    fn gates() -> Vec<WarpGate> {
        vec![WarpGate {
            name: "Gate".into(),
            pos: Vec2::new(50.0, 50.0),
            radius: 2.0,
            destination: "Kepler".into(),
        }]
    }

    #[test]
    fn test_thruster_names() {
        assert_eq!("counterclockwise".parse::<ThrusterName>(), Ok(ThrusterName::CounterClockwise));
        assert_eq!("main".parse::<ThrusterName>(), Ok(ThrusterName::Main));
        assert_eq!(
            "warp".parse::<ThrusterName>(),
            Err(CommandError::UnknownThruster { name: "warp".into() })
        );
        for name in ThrusterName::ALL {
            assert_eq!(name.to_string().parse::<ThrusterName>(), Ok(name));
        }
    }

    #[test]
    fn test_set_thruster_by_name() {
        let settings = Settings::default();
        let map = MapData {
            solar_system: "Sol",
            planets: &[],
            warp_gates: &[],
        };
        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        assert!(link.set_thruster_named("counterClockwise", 10.0).is_ok());
        assert!(matches!(
            link.set_thruster_named("afterburner", 10.0),
            Err(CommandError::UnknownThruster { .. })
        ));
        assert!(link.set_thruster_named("bow", 500.0).is_err());
        assert_eq!(cmds.thrusters, vec![(ThrusterName::CounterClockwise, 10.0)]);
    }

    #[test]
    fn test_status_values() {
        let status = status_at(Vec2::new(3.0, 4.0), Vec2::new(-1.0, 2.0));
        assert_eq!(status.get(StatusKey::PositionX), 3.0);
        assert_eq!(status.get(StatusKey::PositionY), 4.0);
        assert_eq!(status.get(StatusKey::LinearVelocityX), -1.0);
        assert_eq!(status.get(StatusKey::LinearVelocityY), 2.0);
        assert_eq!(status.get(StatusKey::Radius), 1.0);
        assert_eq!(status.get(StatusKey::Health), 100.0);
        assert_eq!(status.get(StatusKey::Angle), 0.0);
        assert_eq!(status.get(StatusKey::AngularVelocity), 0.0);
    }

    #[test]
    fn test_autopilot_spin_capped_by_max_power() {
        let settings = Settings {
            max_thruster_power: 1.0,
            ..Settings::default()
        };
        let map = MapData {
            solar_system: "Sol",
            planets: &[],
            warp_gates: &[],
        };
        let mut pilot = Autopilot::new(Vec2::new(0.0, 50.0));
        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        pilot.update(&mut link);
        assert!(cmds.thrusters.contains(&(ThrusterName::CounterClockwise, 1.0)));
    }

    #[test]
    fn test_set_thruster_range() {
        let settings = Settings::default();
        let planets = planets();
        let gates = gates();
        let mut cmds = ShipCommands::default();
        let map = MapData {
            solar_system: "Sol",
            planets: &planets,
            warp_gates: &gates,
        };
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);

        assert!(link.set_thruster(ThrusterName::Main, 50.0).is_ok());
        assert!(matches!(
            link.set_thruster(ThrusterName::Main, 150.0),
            Err(CommandError::PowerOutOfRange { .. })
        ));
        assert!(link.set_thruster(ThrusterName::Bow, -1.0).is_err());
        assert!(link.set_thruster(ThrusterName::Bow, f32::NAN).is_err());
        assert_eq!(cmds.thrusters, vec![(ThrusterName::Main, 50.0)]);
    }

    #[test]
    fn test_land_requires_planet_and_low_speed() {
        let settings = Settings::default();
        let planets = planets();
        let gates = gates();
        let map = MapData {
            solar_system: "Sol",
            planets: &planets,
            warp_gates: &gates,
        };

        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        assert_eq!(link.land(), Err(CommandError::NoPlanetInRange));

        let mut cmds = ShipCommands::default();
        let fast = status_at(Vec2::new(11.0, 10.0), Vec2::new(10.0, 0.0));
        let mut link = ShipLink::new(fast, map, &settings, &mut cmds);
        assert!(matches!(link.land(), Err(CommandError::TooFast { .. })));

        let mut cmds = ShipCommands::default();
        let slow = status_at(Vec2::new(11.0, 10.0), Vec2::new(0.5, 0.0));
        let mut link = ShipLink::new(slow, map, &settings, &mut cmds);
        assert!(link.land().is_ok());
        assert_eq!(cmds.land.as_deref(), Some("Terra"));
    }

    #[test]
    fn test_warp_needs_gate() {
        let settings = Settings::default();
        let planets = planets();
        let gates = gates();
        let map = MapData {
            solar_system: "Sol",
            planets: &planets,
            warp_gates: &gates,
        };

        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        assert_eq!(link.warp(), Err(CommandError::NoWarpGateInRange));

        let mut cmds = ShipCommands::default();
        let mut link =
            ShipLink::new(status_at(Vec2::new(51.0, 50.0), Vec2::ZERO), map, &settings, &mut cmds);
        assert!(link.warp().is_ok());
        assert_eq!(cmds.warp.as_deref(), Some("Kepler"));
    }

    #[test]
    fn test_disabled_ship_refuses_commands() {
        let settings = Settings::default();
        let mut status = status_at(Vec2::ZERO, Vec2::ZERO);
        status.disabled = true;
        let mut cmds = ShipCommands::default();
        let map = MapData {
            solar_system: "Sol",
            planets: &[],
            warp_gates: &[],
        };
        let mut link = ShipLink::new(status, map, &settings, &mut cmds);
        assert_eq!(link.set_thruster(ThrusterName::Main, 1.0), Err(CommandError::ShipDisabled));
        assert_eq!(link.fire_torpedo(0.0), Err(CommandError::ShipDisabled));
    }

    #[test]
    fn test_autopilot_turns_then_burns() {
        let settings = Settings::default();
        let map = MapData {
            solar_system: "Sol",
            planets: &[],
            warp_gates: &[],
        };

        // Target straight above: needs a counter-clockwise turn first
        let mut pilot = Autopilot::new(Vec2::new(0.0, 50.0));
        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        pilot.update(&mut link);
        assert!(cmds.thrusters.contains(&(ThrusterName::CounterClockwise, 2.0)));
        assert!(cmds.thrusters.contains(&(ThrusterName::Main, 0.0)));

        // Target dead ahead: full burn
        let mut pilot = Autopilot::new(Vec2::new(50.0, 0.0));
        let mut cmds = ShipCommands::default();
        let mut link = ShipLink::new(status_at(Vec2::ZERO, Vec2::ZERO), map, &settings, &mut cmds);
        pilot.update(&mut link);
        assert!(cmds.thrusters.contains(&(ThrusterName::Main, settings.max_thruster_power)));

        // Closing fast near the target: brake with the bow thruster
        let mut pilot = Autopilot::new(Vec2::new(5.0, 0.0));
        let mut cmds = ShipCommands::default();
        let closing = status_at(Vec2::ZERO, Vec2::new(6.0, 0.0));
        let mut link = ShipLink::new(closing, map, &settings, &mut cmds);
        pilot.update(&mut link);
        assert!(cmds.thrusters.contains(&(ThrusterName::Bow, settings.max_thruster_power)));
        assert!(cmds.thrusters.contains(&(ThrusterName::Main, 0.0)));
    }

    #[test]
    fn test_autopilot_takes_gate_on_arrival() {
        let settings = Settings::default();
        let planets = planets();
        let gates = gates();
        let map = MapData {
            solar_system: "Sol",
            planets: &planets,
            warp_gates: &gates,
        };
        let mut pilot = Autopilot::new(Vec2::new(50.0, 50.0));
        let mut cmds = ShipCommands::default();
        let mut link =
            ShipLink::new(status_at(Vec2::new(50.5, 50.0), Vec2::ZERO), map, &settings, &mut cmds);
        pilot.update(&mut link);
        assert!(cmds.land.is_none());
        assert_eq!(cmds.warp.as_deref(), Some("Kepler"));
        assert!(cmds.thrusters.iter().all(|&(_, p)| p == 0.0));
    }
}
