//! Error types for game setup and ship commands
//!
//! `SimError` is fatal: it aborts startup or halts the tick loop.
//! `CommandError` is handed back to a ship controller and never stops the
//! simulation.

use std::fmt;

/// Fatal simulation errors
#[derive(Debug)]
pub enum SimError {
    /// Requested watch ship was not among the constructed ships
    WatchShipNotFound { name: String },
    /// `update` called before a watch ship was established
    WatchShipNotSet,
    /// `draw` called before a drawn region was established
    NoDrawnRegion,
    /// A layout referenced a solar system that does not exist
    UnknownSolarSystem { name: String },
    /// A ship blueprint named a controller we don't know how to build
    UnknownController { kind: String },
    /// Content layout failed validation
    InvalidLayout(String),
    /// Settings value outside its usable range
    InvalidSettings(String),
    /// JSON (de)serialization failed
    Json(serde_json::Error),
    /// Reading a settings or galaxy file failed
    Io(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::WatchShipNotFound { name } => write!(f, "watch ship '{}' not found", name),
            SimError::WatchShipNotSet => write!(f, "watch ship not defined"),
            SimError::NoDrawnRegion => write!(f, "drawn region not defined"),
            SimError::UnknownSolarSystem { name } => {
                write!(f, "unknown solar system '{}'", name)
            }
            SimError::UnknownController { kind } => {
                write!(f, "unknown controller kind '{}'", kind)
            }
            SimError::InvalidLayout(msg) => write!(f, "invalid galaxy layout: {}", msg),
            SimError::InvalidSettings(msg) => write!(f, "invalid settings: {}", msg),
            SimError::Json(e) => write!(f, "json error: {}", e),
            SimError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Json(e) => Some(e),
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

/// Errors returned to a ship controller from a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Thruster name that is not one of the ship's thrusters
    UnknownThruster { name: String },
    /// Thruster power outside `[0, max]` or not finite
    PowerOutOfRange { power: f32, max: f32 },
    /// Ship has no health left and ignores commands
    ShipDisabled,
    /// `land` with no planet overlapping the ship
    NoPlanetInRange,
    /// `land` while moving faster than the landing limit
    TooFast { speed: f32, limit: f32 },
    /// `land` while already on a planet
    AlreadyLanded,
    /// `warp` with no gate overlapping the ship
    NoWarpGateInRange,
    /// `warp` or `fire_torpedo` while sitting on a planet
    Landed,
    /// `fire_torpedo` before the tubes have reloaded
    TorpedoCooldown { ticks_left: u32 },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownThruster { name } => write!(f, "unknown thruster '{}'", name),
            CommandError::PowerOutOfRange { power, max } => {
                write!(f, "thruster power {} outside [0, {}]", power, max)
            }
            CommandError::ShipDisabled => write!(f, "ship is disabled"),
            CommandError::NoPlanetInRange => write!(f, "no planet in range"),
            CommandError::TooFast { speed, limit } => {
                write!(f, "too fast to land: {:.2} > {:.2}", speed, limit)
            }
            CommandError::AlreadyLanded => write!(f, "already landed"),
            CommandError::NoWarpGateInRange => write!(f, "no warp gate in range"),
            CommandError::Landed => write!(f, "ship is landed"),
            CommandError::TorpedoCooldown { ticks_left } => {
                write!(f, "torpedo tubes reloading ({} ticks)", ticks_left)
            }
        }
    }
}

impl std::error::Error for CommandError {}
