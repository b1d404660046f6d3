//! Per-region simulation
//!
//! Everything that happens inside one solar system during a tick lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Bodies mutated in place; removal deferred to the end of the tick
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod control;
pub mod region;
pub mod rules;
pub mod tick;

pub use body::{Circle, Motion, ObjectId, ObjectKind, Planet, RemovableObject, Ship, ShipId, Torpedo, WarpGate};
pub use collision::{clank, cross_pairs, if_collide, self_pairs};
pub use control::{
    Autopilot, Idle, MapData, ShipCommands, ShipController, ShipLink, ShipStatus, StatusKey,
    ThrusterName, Thrusters,
};
pub use region::{MeteorShower, Region};
pub use rules::{RegionEvent, detect_collisions, impact_damage};
pub use tick::tick;
