//! Pair-type interaction rules
//!
//! | Pair | Effect |
//! |---|---|
//! | ship / asteroid, meteor | bounce, ship takes `coefficient * impact²` |
//! | ship / torpedo | nothing |
//! | torpedo / torpedo | nothing |
//! | torpedo / other removable | both detonate, once |
//! | other removable pairs | bounce only |
//!
//! Ships are never checked against each other.

use serde::Serialize;

use super::body::{ObjectId, ObjectKind, RemovableObject, Ship, ShipId};
use super::collision::{clank, cross_pairs, self_pairs};
use crate::settings::Settings;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RegionEvent {
    ShipDamaged {
        ship: ShipId,
        object: ObjectId,
        impact: f32,
        /// Health actually removed
        damage: f32,
    },
    ShipDisabled {
        ship: ShipId,
    },
    Detonation {
        a: ObjectId,
        b: ObjectId,
    },
    Bounce {
        a: ObjectId,
        b: ObjectId,
        impact: f32,
    },
}

/// Damage from a head-on impact
#[inline]
pub fn impact_damage(impact: f32, coefficient: f32) -> f32 {
    coefficient * impact * impact
}

/// Apply the rule for a ship touching a removable object
pub fn resolve_ship_contact(
    ship: &mut Ship,
    object: &mut RemovableObject,
    settings: &Settings,
    events: &mut Vec<RegionEvent>,
) {
    match object.kind {
        ObjectKind::Asteroid | ObjectKind::Meteor => {
            let impact = clank(&mut ship.motion, &mut object.motion, settings.collision_epsilon);
            // Debris is not hurt by the impact; a disabled hulk only bounces
            if ship.is_disabled() {
                return;
            }
            let health_before = ship.health;
            let disabled = ship.receive_damage(impact_damage(impact, settings.damage_coefficient));
            events.push(RegionEvent::ShipDamaged {
                ship: ship.id,
                object: object.id,
                impact,
                damage: health_before - ship.health,
            });
            if disabled {
                events.push(RegionEvent::ShipDisabled { ship: ship.id });
            }
        }
        ObjectKind::Torpedo(_) => {}
    }
}

/// Apply the rule for two removable objects touching
pub fn resolve_object_pair(
    a: &mut RemovableObject,
    b: &mut RemovableObject,
    settings: &Settings,
    events: &mut Vec<RegionEvent>,
) {
    match (a.is_torpedo(), b.is_torpedo()) {
        (true, true) => {}
        (true, false) | (false, true) => {
            if a.has_exploded() || b.has_exploded() {
                return;
            }
            a.receive_detonation(settings.explosion_ticks);
            b.receive_detonation(settings.explosion_ticks);
            log::debug!("Detonation: {} <-> {}", a.id, b.id);
            events.push(RegionEvent::Detonation { a: a.id, b: b.id });
        }
        (false, false) => {
            let impact = clank(&mut a.motion, &mut b.motion, settings.collision_epsilon);
            events.push(RegionEvent::Bounce {
                a: a.id,
                b: b.id,
                impact,
            });
        }
    }
}

/// Two distinct mutable elements of a slice (`i < j`)
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Run both collision scans for one region
///
/// Ships against removable objects first, then removable objects against
/// each other. Velocities changed by the first scan are what the second
/// scan sees.
pub fn detect_collisions(
    ships: &mut [Ship],
    objects: &mut [RemovableObject],
    settings: &Settings,
    events: &mut Vec<RegionEvent>,
) {
    for (s, o) in cross_pairs(ships, objects) {
        resolve_ship_contact(&mut ships[s], &mut objects[o], settings, events);
    }

    for (i, j) in self_pairs(objects) {
        let (a, b) = pair_mut(objects, i, j);
        resolve_object_pair(a, b, settings, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Motion;
    use crate::sim::control::Idle;
    use glam::Vec2;

    fn ship_at(pos: Vec2, vel: Vec2, mass: f32, health: f32) -> Ship {
        Ship::new(1, "Normandy", Motion::new(pos, vel, 1.0, mass), health, Box::new(Idle))
    }

    fn torpedo(id: ObjectId, pos: Vec2) -> RemovableObject {
        RemovableObject::torpedo(id, Motion::new(pos, Vec2::X, 0.5, 1.0), 100, None)
    }

    #[test]
    fn test_ship_vs_asteroid_damage() {
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::ZERO, Vec2::new(5.0, 0.0), 10.0, 10_000.0)];
        let mut objects = vec![RemovableObject::asteroid(
            7,
            Motion::new(Vec2::new(1.5, 0.0), Vec2::ZERO, 1.0, 1000.0),
        )];
        let mut events = Vec::new();

        detect_collisions(&mut ships, &mut objects, &settings, &mut events);

        // norm = (-1, 0): ship normal speed -5, asteroid 0
        let impact = -5.0f32;
        let expected = 20.0 * impact * impact;
        assert!((ships[0].health - (10_000.0 - expected)).abs() < 1e-2);
        match &events[0] {
            RegionEvent::ShipDamaged {
                impact: i,
                damage,
                object,
                ..
            } => {
                assert_eq!(*object, 7);
                assert!((i - impact).abs() < 1e-4);
                assert!((damage - expected).abs() < 1e-2);
            }
            other => panic!("unexpected event {:?}", other),
        }

        // Ship bounces back, heavy asteroid barely moves
        let ship_vx = (10.0 - 1000.0) / 1010.0 * 5.0;
        assert!((ships[0].motion.vel.x - ship_vx).abs() < 1e-3);
        let rock_vx = 2.0 * 10.0 / 1010.0 * 5.0;
        assert!((objects[0].motion.vel.x - rock_vx).abs() < 1e-3);
        assert!(!objects[0].destroyed);
    }

    #[test]
    fn test_ship_disabled_event() {
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::ZERO, Vec2::new(5.0, 0.0), 10.0, 100.0)];
        let mut objects = vec![RemovableObject::meteor(
            3,
            Motion::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.5, 5.0),
        )];
        let mut events = Vec::new();
        detect_collisions(&mut ships, &mut objects, &settings, &mut events);
        assert_eq!(ships[0].health, 0.0);
        assert!(events.contains(&RegionEvent::ShipDisabled { ship: 1 }));
    }

    #[test]
    fn test_disabled_ship_bounces_without_damage_event() {
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::ZERO, Vec2::new(5.0, 0.0), 10.0, 100.0)];
        ships[0].receive_damage(100.0);
        let mut objects = vec![RemovableObject::meteor(
            3,
            Motion::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.5, 10.0),
        )];
        let mut events = Vec::new();
        detect_collisions(&mut ships, &mut objects, &settings, &mut events);

        assert!(events.is_empty());
        assert_eq!(ships[0].health, 0.0);
        // Equal masses head on: the hulk stops, the meteor carries on
        assert!(ships[0].motion.vel.x.abs() < 1e-4);
        assert!((objects[0].motion.vel.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_disabling_hit_reports_damage_applied() {
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::ZERO, Vec2::new(5.0, 0.0), 10.0, 100.0)];
        let mut objects = vec![RemovableObject::meteor(
            3,
            Motion::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.5, 5.0),
        )];
        let mut events = Vec::new();
        detect_collisions(&mut ships, &mut objects, &settings, &mut events);
        // 500 computed, only the remaining 100 health taken
        assert!(matches!(
            events[0],
            RegionEvent::ShipDamaged { damage, .. } if (damage - 100.0).abs() < 1e-4
        ));
    }

    #[test]
    fn test_ship_ignores_torpedo() {
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::ZERO, Vec2::new(5.0, 0.0), 10.0, 100.0)];
        let mut objects = vec![torpedo(4, Vec2::new(0.5, 0.0))];
        let mut events = Vec::new();
        detect_collisions(&mut ships, &mut objects, &settings, &mut events);
        assert!(events.is_empty());
        assert_eq!(ships[0].health, 100.0);
        assert_eq!(ships[0].motion.vel, Vec2::new(5.0, 0.0));
        assert!(!objects[0].has_exploded());
    }

    #[test]
    fn test_torpedo_pair_ignored() {
        let settings = Settings::default();
        let mut objects = vec![torpedo(1, Vec2::ZERO), torpedo(2, Vec2::new(0.2, 0.0))];
        let before = objects.clone();
        let mut events = Vec::new();
        detect_collisions(&mut [], &mut objects, &settings, &mut events);
        assert!(events.is_empty());
        assert_eq!(objects, before);
    }

    #[test]
    fn test_mutual_detonation_once() {
        let settings = Settings::default();
        let mut objects = vec![
            torpedo(1, Vec2::ZERO),
            RemovableObject::meteor(2, Motion::new(Vec2::new(0.5, 0.0), Vec2::ZERO, 0.5, 5.0)),
        ];
        let mut events = Vec::new();

        detect_collisions(&mut [], &mut objects, &settings, &mut events);
        assert_eq!(events, vec![RegionEvent::Detonation { a: 1, b: 2 }]);
        assert!(objects[0].has_exploded());
        assert!(objects[1].destroyed);

        // Same tick, state not cleared: nothing fires again
        detect_collisions(&mut [], &mut objects, &settings, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_debris_pair_bounces() {
        let settings = Settings::default();
        let mut objects = vec![
            RemovableObject::asteroid(1, Motion::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, 10.0)),
            RemovableObject::meteor(2, Motion::new(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 0.5, 10.0)),
        ];
        let mut events = Vec::new();
        detect_collisions(&mut [], &mut objects, &settings, &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RegionEvent::Bounce { a: 1, b: 2, .. }));
        assert!((objects[0].motion.vel.x + 1.0).abs() < 1e-4);
        assert!((objects[1].motion.vel.x - 1.0).abs() < 1e-4);
        assert!(!objects[0].destroyed && !objects[1].destroyed);
    }

    #[test]
    fn test_ship_scan_runs_before_debris_scan() {
        // The meteor is struck by the ship first, then by the asteroid using
        // the velocity the ship scan left it with.
        let settings = Settings::default();
        let mut ships = vec![ship_at(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 0.0), 10.0, 10_000.0)];
        let mut objects = vec![
            RemovableObject::meteor(1, Motion::new(Vec2::ZERO, Vec2::ZERO, 0.5, 10.0)),
            RemovableObject::asteroid(2, Motion::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.6, 10.0)),
        ];
        let mut events = Vec::new();
        detect_collisions(&mut ships, &mut objects, &settings, &mut events);

        assert!(matches!(events[0], RegionEvent::ShipDamaged { object: 1, .. }));
        assert!(matches!(events[1], RegionEvent::Bounce { a: 1, b: 2, .. }));
        // Equal masses: ship stops, meteor takes its speed, then hands it on
        assert!(ships[0].motion.vel.x.abs() < 1e-4);
        assert!(objects[0].motion.vel.x.abs() < 1e-4);
        assert!((objects[1].motion.vel.x - 2.0).abs() < 1e-4);
    }
}
