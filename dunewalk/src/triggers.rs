//! Proximity-triggered world events: key pickup, door unlock, NPC dialogue.
//!
//! Distances are Manhattan (|dx| + |dy|) in world units. Each trigger only
//! changes state the first time its condition holds, so running them every
//! tick is safe.

use crate::math::Vec2;
use crate::session::{Session, WorldEvent};

/// Pick up the key when the player walks close enough.
pub fn check_key_pickup(session: &mut Session) {
    if session.key.collected {
        return;
    }
    let distance = session.player.position.manhattan_distance(session.key.position);
    if distance >= session.config.pickup_radius {
        return;
    }

    session.key.collected = true;
    session.player.has_key = true;
    session.scene.set_alpha(session.key.node, 0.0);
    log::info!("key picked up at tick {}", session.tick());
    session.emit(WorldEvent::KeyPickedUp);
}

/// Open the locked door once the player carries the key and comes near.
///
/// The door's collider is moved to the world origin, out of play, and its
/// sprite hidden.
pub fn check_door(session: &mut Session) {
    if session.door.unlocked || !session.player.has_key {
        return;
    }
    let distance = session.player.position.manhattan_distance(session.door.position);
    if distance >= session.config.door_radius {
        return;
    }

    session.door.unlocked = true;
    session.collision.relocate(session.door.collider, Vec2::ZERO);
    session.scene.set_alpha(session.door.node, 0.0);
    log::info!("door unlocked at tick {}", session.tick());
    session.emit(WorldEvent::DoorUnlocked);
}

/// Show each NPC's line while the player holds the talk key nearby.
pub fn update_dialogue(session: &mut Session, talking: bool) {
    let has_key = session.player.has_key;
    let radius = session.config.talk_radius;
    let position = session.player.position;

    let mut started = Vec::new();
    for npc in &session.npcs {
        let in_range = position.manhattan_distance(npc.spec.position) < radius;
        let line = if talking && in_range {
            npc.spec.line_for(has_key)
        } else {
            ""
        };

        let was_empty = session.scene.text(npc.text_node).map_or(true, str::is_empty);
        session.scene.set_text(npc.text_node, line);
        if was_empty && !line.is_empty() {
            started.push(npc.spec.name.clone());
        }
    }

    for npc in started {
        log::debug!("npc `{npc}` starts talking");
        session.emit(WorldEvent::DialogueStarted { npc });
    }
}
