//! The standard per-tick systems, in the order [`FrameClock::standard`] runs them.
//!
//! [`FrameClock::standard`]: crate::clock::FrameClock::standard

use crate::clock::System;
use crate::input::{InputDevice, Key};
use crate::session::Session;
use crate::triggers;

/// Reads held keys into the player's intent.
pub struct SampleInput;

impl System for SampleInput {
    fn name(&self) -> &str {
        "sample_input"
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        session.sample_input(input);
    }
}

/// Zoom in/out on key press, keeping the player centred.
pub struct ApplyZoom;

impl System for ApplyZoom {
    fn name(&self) -> &str {
        "apply_zoom"
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        session.apply_zoom(input);
    }
}

/// Moves the player unless a wall is within lookahead.
pub struct ResolveMovement;

impl System for ResolveMovement {
    fn name(&self) -> &str {
        "resolve_movement"
    }

    fn run(&mut self, session: &mut Session, _input: &dyn InputDevice) {
        session.resolve_movement();
    }
}

pub struct AnimatePlayer;

impl System for AnimatePlayer {
    fn name(&self) -> &str {
        "animate_player"
    }

    fn run(&mut self, session: &mut Session, _input: &dyn InputDevice) {
        session.animate_player();
    }
}

/// Door unlock, key pickup and NPC dialogue.
pub struct ProximityTriggers;

impl System for ProximityTriggers {
    fn name(&self) -> &str {
        "proximity_triggers"
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        // Door before key: picking up the key unlocks on the following tick.
        triggers::check_door(session);
        triggers::update_dialogue(session, input.is_down(Key::Talk));
        triggers::check_key_pickup(session);
    }
}

/// Leans the camera toward the pointer.
pub struct FollowPointer;

impl System for FollowPointer {
    fn name(&self) -> &str {
        "follow_pointer"
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        session.update_camera(input);
    }
}

/// Moves the cursor and checks what it hovers, using this tick's camera.
pub struct CursorHover;

impl System for CursorHover {
    fn name(&self) -> &str {
        "cursor_hover"
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        session.update_cursor(input);
    }
}
