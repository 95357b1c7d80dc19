//! Sprite-sheet atlas description and frame stepping for the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Pixel rectangle of one frame inside a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Named frames and clips cut from a single sheet image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteAtlas {
    pub image: String,
    pub frames: BTreeMap<String, FrameRect>,
    pub clips: BTreeMap<String, Vec<String>>,
}

impl SpriteAtlas {
    /// A horizontal strip of equally sized frames, split into consecutive clips.
    pub fn from_strip(image: impl Into<String>, frame_size: u32, clips: &[(&str, usize)]) -> Self {
        let mut frames = BTreeMap::new();
        let mut clip_map = BTreeMap::new();
        let mut cursor = 0u32;
        for &(clip, count) in clips {
            let mut names = Vec::with_capacity(count);
            for i in 1..=count {
                let name = format!("{clip}{i}");
                frames.insert(
                    name.clone(),
                    FrameRect {
                        x: cursor * frame_size,
                        y: 0,
                        w: frame_size,
                        h: frame_size,
                    },
                );
                names.push(name);
                cursor += 1;
            }
            clip_map.insert(clip.to_string(), names);
        }
        Self {
            image: image.into(),
            frames,
            clips: clip_map,
        }
    }

    /// The fish player sheet: 24px frames, four idle then five run.
    pub fn fish_sheet() -> Self {
        Self::from_strip("fish-sheet.png", 24, &[("idle", 4), ("run", 5)])
    }

    pub fn clip(&self, name: &str) -> Option<&[String]> {
        self.clips.get(name).map(Vec::as_slice)
    }

    pub fn frame(&self, name: &str) -> Option<FrameRect> {
        self.frames.get(name).copied()
    }
}

/// Steps through a clip at a fixed rate per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationPlayer {
    frames: Vec<String>,
    position: f32,
    pub speed: f32,
    pub looping: bool,
    pub playing: bool,
}

impl AnimationPlayer {
    pub fn new(frames: Vec<String>, speed: f32) -> Self {
        Self {
            frames,
            position: 0.0,
            speed,
            looping: true,
            playing: true,
        }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        if !self.playing || self.frames.is_empty() {
            return;
        }

        self.position += self.speed;
        let len = self.frames.len() as f32;
        if self.position >= len {
            if self.looping {
                self.position %= len;
            } else {
                self.position = len - 1.0;
                self.playing = false;
            }
        }
    }

    pub fn current_frame(&self) -> Option<&str> {
        self.frames
            .get(self.position.floor() as usize)
            .map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clip {
    Idle,
    Run,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Horizontal scale sign for a renderer.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Picks the player's clip and facing from the intent vector.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerAnimation {
    pub clip: Clip,
    pub facing: Facing,
    idle: AnimationPlayer,
    run: AnimationPlayer,
}

impl PlayerAnimation {
    pub fn new(atlas: &SpriteAtlas, speed: f32) -> Self {
        let clip = |name: &str| atlas.clip(name).map(<[String]>::to_vec).unwrap_or_default();
        Self {
            clip: Clip::Idle,
            facing: Facing::Right,
            idle: AnimationPlayer::new(clip("idle"), speed),
            run: AnimationPlayer::new(clip("run"), speed),
        }
    }

    pub fn update(&mut self, intent: Vec2) {
        self.clip = if intent.is_zero() { Clip::Idle } else { Clip::Run };
        // Any vertical movement faces right unless also moving left.
        if intent.x < 0.0 {
            self.facing = Facing::Left;
        } else if intent.x > 0.0 || intent.y != 0.0 {
            self.facing = Facing::Right;
        }

        // Both clips keep cycling so switching does not restart either.
        self.idle.advance();
        self.run.advance();
    }

    pub fn current_frame(&self) -> Option<&str> {
        match self.clip {
            Clip::Idle => self.idle.current_frame(),
            Clip::Run => self.run.current_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fish_sheet_matches_strip_layout() {
        let atlas = SpriteAtlas::fish_sheet();
        assert_eq!(atlas.frames.len(), 9);
        assert_eq!(atlas.clip("idle").map(<[String]>::len), Some(4));
        assert_eq!(atlas.clip("run").map(<[String]>::len), Some(5));
        assert_eq!(atlas.frame("run1"), Some(FrameRect { x: 96, y: 0, w: 24, h: 24 }));
        assert_eq!(atlas.frame("run5"), Some(FrameRect { x: 192, y: 0, w: 24, h: 24 }));
    }

    #[test]
    fn atlas_parses_from_json() {
        let json = r#"{
            "image": "fish-sheet.png",
            "frames": { "a": { "x": 0, "y": 0, "w": 24, "h": 24 } },
            "clips": { "idle": ["a"] }
        }"#;
        let atlas: SpriteAtlas = serde_json::from_str(json).expect("atlas json");
        assert_eq!(atlas.clip("idle"), Some(&["a".to_string()][..]));
    }

    #[test]
    fn player_advances_fractionally_and_loops() {
        let mut player = AnimationPlayer::new(vec!["a".into(), "b".into()], 0.5);
        assert_eq!(player.current_frame(), Some("a"));
        player.advance();
        assert_eq!(player.current_frame(), Some("a"));
        player.advance();
        assert_eq!(player.current_frame(), Some("b"));
        player.advance();
        player.advance();
        assert_eq!(player.current_frame(), Some("a"));
    }

    #[test]
    fn non_looping_player_stops_on_last_frame() {
        let mut player = AnimationPlayer::new(vec!["a".into(), "b".into()], 1.0);
        player.looping = false;
        for _ in 0..5 {
            player.advance();
        }
        assert_eq!(player.current_frame(), Some("b"));
        assert!(!player.playing);
    }

    #[test]
    fn intent_selects_clip_and_facing() {
        let mut anim = PlayerAnimation::new(&SpriteAtlas::fish_sheet(), 0.2);
        anim.update(Vec2::new(-1.0, 0.0));
        assert_eq!((anim.clip, anim.facing), (Clip::Run, Facing::Left));
        assert!(anim.current_frame().is_some_and(|f| f.starts_with("run")));

        anim.update(Vec2::new(-1.0, -1.0));
        assert_eq!(anim.facing, Facing::Left);

        anim.update(Vec2::new(0.0, 1.0));
        assert_eq!((anim.clip, anim.facing), (Clip::Run, Facing::Right));

        // Standing still keeps the last facing.
        anim.update(Vec2::new(-1.0, 0.0));
        anim.update(Vec2::ZERO);
        assert_eq!((anim.clip, anim.facing), (Clip::Idle, Facing::Left));
        assert!(anim.current_frame().is_some_and(|f| f.starts_with("idle")));
    }
}
