//! Static level layout: walls, the locked door, pickups, NPCs and floor.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collision::{ColliderId, CollisionWorld};
use crate::error::{DuneError, DuneResult};
use crate::grid::{GridCoord, TileLattice};
use crate::math::{Rect, Vec2};

/// Collision box placed relative to a sprite's top-left position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderTemplate {
    pub offset: Vec2,
    pub width: f32,
    pub height: f32,
}

impl ColliderTemplate {
    pub fn place(&self, sprite_pos: Vec2) -> Rect {
        Rect::from_top_left(sprite_pos + self.offset, self.width, self.height)
    }
}

/// What an NPC says when the player talks to it nearby.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcSpec {
    pub name: String,
    pub position: Vec2,
    pub line: String,
    /// Replaces `line` once the player carries the key.
    #[serde(default)]
    pub line_with_key: Option<String>,
}

impl NpcSpec {
    pub fn line_for(&self, has_key: bool) -> &str {
        match (&self.line_with_key, has_key) {
            (Some(line), true) => line,
            _ => &self.line,
        }
    }
}

/// Randomised floor: `variants` textures, the last one a rare decoration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorSpec {
    pub tile_size: f32,
    pub variants: Vec<String>,
    /// Chance in [0, 1] that the last common variant becomes the decoration.
    pub decoration_chance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloorTile {
    pub position: Vec2,
    pub variant: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub world_size: Vec2,
    pub player_start: Vec2,
    /// Lattice the wall cells are laid on.
    pub wall_lattice: TileLattice,
    pub walls: Vec<GridCoord>,
    pub wall_collider: ColliderTemplate,
    pub door_position: Vec2,
    pub door_collider: ColliderTemplate,
    pub key_position: Vec2,
    pub npcs: Vec<NpcSpec>,
    pub floor: FloorSpec,
}

/// Collision world built from a layout, with the door collider singled out.
#[derive(Clone, Debug)]
pub struct BuiltCollision {
    pub world: CollisionWorld,
    pub walls: Vec<ColliderId>,
    pub door: ColliderId,
}

const FORT_CENTER: f32 = 1024.0;
const WALL_SPACING: f32 = 44.0;

impl LevelLayout {
    /// The desert fort: a walled yard north of the spawn, locked door in the
    /// south wall, key out to the east.
    pub fn desert_fort() -> Self {
        let mut walls = Vec::new();
        // South wall, with a gap at x = -1 for the door.
        walls.extend([0, 1, 2, 3, -2, -3, -4, -5].map(|x| GridCoord::new(x, -5)));
        // West and east walls.
        walls.extend((6..=10).map(|y| GridCoord::new(-5, -y)));
        walls.extend((6..=10).map(|y| GridCoord::new(3, -y)));
        // North wall.
        walls.extend([0, 1, 2, 3, -1, -2, -3, -4, -5].map(|x| GridCoord::new(x, -10)));

        let c = FORT_CENTER;
        Self {
            world_size: Vec2::new(2000.0, 2000.0),
            player_start: Vec2::new(1000.0, 1000.0),
            wall_lattice: TileLattice::new(Vec2::new(c, c), WALL_SPACING),
            walls,
            wall_collider: ColliderTemplate {
                offset: Vec2::new(6.0, 3.0),
                width: 48.0,
                height: 48.0,
            },
            door_position: Vec2::new(c - WALL_SPACING, c - WALL_SPACING * 5.0),
            door_collider: ColliderTemplate {
                offset: Vec2::new(6.0, 3.0),
                width: 34.0,
                height: 48.0,
            },
            key_position: Vec2::new(c + 48.0 * 12.0, c),
            npcs: vec![
                NpcSpec {
                    name: "outside".into(),
                    position: Vec2::new(c + 48.0 * 3.0, c - 48.0 * 2.0),
                    line: "There's a key to the east of here.".into(),
                    line_with_key: Some("Great, my friend will tell you how to escape.".into()),
                },
                NpcSpec {
                    name: "inside".into(),
                    position: Vec2::new(c - 48.0, c - 48.0 * 6.0),
                    line: "There is an exit to the west.".into(),
                    line_with_key: None,
                },
            ],
            floor: FloorSpec {
                tile_size: 64.0,
                variants: vec![
                    "desert-tile-1.png".into(),
                    "desert-tile-2.png".into(),
                    "desert-tile-3.png".into(),
                    "desert-tile-4.png".into(),
                ],
                decoration_chance: 0.2,
            },
        }
    }

    pub fn from_json(json: &str) -> DuneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> DuneResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DuneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Top-left sprite positions of every wall tile.
    pub fn wall_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.walls.iter().map(|&coord| self.wall_lattice.to_world(coord))
    }

    /// Build the collision world. Walls come first, then the door.
    pub fn build_collision(&self) -> DuneResult<BuiltCollision> {
        let mut world = CollisionWorld::new();
        let walls = self
            .wall_positions()
            .map(|pos| world.add(self.wall_collider.place(pos)))
            .collect::<DuneResult<Vec<_>>>()?;
        let door = world.add(self.door_collider.place(self.door_position))?;
        log::debug!("built collision world with {} colliders", world.len());
        Ok(BuiltCollision { world, walls, door })
    }

    /// Scatter floor tiles over the world. Same seed, same floor.
    pub fn floor_tiles(&self, seed: u64) -> Vec<FloorTile> {
        let spec = &self.floor;
        if spec.variants.is_empty() || spec.tile_size <= 0.0 {
            log::warn!("floor spec has no usable tiles, skipping floor");
            return Vec::new();
        }

        let mut rng = fastrand::Rng::with_seed(seed);
        let common = spec.variants.len().saturating_sub(1).max(1);
        let decoration = spec.variants.len() - 1;
        let lattice = TileLattice::new(Vec2::ZERO, spec.tile_size);

        lattice
            .cells_covering(self.world_size)
            .map(|coord| {
                let mut variant = rng.usize(..common);
                if variant + 1 == common && decoration >= common && rng.f32() < spec.decoration_chance {
                    variant = decoration;
                }
                FloorTile {
                    position: lattice.to_world(coord),
                    variant,
                }
            })
            .collect()
    }
}
