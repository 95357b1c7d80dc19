//! All state owned by one running game, and the per-tick steps that mutate it.

use crate::animation::{PlayerAnimation, SpriteAtlas};
use crate::assets::AssetCatalog;
use crate::camera::CameraModel;
use crate::collision::{ColliderId, CollisionWorld};
use crate::config::GameConfig;
use crate::error::{DuneError, DuneResult};
use crate::input::{InputDevice, Key};
use crate::level::{FloorTile, LevelLayout, NpcSpec};
use crate::math::{Rect, Vec2};
use crate::movement::{apply_displacement, MoveOutcome, MovementResolver};
use crate::scene::{Node, NodeId, SceneGraph, Space};

/// Side length of the player's collision box in world units.
pub const PLAYER_BOX_SIZE: f32 = 16.0;

/// Cursor hover box before a cursor texture is known, in screen pixels.
const DEFAULT_CURSOR_SIZE: f32 = 16.0;

/// Something that happened during a tick, for hosts and tests to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    ZoomChanged { zoom: f32 },
    MovementBlocked { collider: ColliderId },
    KeyPickedUp,
    DoorUnlocked,
    DialogueStarted { npc: String },
}

#[derive(Clone, Debug)]
pub struct PlayerState {
    /// World-space position; also the centre of `bounds`.
    pub position: Vec2,
    /// This tick's intent. Reset by input sampling every tick.
    pub intent: Vec2,
    pub bounds: Rect,
    /// Set once on pickup, never cleared.
    pub has_key: bool,
    pub animation: PlayerAnimation,
    pub last_move: MoveOutcome,
    pub node: NodeId,
}

impl PlayerState {
    /// Re-centre the collision box on the current position.
    pub fn sync_bounds(&mut self) {
        self.bounds = self.bounds.with_center(self.position);
    }
}

#[derive(Clone, Debug)]
pub struct Door {
    pub position: Vec2,
    pub collider: ColliderId,
    pub node: NodeId,
    pub unlocked: bool,
}

#[derive(Clone, Debug)]
pub struct KeyPickup {
    pub position: Vec2,
    pub node: NodeId,
    pub collected: bool,
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub spec: NpcSpec,
    pub node: NodeId,
    pub text_node: NodeId,
}

#[derive(Clone, Debug)]
pub struct Cursor {
    pub node: NodeId,
    /// Hover box size in screen pixels.
    pub size: Vec2,
    pub hovered: Option<ColliderId>,
}

pub struct Session {
    pub config: GameConfig,
    pub collision: CollisionWorld,
    pub player: PlayerState,
    pub camera: CameraModel,
    /// Screen position of the world origin, before the camera offset.
    pub world_offset: Vec2,
    pub scene: SceneGraph,
    pub door: Door,
    pub key: KeyPickup,
    pub npcs: Vec<Npc>,
    pub cursor: Cursor,
    pub floor: Vec<FloorTile>,
    pub resolver: MovementResolver,
    /// Current drawable size in pixels; starts at the configured screen size.
    screen_size: Vec2,
    events: Vec<WorldEvent>,
    tick: u64,
}

impl Session {
    /// Build a session from a layout and its already loaded images.
    ///
    /// Fails if the layout has degenerate colliders or if any texture the
    /// scene or floor needs is missing from `assets`.
    pub fn new(config: GameConfig, layout: &LevelLayout, assets: &AssetCatalog) -> DuneResult<Self> {
        let built = layout.build_collision()?;
        let mut scene = SceneGraph::new();

        for pos in layout.wall_positions() {
            scene.add(Node::new("wall", Space::World, pos).with_texture("desert-block.png"));
        }

        let door = Door {
            position: layout.door_position,
            collider: built.door,
            node: scene.add(
                Node::new("locked_door", Space::World, layout.door_position)
                    .with_texture("locked-desert-block.png"),
            ),
            unlocked: false,
        };

        let key = KeyPickup {
            position: layout.key_position,
            node: scene.add(
                Node::new("key", Space::World, layout.key_position)
                    .with_texture("key.png")
                    .with_scale(Vec2::new(2.0, 2.0)),
            ),
            collected: false,
        };

        let npcs = layout
            .npcs
            .iter()
            .map(|spec| Npc {
                node: scene.add(
                    Node::new(format!("npc_{}", spec.name), Space::World, spec.position)
                        .with_texture("bandit.png")
                        .with_scale(Vec2::new(2.0, 2.0)),
                ),
                text_node: scene.add(
                    Node::new(
                        format!("npc_{}_text", spec.name),
                        Space::World,
                        spec.position - Vec2::new(132.0, 48.0),
                    )
                    .with_text(""),
                ),
                spec: spec.clone(),
            })
            .collect();

        let atlas = SpriteAtlas::fish_sheet();
        let player_node = scene.add(
            Node::new("player", Space::World, layout.player_start).with_texture(atlas.image.clone()),
        );
        let mut player = PlayerState {
            position: layout.player_start,
            intent: Vec2::ZERO,
            bounds: Rect::centered(layout.player_start, PLAYER_BOX_SIZE, PLAYER_BOX_SIZE),
            has_key: false,
            animation: PlayerAnimation::new(&atlas, config.animation_speed),
            last_move: MoveOutcome::STILL,
            node: player_node,
        };
        player.sync_bounds();

        let cursor_start = config.screen_center();
        let cursor = Cursor {
            node: scene.add(
                Node::new("cursor", Space::Screen, cursor_start)
                    .with_texture("cursor.png")
                    .with_scale(Vec2::new(2.0, 2.0)),
            ),
            size: Vec2::new(DEFAULT_CURSOR_SIZE, DEFAULT_CURSOR_SIZE),
            hovered: None,
        };

        let missing = scene
            .iter()
            .filter_map(|(_, node)| node.texture.as_deref())
            .chain(layout.floor.variants.iter().map(String::as_str))
            .find(|key| assets.get(key).is_none());
        if let Some(key) = missing {
            return Err(DuneError::MissingAsset { key: key.to_string() });
        }

        let camera = CameraModel::new(config.initial_zoom, config.camera_lerp).with_min_zoom(config.min_zoom);
        let floor = layout.floor_tiles(config.floor_seed);
        let resolver = MovementResolver::from_config(&config);
        let screen_size = Vec2::new(config.screen_width as f32, config.screen_height as f32);

        let mut session = Self {
            config,
            collision: built.world,
            player,
            camera,
            world_offset: Vec2::ZERO,
            scene,
            door,
            key,
            npcs,
            cursor,
            floor,
            resolver,
            screen_size,
            events: Vec::new(),
            tick: 0,
        };
        session.recenter_world();
        session.size_from_assets(assets);
        log::info!(
            "session ready: {} colliders, {} scene nodes, {} floor tiles",
            session.collision.len(),
            session.scene.len(),
            session.floor.len()
        );
        Ok(session)
    }

    /// Size scene nodes (and the cursor hover box) from loaded images.
    fn size_from_assets(&mut self, assets: &AssetCatalog) {
        let sized = self.scene.apply_texture_sizes(assets);
        if let Some(node) = self.scene.get(self.cursor.node) {
            if !node.size.is_zero() {
                self.cursor.size = Vec2::new(node.size.x * node.scale.x, node.size.y * node.scale.y);
            }
        }
        log::debug!("sized {sized} scene nodes from assets");
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events raised during the most recent tick.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn screen_center(&self) -> Vec2 {
        self.screen_size / 2.0
    }

    /// Track a new drawable size, keeping the player at the new centre.
    /// Zero sizes (a minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = Vec2::new(width as f32, height as f32);
        if width == 0 || height == 0 || size == self.screen_size {
            return;
        }
        log::debug!("screen resized to {width}x{height}");
        self.screen_size = size;
        self.recenter_world();
    }

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Start a new tick: clears the previous tick's events.
    pub fn begin_tick(&mut self) {
        self.events.clear();
        self.tick += 1;
    }

    /// Keep the player at screen centre under the current zoom.
    pub fn recenter_world(&mut self) {
        self.world_offset = self.screen_center() - self.player.position * self.camera.zoom;
    }

    /// Screen position of the player, before the camera offset.
    pub fn player_screen_position(&self) -> Vec2 {
        self.player.position * self.camera.zoom + self.world_offset
    }

    pub fn sample_input(&mut self, input: &dyn InputDevice) {
        self.player.intent = self.config.bindings.sample_intent(input);
    }

    pub fn apply_zoom(&mut self, input: &dyn InputDevice) {
        let mut delta = 0.0;
        if input.was_pressed(Key::ZoomIn) {
            delta += self.config.zoom_step;
        }
        if input.was_pressed(Key::ZoomOut) {
            delta -= self.config.zoom_step;
        }
        if delta == 0.0 {
            return;
        }

        let before = self.camera.zoom;
        self.camera.zoom_by(delta);
        if self.camera.zoom != before {
            self.recenter_world();
            self.emit(WorldEvent::ZoomChanged { zoom: self.camera.zoom });
        }
    }

    pub fn resolve_movement(&mut self) {
        self.player.sync_bounds();
        let outcome = self
            .resolver
            .resolve_at_zoom(self.player.intent, &self.player.bounds, &self.collision, self.camera.zoom);
        if let Some(collider) = outcome.blocked_by {
            self.emit(WorldEvent::MovementBlocked { collider });
        } else if !outcome.displacement.is_zero() {
            apply_displacement(
                outcome.displacement,
                &mut self.world_offset,
                &mut self.player.position,
                self.camera.zoom,
            );
            self.player.sync_bounds();
            self.scene.set_position(self.player.node, self.player.position);
        }
        self.player.last_move = outcome;
    }

    pub fn animate_player(&mut self) {
        self.player.animation.update(self.player.intent);
        let facing = self.player.animation.facing.sign();
        let frame = self.player.animation.current_frame().map(str::to_string);
        if let Some(node) = self.scene.get_mut(self.player.node) {
            node.scale.x = node.scale.x.abs() * facing;
            node.frame = frame;
        }
    }

    /// Move the cursor node to the pointer and test its box against the walls.
    pub fn update_cursor(&mut self, input: &dyn InputDevice) {
        let pointer = input.pointer().sanitized();
        self.scene.set_position(self.cursor.node, pointer);

        let center = self.camera.screen_to_world(pointer, self.world_offset);
        let hover_box = Rect::centered(center, self.cursor.size.x, self.cursor.size.y)
            .scaled(1.0 / self.camera.zoom);
        self.cursor.hovered = self.collision.overlapping(&hover_box);
    }

    pub fn update_camera(&mut self, input: &dyn InputDevice) {
        let center = self.screen_center();
        self.camera.update(input.pointer(), center);
    }
}
