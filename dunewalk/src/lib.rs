//! Dunewalk - tile collision, ray-probed movement and a pointer-following
//! camera for small top-down 2D games.
//!
//! The core is headless: [`Session`] owns the game state and a
//! [`FrameClock`] steps it once per tick from any [`InputDevice`]. The
//! [`Engine`] hosts a session in a winit window.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod input;
pub mod level;
pub mod math;
pub mod movement;
pub mod scene;
pub mod session;
pub mod systems;
pub mod triggers;

pub use crate::assets::{AssetCatalog, ImageInfo, DESERT_FORT_IMAGES};
pub use crate::camera::CameraModel;
pub use crate::clock::{FrameClock, System};
pub use crate::collision::{cast_ray, point_in_rect, rects_overlap, ColliderId, CollisionWorld, RayMode};
pub use crate::config::GameConfig;
pub use crate::engine::{Engine, EngineConfig, EngineContext, Game};
pub use crate::error::{DuneError, DuneResult};
pub use crate::input::{InputDevice, InputState, Key, KeyBindings};
pub use crate::level::LevelLayout;
pub use crate::math::{Rect, Vec2};
pub use crate::movement::{MoveOutcome, MovementResolver};
pub use crate::session::{Session, WorldEvent};
pub use winit::keyboard::KeyCode;
