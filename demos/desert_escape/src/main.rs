use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dunewalk::{
    AssetCatalog, Engine, EngineContext, FrameClock, Game, GameConfig, LevelLayout, Session, WorldEvent,
    DESERT_FORT_IMAGES,
};

struct DesertEscape {
    session: Session,
    clock: FrameClock,
    status: String,
}

impl DesertEscape {
    fn log_events(&self) {
        for event in self.session.events() {
            match event {
                WorldEvent::MovementBlocked { .. } => log::trace!("{event:?}"),
                WorldEvent::KeyPickedUp => log::info!("You found the key."),
                WorldEvent::DoorUnlocked => log::info!("The door swings open."),
                other => log::debug!("{other:?}"),
            }
        }
    }

    fn status_line(&self) -> String {
        let dialogue = self
            .session
            .npcs
            .iter()
            .filter_map(|npc| self.session.scene.text(npc.text_node))
            .find(|line| !line.is_empty());

        let mut status = String::from("Desert Escape");
        if self.session.player.has_key {
            status.push_str(" [key]");
        }
        if self.session.door.unlocked {
            status.push_str(" [door open]");
        }
        if let Some(line) = dialogue {
            status.push_str(" - ");
            status.push_str(line);
        }
        status
    }
}

impl Game for DesertEscape {
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let (width, height) = ctx.surface_size();
        self.session.resize(width, height);

        while ctx.should_tick() {
            self.clock.tick(&mut self.session, ctx.input());
            self.log_events();
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let status = self.status_line();
        if status != self.status {
            if let Some(window) = ctx.window() {
                window.set_title(&status);
            }
            self.status = status;
        }
        Ok(())
    }
}

const DEFAULT_ASSETS_DIR: &str = "assets";

/// Usage: `desert_escape [assets-dir] [config.json] [layout.json]`
///
/// The assets directory defaults to `./assets`. Every image is loaded
/// before the session starts; a missing or broken image aborts startup.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let assets_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()));
    let config = match args.next() {
        Some(path) => GameConfig::load_from_file(Path::new(&path))
            .with_context(|| format!("failed to load config `{path}`"))?,
        None => GameConfig::default(),
    };
    let layout = match args.next() {
        Some(path) => LevelLayout::load_from_file(Path::new(&path))
            .with_context(|| format!("failed to load layout `{path}`"))?,
        None => LevelLayout::desert_fort(),
    };

    let names: Vec<&str> = DESERT_FORT_IMAGES
        .iter()
        .copied()
        .chain(layout.floor.variants.iter().map(String::as_str))
        .collect();
    let mut assets = AssetCatalog::new();
    assets
        .load_all(&assets_dir, &names)
        .with_context(|| format!("failed to load assets from {}", assets_dir.display()))?;

    let session = Session::new(config, &layout, &assets)?;

    let (width, height) = (session.config.screen_width, session.config.screen_height);
    Engine::new()
        .with_title("Desert Escape")
        .with_size(width, height)
        .run(DesertEscape {
            session,
            clock: FrameClock::standard(),
            status: String::new(),
        })
}
