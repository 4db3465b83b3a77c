/// Entry point and turn loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use delve::config::GameConfig;
use delve::domain::entity::Fightable;
use delve::domain::item::{ItemKind, PotionKind};
use delve::domain::position::Direction;
use delve::sim::event::AttackOutcome;
use delve::sim::level::{builtin_level, load_level_file};
use delve::sim::map::GridMap;
use delve::sim::observer::WorldObserver;
use delve::sim::slot::WorldSlot;
use delve::sim::world::World;
use delve::ui::input::{next_command, Command};
use delve::ui::renderer::Renderer;
use delve::ui::sound::SoundEngine;

const KEY_POLL: Duration = Duration::from_millis(100);
const GAME_OVER_PAUSE: Duration = Duration::from_millis(1500);

/// Raised by the world after every accepted action; cleared by each redraw.
#[derive(Default)]
struct RedrawFlag(AtomicBool);

impl RedrawFlag {
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl WorldObserver for RedrawFlag {
    fn on_change(&self) {
        self.0.store(true, Ordering::Release);
    }
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging()?;
    let config = GameConfig::load();

    let mut level = match &config.level {
        Some(path) => load_level_file(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => builtin_level().context("parsing built-in level")?,
    };
    let title = level.name.clone();
    level.map = level.map.with_reveal_radius(config.reveal_radius);

    let mut slot: WorldSlot = WorldSlot::new();
    let world = slot.bind(|| {
        let world = level.into_world()?;
        Ok(attach_audio(world, &config))
    })?;

    let redraw = Arc::new(RedrawFlag::default());
    world.register_observer(redraw.clone());
    tracing::info!("starting '{}'", title);

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let result = game_loop(world, &mut renderer, &redraw, &title);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    let world = slot.get()?;
    let player = world.active_player();
    println!("{world}");
    println!("Thanks for playing Delve!");
    println!("{} finished with {} treasure points.", player.name, player.treasure_points());
    Ok(())
}

/// File-only logging: the terminal belongs to the game while it runs.
/// `RUST_LOG` adds directives on top of the INFO default.
fn init_logging() -> anyhow::Result<WorkerGuard> {
    let dir = std::env::var_os("DELVE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("delve"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, "delve.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("log file: {}/delve.log", dir.display());
    Ok(guard)
}

fn attach_audio(world: World<GridMap>, config: &GameConfig) -> World<GridMap> {
    if !config.audio.enabled {
        tracing::info!("audio disabled by config");
        return world;
    }
    match SoundEngine::new(config.audio.volume) {
        Some(engine) => world.with_audio(engine),
        None => {
            tracing::warn!("no audio output device; playing silently");
            world
        }
    }
}

fn game_loop(
    world: &mut World<GridMap>,
    renderer: &mut Renderer,
    redraw: &RedrawFlag,
    title: &str,
) -> anyhow::Result<()> {
    let mut message = String::from("Find the treasure. Mind the dragon.");
    renderer.render(world, title, &message)?;

    loop {
        let Some(cmd) = next_command(KEY_POLL)? else {
            if redraw.take() {
                renderer.render(world, title, &message)?;
            }
            continue;
        };

        message = match cmd {
            Command::Quit => break,
            Command::Move(dir) => step_or_attack(world, dir)?,
            Command::PickUp => pick_up_here(world),
            Command::Drink(kind) => drink(world, kind),
        };
        redraw.take();
        renderer.render(world, title, &message)?;

        if world.active_player().is_dead() {
            std::thread::sleep(GAME_OVER_PAUSE);
            break;
        }
    }

    Ok(())
}

/// Bumping into an enemy attacks it; anything else is a move attempt.
fn step_or_attack(world: &mut World<GridMap>, dir: Direction) -> anyhow::Result<String> {
    let target = world.active_player().position.step(dir);

    if let Some((id, label)) = world.enemy_at(target).map(|e| (e.id, e.description())) {
        let msg = match world.attack(id)? {
            AttackOutcome::Exchanged => {
                let hp = world.enemy(id).map(|e| e.health()).unwrap_or(0);
                format!("You hit the {label}. It has {hp} HP left.")
            }
            AttackOutcome::EnemyDefeated { loot } => {
                let value = world.item(loot).and_then(|i| i.treasure_value()).unwrap_or(0);
                format!("{label} defeated! It dropped {value} gold.")
            }
            AttackOutcome::PlayerDefeated => String::from("Game Over! You were defeated."),
        };
        return Ok(msg);
    }

    if world.move_player(target) {
        Ok(match world.item_at(target) {
            Some(item) => format!("You see a {} here.", item.name()),
            None => String::new(),
        })
    } else {
        Ok(format!("You can't go {}.", dir.name()))
    }
}

fn pick_up_here(world: &mut World<GridMap>) -> String {
    let here = world.active_player().position;
    let item = world.item_at(here).map(|i| (i.id, i.name()));
    match item {
        Some((id, name)) if world.pick_up_item(Some(id)) => format!("Picked up {name}."),
        _ => String::from("Nothing to pick up here."),
    }
}

fn drink(world: &mut World<GridMap>, kind: PotionKind) -> String {
    let potion = world
        .active_player()
        .inventory()
        .iter()
        .find(|i| i.kind == ItemKind::Potion(kind))
        .cloned();
    let Some(potion) = potion else {
        return String::from("You have no such potion.");
    };
    if world.use_item(Some(&potion)) {
        format!("You drink the {}.", potion.name())
    } else {
        format!("The {} would do nothing right now.", potion.name())
    }
}
