//! Headless driver for the bubble menu engine.
//!
//! Usage:
//!   cargo run -- --items 5 --frames 120 --drag b1:200,150 --json
//!
//! Runs a fixed-rate Bevy app with no window, optionally scripts one drag, and
//! prints where every bubble ended up.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use bubble_menu::interaction::config_hot_reload::{ConfigHotReloadPlugin, ConfigReloadSettings};
use bubble_menu::{
    BubbleId, BubbleItem, BubbleMenu, BubbleMenuConfig, BubbleMenuPlugin, DragInput,
};

#[derive(Parser, Debug)]
#[command(about = "Simulate a draggable bubble menu headlessly", version, author)]
struct Args {
    /// RON config layers, later files override earlier ones.
    #[arg(long, num_args = 1.., default_values = ["assets/config/menu.ron", "assets/config/menu.local.ron"])]
    config: Vec<PathBuf>,
    #[arg(long, default_value_t = 5)]
    items: usize,
    #[arg(long, default_value_t = 120)]
    frames: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Drag one bubble: `ID:DX,DY`. Pressed on the first frame, released halfway.
    #[arg(long, value_parser = parse_drag)]
    drag: Option<DragScript>,
    /// Print the final snapshot as JSON.
    #[arg(long)]
    json: bool,
    /// Poll the config layers and apply edits while running.
    #[arg(long)]
    watch: bool,
    /// Log filter passed to the tracing subscriber.
    #[arg(long, default_value = "warn,bubble_menu=info")]
    log: String,
}

#[derive(Debug, Clone)]
struct DragScript {
    id: BubbleId,
    delta: Vec2,
}

fn parse_drag(s: &str) -> Result<DragScript, String> {
    let (id, delta) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ID:DX,DY, got {s:?}"))?;
    let (dx, dy) = delta
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY after ':', got {delta:?}"))?;
    let dx: f32 = dx.trim().parse().map_err(|e| format!("bad DX {dx:?}: {e}"))?;
    let dy: f32 = dy.trim().parse().map_err(|e| format!("bad DY {dy:?}: {e}"))?;
    if id.is_empty() {
        return Err("empty bubble id".into());
    }
    Ok(DragScript {
        id: BubbleId::new(id),
        delta: Vec2::new(dx, dy),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn watch_config(app: &mut App, paths: Vec<PathBuf>) {
    app.insert_resource(ConfigReloadSettings {
        paths,
        ..default()
    })
    .add_plugins(ConfigHotReloadPlugin);
}

#[cfg(target_arch = "wasm32")]
fn watch_config(_app: &mut App, _paths: Vec<PathBuf>) {
    warn!("--watch needs a filesystem; config edits are ignored on wasm");
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !(args.fps >= 4.0) {
        bail!("fps must be at least 4 (got {})", args.fps);
    }

    let (cfg, used, errors) = BubbleMenuConfig::load_layered(args.config.iter());
    let items: Vec<BubbleItem> = (0..args.items)
        .map(|i| BubbleItem::new(format!("b{i}")))
        .collect();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            filter: args.log.clone(),
            ..default()
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / args.fps,
        )))
        .add_plugins(BubbleMenuPlugin::new(items).with_config(cfg));
    if args.watch {
        watch_config(&mut app, args.config.clone());
    }
    app.finish();
    app.cleanup();

    if used.is_empty() {
        info!("no config layers found; using defaults");
    } else {
        info!("config layers: {}", used.join(", "));
    }
    for e in errors {
        // Missing layers are expected; anything else deserves attention.
        if e.contains("read error") {
            debug!("config: {e}");
        } else {
            warn!("config: {e}");
        }
    }

    let release_at = args.frames / 2;
    for frame in 0..args.frames {
        if let Some(script) = &args.drag {
            let world = app.world_mut();
            if frame == 0 {
                world.send_event(DragInput::Start {
                    id: script.id.clone(),
                });
                world.send_event(DragInput::Move {
                    id: script.id.clone(),
                    delta: script.delta,
                });
            } else if frame == release_at {
                world.send_event(DragInput::End {
                    id: script.id.clone(),
                });
            }
        }
        app.update();
    }

    let menu = app.world().resource::<BubbleMenu>();
    let snapshot = menu.snapshot();
    if args.json {
        let out = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
        println!("{out}");
    } else {
        for b in &snapshot {
            println!(
                "{:<6} pos=({:7.2},{:7.2}) rest=({:7.2},{:7.2}) {:?}{}",
                b.id.as_str(),
                b.position[0],
                b.position[1],
                b.rest[0],
                b.rest[1],
                b.phase,
                if b.dragging { " [dragging]" } else { "" }
            );
        }
    }
    Ok(())
}
