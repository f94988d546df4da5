use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::BubbleMenuConfig;
use crate::menu::BubbleMenu;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/menu.ron"),
                PathBuf::from("assets/config/menu.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl FromWorld for ConfigReloadState {
    fn from_world(_world: &mut World) -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

/// Polls the layered RON files and pushes changed tunables into the running menu.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigReloadSettings>()
            .init_resource::<ConfigReloadState>()
            .add_systems(Update, poll_and_reload_config);
    }
}

/// Record fresh modification times; true if any file changed since the last poll.
fn any_modified(state: &mut ConfigReloadState, settings: &ConfigReloadSettings) -> bool {
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let entry = state
            .last_mod
            .entry(path.clone())
            .or_insert(SystemTime::UNIX_EPOCH);
        if mod_time > *entry {
            *entry = mod_time;
            dirty = true;
        }
    }
    dirty
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<BubbleMenuConfig>,
    menu: Option<ResMut<BubbleMenu>>,
) {
    let wanted = settings.interval_secs.max(0.05).min(3600.0);
    if (state.timer.duration().as_secs_f32() - wanted).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(wanted));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !any_modified(&mut state, &settings) {
        return;
    }
    let (new_cfg, _used, errors) = BubbleMenuConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    if let Err(e) = new_cfg.ensure_finite() {
        warn!("CONFIG HOT-RELOAD rejected: {e}");
        return;
    }
    for w in new_cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!("Config hot-reload applied");
    if let Some(mut menu) = menu {
        menu.apply_config(new_cfg.clone());
    }
    *cfg_res = new_cfg;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn reload_applies_edited_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "(collision: (margin: 25.0))").expect("write");

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
            .insert_resource(BubbleMenuConfig::default())
            .insert_resource(BubbleMenu::empty(BubbleMenuConfig::default()))
            .insert_resource(ConfigReloadSettings {
                paths: vec![file.path().to_path_buf()],
                interval_secs: 0.1,
            })
            .add_plugins(ConfigHotReloadPlugin);

        for _ in 0..3 {
            app.update();
        }

        let cfg = app.world().resource::<BubbleMenuConfig>();
        assert_eq!(cfg.collision.margin, 25.0);
        let menu = app.world().resource::<BubbleMenu>();
        assert_eq!(menu.config().collision.margin, 25.0);
    }

    #[test]
    fn unchanged_files_are_not_dirty_twice() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let settings = ConfigReloadSettings {
            paths: vec![file.path().to_path_buf(), PathBuf::from("does/not/exist.ron")],
            interval_secs: 0.1,
        };
        let mut state = ConfigReloadState {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.1, TimerMode::Repeating),
        };
        assert!(any_modified(&mut state, &settings));
        assert!(!any_modified(&mut state, &settings));
    }
}
