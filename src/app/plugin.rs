// This file is part of Bubble Menu.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

use bevy::prelude::*;

use crate::core::components::{BubbleId, BubbleItem, MenuBubble};
use crate::core::config::BubbleMenuConfig;
use crate::core::geometry::Viewport;
use crate::core::system::system_order::MenuSet;
use crate::interaction::drag::DragInput;
use crate::menu::BubbleMenu;
use crate::state::BubblePhaseChanged;

/// The host window (or whatever hosts the menu) changed size.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ViewportChanged {
    pub width: f32,
    pub height: f32,
}

/// Installs the menu engine as a resource and drives it from `Update`.
#[derive(Debug, Clone, Default)]
pub struct BubbleMenuPlugin {
    pub items: Vec<BubbleItem>,
    pub config: BubbleMenuConfig,
}

impl BubbleMenuPlugin {
    pub fn new(items: Vec<BubbleItem>) -> Self {
        Self {
            items,
            config: BubbleMenuConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BubbleMenuConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for BubbleMenuPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.ensure_finite() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                error!("{e}; falling back to default config");
                BubbleMenuConfig::default()
            }
        };
        for w in config.validate() {
            warn!("CONFIG WARNING: {w}");
        }
        let menu = match BubbleMenu::new(self.items.clone(), config.clone()) {
            Ok(menu) => menu,
            Err(e) => {
                error!("bubble menu disabled: {e}");
                BubbleMenu::empty(config.clone())
            }
        };
        info!("bubble menu ready with {} bubbles", menu.ids().len());

        app.insert_resource(config)
            .insert_resource(menu)
            .add_event::<DragInput>()
            .add_event::<ViewportChanged>()
            .add_event::<BubblePhaseChanged>()
            .configure_sets(
                Update,
                (MenuSet::Input, MenuSet::Logic, MenuSet::Present).chain(),
            )
            .add_systems(
                Update,
                (ingest_drag_events, apply_viewport_changes)
                    .chain()
                    .in_set(MenuSet::Input),
            )
            .add_systems(Update, advance_menu.in_set(MenuSet::Logic))
            .add_systems(
                Update,
                (
                    sync_bubble_entities,
                    sync_bubble_transforms,
                    publish_phase_changes,
                )
                    .chain()
                    .in_set(MenuSet::Present),
            );
    }
}

fn ingest_drag_events(mut events: EventReader<DragInput>, mut menu: ResMut<BubbleMenu>) {
    for ev in events.read() {
        match ev {
            DragInput::Start { id } => menu.drag_start(id),
            DragInput::Move { id, delta } => menu.drag_move(id, *delta),
            DragInput::End { id } => menu.drag_end(id),
        }
    }
}

fn apply_viewport_changes(
    mut events: EventReader<ViewportChanged>,
    mut menu: ResMut<BubbleMenu>,
) {
    // Only the latest size matters.
    if let Some(ev) = events.read().last() {
        menu.set_viewport(Viewport::new(ev.width, ev.height));
    }
}

fn advance_menu(time: Res<Time>, mut menu: ResMut<BubbleMenu>) {
    menu.advance(time.delta());
}

fn world_translation(menu: &BubbleMenu, id: &BubbleId) -> Option<Vec3> {
    let pos = menu.visual_position(id)?;
    let radius = menu.radius(id)?;
    Some(menu.viewport().to_world(pos, radius).extend(0.0))
}

/// Keep exactly one `MenuBubble` entity per bubble in the engine.
fn sync_bubble_entities(
    mut commands: Commands,
    menu: Res<BubbleMenu>,
    existing: Query<(Entity, &MenuBubble)>,
) {
    let mut seen = HashSet::new();
    for (entity, bubble) in &existing {
        if menu.position(&bubble.id).is_none() || !seen.insert(bubble.id.clone()) {
            commands.entity(entity).despawn();
        }
    }
    for id in menu.ids() {
        if seen.contains(id) {
            continue;
        }
        let translation = world_translation(&menu, id).unwrap_or_default();
        commands.spawn((
            Name::new(format!("Bubble {id}")),
            MenuBubble { id: id.clone() },
            Transform::from_translation(translation),
        ));
    }
}

fn sync_bubble_transforms(menu: Res<BubbleMenu>, mut q: Query<(&MenuBubble, &mut Transform)>) {
    for (bubble, mut tf) in &mut q {
        if let Some(translation) = world_translation(&menu, &bubble.id) {
            if tf.translation != translation {
                tf.translation = translation;
            }
        }
    }
}

fn publish_phase_changes(
    mut menu: ResMut<BubbleMenu>,
    mut writer: EventWriter<BubblePhaseChanged>,
) {
    for change in menu.take_phase_changes() {
        writer.write(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app_with(items: usize) -> App {
        let items = (0..items).map(|i| BubbleItem::new(format!("b{i}"))).collect();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
            .add_plugins(BubbleMenuPlugin::new(items));
        app
    }

    #[test]
    fn spawns_one_entity_per_bubble() {
        let mut app = app_with(4);
        app.update();
        app.update();
        let world = app.world_mut();
        let count = world.query::<&MenuBubble>().iter(world).count();
        assert_eq!(count, 4);
    }

    #[test]
    fn transform_tracks_world_center() {
        let mut app = app_with(1);
        app.update();
        app.update();
        let world = app.world_mut();
        let (bubble, tf) = world
            .query::<(&MenuBubble, &Transform)>()
            .single(world)
            .expect("one bubble");
        assert_eq!(bubble.id.as_str(), "b0");
        // Item 0 sits on the viewport center, which is the world origin.
        assert!(tf.translation.truncate().length() < 1e-3);
    }

    #[test]
    fn non_finite_config_falls_back_to_defaults() {
        let mut config = BubbleMenuConfig::default();
        config.menu.bubble_radius = f32::NAN;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(BubbleMenuPlugin::new(vec![BubbleItem::new("a")]).with_config(config));
        app.update();
        let menu = app.world().resource::<BubbleMenu>();
        assert_eq!(menu.config(), &BubbleMenuConfig::default());
        assert_eq!(menu.radius(&BubbleId::from("a")), Some(50.0));
    }

    #[test]
    fn duplicate_ids_fall_back_to_empty_menu() {
        let items = vec![BubbleItem::new("a"), BubbleItem::new("a")];
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(BubbleMenuPlugin::new(items));
        app.update();
        assert!(app.world().resource::<BubbleMenu>().ids().is_empty());
    }
}
