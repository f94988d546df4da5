use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use bubble_menu::core::system::system_order::MenuSet;
use bubble_menu::{
    BubbleId, BubbleItem, BubbleMenu, BubbleMenuPlugin, BubblePhase, BubblePhaseChanged,
    DragInput, MenuBubble, ViewportChanged,
};

#[derive(Resource, Default)]
struct SeenPhases(Vec<BubblePhaseChanged>);

fn record_phases(mut events: EventReader<BubblePhaseChanged>, mut seen: ResMut<SeenPhases>) {
    seen.0.extend(events.read().cloned());
}

fn app(n: usize) -> App {
    let items = (0..n).map(|i| BubbleItem::new(format!("b{i}"))).collect();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
        .init_resource::<SeenPhases>()
        .add_plugins(BubbleMenuPlugin::new(items))
        .add_systems(Update, record_phases.after(MenuSet::Present));
    app
}

fn transform_of(app: &mut App, id: &BubbleId) -> Option<Vec3> {
    let world = app.world_mut();
    world
        .query::<(&MenuBubble, &Transform)>()
        .iter(world)
        .find(|(b, _)| &b.id == id)
        .map(|(_, tf)| tf.translation)
}

#[test]
fn drag_round_trip_through_events() {
    let mut app = app(5);
    app.update();

    let b1 = BubbleId::from("b1");
    let (rest, vp) = {
        let menu = app.world().resource::<BubbleMenu>();
        (menu.rest_position(&b1).expect("rest"), menu.viewport())
    };
    let delta = Vec2::new(0.0, 200.0);

    app.world_mut().send_event(DragInput::Start { id: b1.clone() });
    app.world_mut().send_event(DragInput::Move {
        id: b1.clone(),
        delta,
    });
    app.update();
    app.update();

    let expected = vp.to_world(rest + delta, 50.0).extend(0.0);
    let tf = transform_of(&mut app, &b1).expect("entity for b1");
    assert!(tf.distance(expected) < 1e-3, "{tf} vs {expected}");
    assert_eq!(
        app.world().resource::<BubbleMenu>().is_dragging(&b1),
        Some(true)
    );

    app.world_mut().send_event(DragInput::End { id: b1.clone() });
    for _ in 0..150 {
        app.update();
    }

    let menu = app.world().resource::<BubbleMenu>();
    assert_eq!(menu.position(&b1), Some(rest));
    assert_eq!(menu.visual_position(&b1), Some(rest));
    assert_eq!(menu.phase(&b1), Some(BubblePhase::AtRest));

    let tf = transform_of(&mut app, &b1).expect("entity for b1");
    let home = vp.to_world(rest, 50.0).extend(0.0);
    assert!(tf.distance(home) < 1e-3);

    let seen: Vec<_> = app
        .world()
        .resource::<SeenPhases>()
        .0
        .iter()
        .filter(|c| c.id == b1)
        .map(|c| c.to)
        .collect();
    assert_eq!(
        seen,
        vec![
            BubblePhase::Dragging,
            BubblePhase::Returning,
            BubblePhase::AtRest
        ]
    );
}

#[test]
fn viewport_change_relayouts_bubbles() {
    let mut app = app(3);
    app.update();
    app.world_mut().send_event(ViewportChanged {
        width: 600.0,
        height: 600.0,
    });
    for _ in 0..6 {
        app.update();
    }

    let b0 = BubbleId::from("b0");
    let menu = app.world().resource::<BubbleMenu>();
    assert_eq!(menu.viewport().width, 600.0);
    assert_eq!(menu.rest_position(&b0), Some(Vec2::new(250.0, 250.0)));
    assert_eq!(menu.position(&b0), Some(Vec2::new(250.0, 250.0)));
    // Once the visual catches up, item 0 is back on the world origin.
    let tf = transform_of(&mut app, &b0).expect("entity for b0");
    assert!(tf.truncate().length() < 1e-3);
}

#[test]
fn unknown_drag_ids_leave_the_app_running() {
    let mut app = app(2);
    app.update();
    app.world_mut().send_event(DragInput::Start {
        id: BubbleId::from("nope"),
    });
    app.update();
    app.update();
    let world = app.world_mut();
    assert_eq!(world.query::<&MenuBubble>().iter(world).count(), 2);
}
