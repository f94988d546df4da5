use std::fs;

use bubble_menu::core::config::ReturnEasing;
use bubble_menu::BubbleMenuConfig;

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/menu.ron");
    let cfg = BubbleMenuConfig::load_from_file(path).expect("shipped config parses");
    assert_eq!(cfg, BubbleMenuConfig::default());
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
}

#[test]
fn default_tunables() {
    let cfg = BubbleMenuConfig::default();
    assert_eq!((cfg.viewport.width, cfg.viewport.height), (400.0, 800.0));
    assert_eq!(cfg.menu.menu_distance, 20.0);
    assert_eq!(cfg.menu.bubble_radius, 50.0);
    assert_eq!(cfg.collision.margin, 10.0);
    assert_eq!(cfg.rest.snap_threshold, 1.0);
    assert_eq!(cfg.rest.easing, ReturnEasing::Exponential { factor: 0.2 });
    assert_eq!((cfg.scheduler.logic_hz, cfg.scheduler.ui_hz), (20.0, 60.0));
}

#[test]
fn local_layer_overrides_single_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = dir.path().join("menu.ron");
    let local = dir.path().join("menu.local.ron");
    fs::write(&base, "(menu: (bubble_radius: 40.0, menu_distance: 30.0))").expect("write base");
    fs::write(&local, "(menu: (menu_distance: 5.0), rest: (easing: (kind: \"Linear\", speed: 12.0)))")
        .expect("write local");
    let missing = dir.path().join("absent.ron");

    let (cfg, used, errors) = BubbleMenuConfig::load_layered([&base, &local, &missing]);
    assert_eq!(used.len(), 2);
    assert_eq!(errors.len(), 1, "missing layer reported: {errors:?}");
    assert_eq!(cfg.menu.bubble_radius, 40.0);
    assert_eq!(cfg.menu.menu_distance, 5.0);
    assert_eq!(cfg.menu.base_spacing, 130.0);
    assert_eq!(cfg.rest.easing, ReturnEasing::Linear { speed: 12.0 });
}

#[test]
fn broken_layer_is_reported_and_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = dir.path().join("menu.ron");
    let bad = dir.path().join("bad.ron");
    fs::write(&base, "(collision: (margin: 4.0))").expect("write base");
    fs::write(&bad, "(collision: (margin: ").expect("write bad");

    let (cfg, used, errors) = BubbleMenuConfig::load_layered([&base, &bad]);
    assert_eq!(used.len(), 1);
    assert!(errors[0].contains("parse error"), "{errors:?}");
    assert_eq!(cfg.collision.margin, 4.0);
}

#[test]
fn load_or_default_falls_back() {
    let (cfg, err) = BubbleMenuConfig::load_or_default("definitely/not/here.ron");
    assert_eq!(cfg, BubbleMenuConfig::default());
    assert!(err.is_some());
}
