use folio_core::collage::{CollageGeometry, Key, TileBounds, WheelInput};
use folio_core::deep_link::DeepLinkRequest;
use folio_core::navigation::{Command, DeferredTask, Navigator, Timings};
use folio_core::{catalog, EXTERNAL_LINK_SLUG};
use pretty_assertions::assert_eq;

const SECTION: f64 = 1200.0;

fn geometry() -> CollageGeometry {
    CollageGeometry::new(SECTION * catalog::category_count() as f64, SECTION)
}

fn collage_at(key: &str) -> Navigator {
    let mut nav = Navigator::default();
    nav.set_geometry(geometry());
    let task = single_task(&nav.open_category(key));
    nav.fire(task);
    nav
}

fn single_task(commands: &[Command]) -> DeferredTask {
    match commands {
        [Command::Defer { task, .. }] => *task,
        other => panic!("expected one deferred task, got {other:?}"),
    }
}

fn vertical(delta_y: f64) -> WheelInput {
    WheelInput {
        delta_x: 0.0,
        delta_y,
        in_strip: false,
    }
}

#[test]
fn open_then_back() {
    let mut nav = Navigator::default();
    nav.set_geometry(geometry());
    assert!(nav.state().is_home());

    let commands = nav.open_category("mechanical");
    assert_eq!(
        commands,
        vec![Command::Defer {
            delay_ms: Timings::default().settle_ms,
            task: single_task(&commands),
        }]
    );
    let scroll = nav.fire(single_task(&commands));
    assert_eq!(nav.state().active_key(), Some("mechanical"));
    assert_eq!(
        scroll,
        vec![Command::ScrollTo {
            left: SECTION,
            smooth: true,
        }]
    );
    assert!(nav.state().page_scroll_locked());

    let back = nav.back();
    assert!(nav.state().is_exiting());
    assert!(nav.back().is_empty());
    match back.as_slice() {
        [Command::Defer { delay_ms, task }] => {
            assert_eq!(*delay_ms, Timings::default().exit_ms);
            nav.fire(*task);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(nav.state().is_home());
    assert!(!nav.state().is_exiting());
    assert!(!nav.state().page_scroll_locked());
}

#[test]
fn stepping_is_clamped_and_never_wraps() {
    let mut nav = collage_at("about");
    let last = catalog::category_count() - 1;
    let script = [-1, -1, 1, 1, 1, 1, 1, 1, -1, 1, 1, -1, -1, -1, -1, -1, -1];
    for offset in script {
        nav.step(offset);
        let index = nav.state().active_index().expect("collage open");
        assert!(index <= last);
    }
    assert_eq!(nav.state().active_index(), Some(0));
    assert!(nav.step(-1).is_empty());

    for _ in 0..10 {
        nav.on_key(Key::ArrowRight);
    }
    assert_eq!(nav.state().active_index(), Some(last));
    assert!(nav.on_key(Key::ArrowRight).is_empty());
}

#[test]
fn wheel_cooldown_drops_rapid_events() {
    let mut nav = collage_at("about");
    let first = nav.on_wheel(vertical(100.0), 10_000.0);
    assert!(first.prevent_default);
    assert_eq!(first.commands.len(), 1);
    assert_eq!(nav.state().active_key(), Some("mechanical"));

    let second = nav.on_wheel(vertical(100.0), 10_120.0);
    assert!(second.prevent_default);
    assert!(second.commands.is_empty());
    assert_eq!(nav.state().active_key(), Some("mechanical"));

    let third = nav.on_wheel(vertical(-80.0), 10_500.0);
    assert_eq!(third.commands.len(), 1);
    assert_eq!(nav.state().active_key(), Some("about"));
}

#[test]
fn horizontal_and_strip_gestures_pass_through() {
    let mut nav = collage_at("mechanical");
    let horizontal = nav.on_wheel(
        WheelInput {
            delta_x: 90.0,
            delta_y: 20.0,
            in_strip: false,
        },
        0.0,
    );
    assert!(!horizontal.prevent_default);
    let strip = nav.on_wheel(
        WheelInput {
            delta_x: 0.0,
            delta_y: 100.0,
            in_strip: true,
        },
        0.0,
    );
    assert!(!strip.prevent_default);
    assert_eq!(nav.state().active_key(), Some("mechanical"));

    // Pass-through events do not consume the cooldown.
    assert_eq!(nav.on_wheel(vertical(100.0), 1.0).commands.len(), 1);
}

#[test]
fn overlay_isolates_collage_from_wheel_and_arrows() {
    let mut nav = collage_at("electrical");
    nav.activate_item("baja");
    assert_eq!(nav.state().focused_item().map(|item| item.slug), Some("baja"));

    let wheel = nav.on_wheel(vertical(100.0), 50_000.0);
    assert!(!wheel.prevent_default);
    assert!(nav.step(1).is_empty());
    assert_eq!(nav.state().active_key(), Some("electrical"));

    nav.on_key(Key::ArrowRight);
    assert_eq!(nav.state().active_key(), Some("electrical"));
    assert!(nav.state().focused_item().is_none());
}

#[test]
fn external_link_item_never_focuses() {
    let mut nav = collage_at("about");
    nav.activate_item("rc-car");
    let commands = nav.activate_item(EXTERNAL_LINK_SLUG);
    assert_eq!(
        commands,
        vec![Command::OpenExternal {
            url: catalog::EXTERNAL_LINK_URL,
        }]
    );
    assert_eq!(nav.state().focused_item().map(|item| item.slug), Some("rc-car"));

    nav.close_focus();
    nav.activate_item(EXTERNAL_LINK_SLUG);
    assert!(nav.state().focused_item().is_none());
}

#[test]
fn thumbnail_selection_replaces_focus_and_title_opens_project() {
    let mut nav = collage_at("software");
    nav.activate_item("ros-car");
    nav.activate_item("planetary-gearset");
    assert_eq!(
        nav.activate_title(),
        vec![Command::OpenProject {
            slug: "planetary-gearset",
        }]
    );
    let selected: Vec<_> = nav
        .state()
        .thumbnails()
        .into_iter()
        .filter(|thumb| thumb.selected)
        .map(|thumb| thumb.item.slug)
        .collect();
    assert_eq!(selected, vec!["planetary-gearset"]);
}

#[test]
fn drag_scroll_adopts_nearest_and_updates_parallax_in_one_pass() {
    let mut nav = collage_at("about");
    let tiles = [
        TileBounds {
            left: 100.0,
            width: 200.0,
        },
        TileBounds {
            left: 900.0,
            width: 200.0,
        },
    ];
    let pass = nav.on_scroll(SECTION * 2.4, geometry(), &tiles, 1200.0);
    assert!(pass.active_changed);
    assert_eq!(nav.state().active_key(), Some("electrical"));
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.parallax.shifts(), &[20.0, -20.0]);

    let pass = nav.on_scroll(SECTION * 2.1, geometry(), &tiles, 1200.0);
    assert!(!pass.active_changed);
}

#[test]
fn scroll_adoption_waits_for_pending_deep_link() {
    let mut nav = Navigator::default();
    nav.set_geometry(geometry());
    let request = DeepLinkRequest::new("software", None).expect("valid request");
    nav.begin_deep_link(request);
    assert_eq!(nav.state().active_key(), Some(catalog::DEFAULT_DEEP_LINK_CATEGORY));

    let pass = nav.on_scroll(SECTION * 2.0, geometry(), &[], SECTION);
    assert!(!pass.active_changed);
    assert_eq!(nav.state().active_key(), Some(catalog::DEFAULT_DEEP_LINK_CATEGORY));
}

#[test]
fn scroll_adoption_is_ignored_while_exiting() {
    let mut nav = collage_at("mechanical");
    let exit = single_task(&nav.back());
    assert!(nav.state().is_exiting());

    let pass = nav.on_scroll(SECTION * 3.0, geometry(), &[], SECTION);
    assert!(!pass.active_changed);
    assert_eq!(nav.state().active_key(), Some("mechanical"));

    nav.fire(exit);
    assert!(nav.state().is_home());
    assert!(!nav.state().is_exiting());
}
