//! Activation cascade and initialization gate behavior.

mod common;

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::Hooks;
use parking_lot::Mutex;
use trellis::{Application, ArgList, ViewDefinition, ViewOptions};

#[test]
fn test_child_of_active_parent_initializes_once_on_next_cascade() {
    let app = Application::new();
    let parent = app.create_view(None, ViewDefinition::new()).unwrap();

    let hooks = Hooks::new();
    let inits = hooks.init_count();
    let child = parent
        .create_child(ViewDefinition::new().behavior(hooks))
        .unwrap();

    assert!(child.is_active());
    assert!(!child.is_initialized());
    assert_eq!(inits.load(Ordering::SeqCst), 0);

    parent.set_active(true);

    assert!(child.is_initialized());
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_repeated_activation_initializes_once() {
    let app = Application::new();
    let hooks = Hooks::new();
    let inits = hooks.init_count();
    let view = app
        .create_view(None, ViewDefinition::new().behavior(hooks))
        .unwrap();

    view.set_active(true);
    view.set_active(true);
    view.set_active(true);

    assert!(view.is_initialized());
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_route_less_children_mirror_parent_activation() {
    let app = Application::new();
    let parent = app.create_view(None, ViewDefinition::new()).unwrap();
    let first = parent.create_child(ViewDefinition::new()).unwrap();
    let second = parent.create_child(ViewDefinition::new()).unwrap();

    parent.set_active(false);
    assert!(!first.is_active());
    assert!(!second.is_active());

    parent.set_active(true);
    assert!(first.is_active());
    assert!(second.is_active());
}

#[test]
fn test_route_bound_children_do_not_mirror() {
    let app = Application::new();
    let parent = app.create_view(None, ViewDefinition::new()).unwrap();
    let routed = parent
        .create_child(ViewDefinition::new().options(ViewOptions::new().route("about")))
        .unwrap();

    parent.set_active(true);
    assert!(!routed.is_active());

    parent.set_active(false);
    parent.set_active(true);
    assert!(!routed.is_active());
}

#[test]
fn test_child_constructed_under_inactive_parent_starts_inactive() {
    let app = Application::new();
    let parent = app.create_view(None, ViewDefinition::new()).unwrap();
    parent.set_active(false);

    let child = parent.create_child(ViewDefinition::new()).unwrap();
    assert!(!child.is_active());

    parent.set_active(true);
    assert!(child.is_active());
}

#[test]
fn test_subtree_settles_depth_first_before_the_write_returns() {
    let app = Application::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let tracer = |label: &'static str, order: &Arc<Mutex<Vec<&'static str>>>| {
        let order = order.clone();
        Hooks::new().on_init(move |_, _| order.lock().push(label))
    };

    let parent = app
        .create_view(None, ViewDefinition::new().behavior(tracer("parent", &order)))
        .unwrap();
    let first = parent
        .create_child(ViewDefinition::new().behavior(tracer("first", &order)))
        .unwrap();
    first
        .create_child(ViewDefinition::new().behavior(tracer("first.leaf", &order)))
        .unwrap();
    let second = parent
        .create_child(ViewDefinition::new().behavior(tracer("second", &order)))
        .unwrap();
    second
        .create_child(ViewDefinition::new().behavior(tracer("second.leaf", &order)))
        .unwrap();

    parent.set_active(true);

    assert_eq!(
        *order.lock(),
        vec!["first.leaf", "first", "second.leaf", "second", "parent"]
    );
}

#[test]
fn test_construction_alone_does_not_initialize() {
    let app = Application::new();
    let hooks = Hooks::new();
    let inits = hooks.init_count();
    let view = app
        .create_view(None, ViewDefinition::new().behavior(hooks))
        .unwrap();

    assert!(view.is_active());
    assert!(!view.is_initialized());
    assert_eq!(inits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_children_created_during_init_receive_the_cascade() {
    let app = Application::new();
    let child_inits = Arc::new(AtomicUsize::new(0));
    let child_routes = Arc::new(AtomicUsize::new(0));

    let child_inits_clone = child_inits.clone();
    let child_routes_clone = child_routes.clone();
    let parent_hooks = Hooks::new().on_init(move |view, _| {
        let behavior = Hooks::sharing(child_inits_clone.clone(), child_routes_clone.clone());
        view.create_child(ViewDefinition::new().named("LateChild").behavior(behavior))
            .unwrap();
    });

    let parent = app
        .create_view(None, ViewDefinition::new().behavior(parent_hooks))
        .unwrap();

    parent.set_active(true);

    let late_child = app.view("LateChild").unwrap();
    assert_eq!(late_child.parent_view().map(|p| p.id()), Some(parent.id()));
    assert!(late_child.is_active());
    assert!(late_child.is_initialized());
    assert_eq!(child_inits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nested_initialization_attributes_children_to_the_right_parent() {
    let app = Application::new();

    let app_for_parent = app.clone();
    let parent_hooks = Hooks::new().on_init(move |_, _| {
        // Ambient attribution: no explicit parent anywhere below.
        let app_for_inner = app_for_parent.clone();
        let inner_hooks = Hooks::new().on_init(move |_, _| {
            app_for_inner
                .create_view(None, ViewDefinition::new().named("Grandchild"))
                .unwrap();
        });
        let inner = app_for_parent
            .create_view(None, ViewDefinition::new().named("Inner").behavior(inner_hooks))
            .unwrap();
        // Initialize the inner view while the outer init is still running.
        inner.set_active(true);
        // Views created after the nested initialization must attribute to the
        // outer view again.
        app_for_parent
            .create_view(None, ViewDefinition::new().named("Sibling"))
            .unwrap();
    });

    let parent = app
        .create_view(None, ViewDefinition::new().named("Outer").behavior(parent_hooks))
        .unwrap();
    parent.set_active(true);

    let inner = app.view("Inner").unwrap();
    let grandchild = app.view("Grandchild").unwrap();
    let sibling = app.view("Sibling").unwrap();

    assert_eq!(inner.parent_view().map(|p| p.id()), Some(parent.id()));
    assert_eq!(grandchild.parent_view().map(|p| p.id()), Some(inner.id()));
    assert_eq!(sibling.parent_view().map(|p| p.id()), Some(parent.id()));
}

#[test]
fn test_init_args_are_replayed_into_the_callback() {
    let app = Application::new();
    let received = Arc::new(Mutex::new(None));

    let received_clone = received.clone();
    let hooks = Hooks::new().on_init(move |_, args| {
        *received_clone.lock() = Some((
            args.get::<i32>(0).copied(),
            args.get::<String>(1).cloned(),
        ));
    });

    let view = app
        .create_view(
            None,
            ViewDefinition::new()
                .behavior(hooks)
                .init_args(ArgList::new().with(42i32).with("section".to_string())),
        )
        .unwrap();
    view.set_active(true);

    assert_eq!(
        *received.lock(),
        Some((Some(42), Some("section".to_string())))
    );
}

#[test]
fn test_panic_in_init_propagates_and_commits_the_guard() {
    let app = Application::new();
    let hooks = Hooks::new().on_init(|_, _| panic!("init exploded"));
    let inits = hooks.init_count();
    let view = app
        .create_view(None, ViewDefinition::new().behavior(hooks))
        .unwrap();

    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| view.set_active(true)));
    assert!(outcome.is_err());

    // The guard committed before the callback ran: the callback never fires
    // again, and the ambient context unwound cleanly.
    assert!(view.is_initialized());
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    view.set_active(true);
    assert_eq!(inits.load(Ordering::SeqCst), 1);

    let fresh = app.create_view(None, ViewDefinition::new()).unwrap();
    assert!(fresh.parent_view().is_none());
}

#[test]
fn test_events_round_trip_on_a_view() {
    let app = Application::new();
    let view = app.create_view(None, ViewDefinition::new()).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = calls.clone();
    let id = view.on("refresh", move |args| {
        assert_eq!(args.get::<u32>(0), Some(&5));
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    view.trigger("refresh", &ArgList::new().with(5u32));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(view.off("refresh", id));
    view.trigger("refresh", &ArgList::new().with(5u32));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_observers_see_activation_changes() {
    let app = Application::new();
    let view = app.create_view(None, ViewDefinition::new()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    view.activation().subscribe(move |active| {
        seen_clone.lock().push(*active);
    });

    view.set_active(false);
    view.set_active(true);
    assert_eq!(*seen.lock(), vec![false, true]);
}
