use ren::{Config, Interpreter, RenError};

#[test]
fn finished_call_frames_are_reclaimed() {
    let mut ev = Interpreter::new();
    ev.do_source("f: func [x] [x] repeat 50 [f 1]").unwrap();
    let before = ev.arena().live_count();
    let freed = ev.recycle(&[]);
    assert!(freed >= 50, "freed {freed}");
    assert_eq!(ev.arena().live_count(), before - freed);
}

#[test]
fn reachable_objects_survive() {
    let mut ev = Interpreter::new();
    ev.do_source("keep: make object! [inner: make object! [n: 5]]").unwrap();
    ev.recycle(&[]);
    assert_eq!(
        ev.do_source("keep/inner/n").unwrap().value(),
        &ren::Cell::integer(5)
    );
}

#[test]
fn handles_to_reclaimed_contexts_go_stale() {
    let mut ev = Interpreter::new();
    let outcome = ev.do_source("make object! [a: 1]").unwrap();
    let object = outcome.value().clone();
    let ctx = object.as_context().unwrap();

    ev.recycle(std::slice::from_ref(&object));
    assert!(ev.arena().get(ctx).is_ok());

    ev.recycle(&[]);
    assert!(matches!(ev.arena().get(ctx), Err(RenError::StaleContext)));
    // a slot reused by a later allocation keeps the old handle stale
    ev.do_source("make object! [b: 2]").unwrap();
    assert!(matches!(ev.arena().get(ctx), Err(RenError::StaleContext)));
}

#[test]
fn automatic_recycling_follows_the_threshold() {
    let config = Config::from_json(r#"{"recycle_threshold": 64}"#).unwrap();
    let mut ev = Interpreter::with_config(config);
    let recycles_before = ev.arena().total_recycles();
    ev.do_source("f: func [] [1] repeat 200 [f]").unwrap();
    assert!(ev.arena().total_recycles() > recycles_before);
    assert_eq!(ev.do_source("f").unwrap().value(), &ren::Cell::integer(1));
}

#[test]
fn disabled_collector_never_recycles_on_its_own() {
    let config = Config {
        gc_enabled: false,
        recycle_threshold: 64,
        ..Config::default()
    };
    let mut ev = Interpreter::with_config(config);
    ev.do_source("f: func [] [1] repeat 200 [f]").unwrap();
    assert_eq!(ev.arena().total_recycles(), 0);
}
