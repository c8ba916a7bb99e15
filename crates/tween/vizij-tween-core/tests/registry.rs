use std::cell::Cell;
use std::rc::Rc;

use vizij_tween_core::{
    Animator, Config, ManualFrames, MemoryStyle, Registry, TimingSource,
};

fn registry(frames: &Rc<ManualFrames>, built: &Rc<Cell<usize>>) -> Registry<MemoryStyle> {
    let frames = frames.clone();
    let built = built.clone();
    Registry::new(Config::default(), move |_cfg| {
        built.set(built.get() + 1);
        frames.clone() as Rc<dyn TimingSource>
    })
}

#[test]
fn same_element_yields_same_animator() {
    let frames = Rc::new(ManualFrames::new());
    let built = Rc::new(Cell::new(0));
    let reg = registry(&frames, &built);
    let el = Rc::new(MemoryStyle::new());

    let a = reg.take(&el);
    let b = reg.take(&el);
    assert!(Animator::ptr_eq(&a, &b));
    assert_eq!(built.get(), 1);
    assert_eq!(reg.len(), 1);
}

#[test]
fn different_elements_have_independent_queues() {
    let frames = Rc::new(ManualFrames::new());
    let built = Rc::new(Cell::new(0));
    let reg = registry(&frames, &built);
    let el1 = Rc::new(MemoryStyle::new().with("left", "0px"));
    let el2 = Rc::new(MemoryStyle::new().with("left", "0px"));

    let a = reg.take(&el1);
    let b = reg.take(&el2);
    assert!(!Animator::ptr_eq(&a, &b));
    assert_eq!(built.get(), 2);

    a.animate_to([("left", 100)], 100.0);
    b.animate_to([("left", 50)], 10.0);
    frames.advance(20.0);
    assert_eq!(el2.history("left").last().map(String::as_str), Some("50px"));
    assert!(a.is_animating());
    assert!(!b.is_animating());

    a.stop(true);
    assert_eq!(b.queue_len(), 0);
    assert!(el1.history("left").iter().all(|v| v != "100px"));
}

#[test]
fn dropped_elements_release_their_entry() {
    let frames = Rc::new(ManualFrames::new());
    let built = Rc::new(Cell::new(0));
    let reg = registry(&frames, &built);
    let keep = Rc::new(MemoryStyle::new());
    let gone = Rc::new(MemoryStyle::new());

    let _ = reg.take(&keep);
    let _ = reg.take(&gone);
    assert_eq!(reg.len(), 2);

    drop(gone);
    assert_eq!(reg.len(), 1);

    let fresh = Rc::new(MemoryStyle::new());
    let _ = reg.take(&fresh);
    assert_eq!(reg.len(), 2);
    assert_eq!(built.get(), 3);
}

#[test]
fn registry_hands_its_config_to_new_animators() {
    let frames = Rc::new(ManualFrames::new());
    let cfg = Config {
        length_unit: "pt".into(),
        ..Config::default()
    };
    let f = frames.clone();
    let reg: Registry<MemoryStyle> = Registry::new(cfg, move |_| f.clone() as Rc<dyn TimingSource>);
    let el = Rc::new(MemoryStyle::new());
    reg.take(&el).animate_to([("left", 12)], 0.0);
    assert_eq!(el.get("left").as_deref(), Some("12pt"));
    assert_eq!(reg.config().length_unit, "pt");
}
