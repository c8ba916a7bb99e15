#![cfg(target_arch = "wasm32")]
use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

use vizij_tween_core::EasingSpec;
use vizij_tween_wasm::{abi_version, configure, easing_from_js, take};

wasm_bindgen_test_configure!(run_in_browser);

fn mk_element() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn props(json: &str) -> JsValue {
    JSON::parse(json).unwrap()
}

/// Call a method on the animator object the way JS callers do.
fn call(animator: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = Reflect::get(animator, &method.into())?.dyn_into()?;
    let args: Array = args.iter().collect();
    f.apply(animator, &args)
}

fn getter(animator: &JsValue, name: &str) -> JsValue {
    Reflect::get(animator, &name.into()).unwrap()
}

fn inline(el: &HtmlElement, name: &str) -> String {
    el.style().get_property_value(name).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn take_returns_the_same_object_per_element() {
    let a = mk_element();
    let b = mk_element();
    let first = take(a.clone()).unwrap();
    let again = take(a.clone()).unwrap();
    let other = take(b).unwrap();
    assert!(Object::is(&first, &again));
    assert!(!Object::is(&first, &other));
}

#[wasm_bindgen_test]
fn zero_duration_applies_synchronously_and_fires_callback() {
    let el = mk_element();
    let animator = take(el.clone()).unwrap();
    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    let cb = Closure::once_into_js(move || f.set(true));

    call(
        &animator,
        "animate",
        &[props(r#"{ "opacity": 0.5 }"#), 0.into(), JsValue::UNDEFINED, cb],
    )
    .unwrap();

    assert_eq!(inline(&el, "opacity"), "0.5");
    assert!(fired.get());
    assert_eq!(getter(&animator, "isAnimating"), JsValue::FALSE);
}

#[wasm_bindgen_test]
fn finish_flushes_queue_without_callbacks() {
    let el = mk_element();
    let animator = take(el.clone()).unwrap();
    let fired = Rc::new(Cell::new(0));
    let (f1, f2) = (fired.clone(), fired.clone());
    let cb1 = Closure::once_into_js(move || f1.set(f1.get() + 1));
    let cb2 = Closure::once_into_js(move || f2.set(f2.get() + 1));

    call(&animator, "animate", &[props(r#"{ "margin-left": "40px" }"#), 1000.into(), "linear".into(), cb1]).unwrap();
    call(&animator, "animate", &[props(r#"{ "margin-left": 80, "opacity": "0.2" }"#), 1000.into(), JsValue::UNDEFINED, cb2]).unwrap();
    assert_eq!(getter(&animator, "queueLength"), JsValue::from(2));

    call(&animator, "finish", &[]).unwrap();
    assert_eq!(inline(&el, "margin-left"), "80px");
    assert_eq!(inline(&el, "opacity"), "0.2");
    assert_eq!(getter(&animator, "queueLength"), JsValue::from(0));
    assert_eq!(fired.get(), 0);
}

#[wasm_bindgen_test]
fn stop_with_clear_empties_the_queue() {
    let el = mk_element();
    let animator = take(el).unwrap();
    for _ in 0..3 {
        call(&animator, "animate", &[props(r#"{ "left": 100 }"#), 500.into()]).unwrap();
    }
    call(&animator, "stop", &[JsValue::FALSE]).unwrap();
    assert_eq!(getter(&animator, "queueLength"), JsValue::from(2));
    call(&animator, "stop", &[JsValue::TRUE]).unwrap();
    assert_eq!(getter(&animator, "queueLength"), JsValue::from(0));
}

#[wasm_bindgen_test]
fn non_object_properties_are_rejected() {
    let animator = take(mk_element()).unwrap();
    assert!(call(&animator, "animate", &[props("[1, 2]"), 0.into()]).is_err());
    assert!(call(&animator, "animate", &[props(r#"{ "left": true }"#), 0.into()]).is_err());
}

#[wasm_bindgen_test]
fn configure_rejects_garbage_and_accepts_defaults() {
    assert!(configure(JsValue::UNDEFINED).is_ok());
    assert!(configure(props(r#"{ "force_timer": "yes" }"#)).is_err());
    assert!(configure(props(r#"{ "force_timer": false }"#)).is_ok());
}

#[wasm_bindgen_test]
fn chained_calls_return_the_registered_object() {
    let el = mk_element();
    let animator = take(el.clone()).unwrap();
    let chained = call(&animator, "animate", &[props(r#"{ "left": 10 }"#), 500.into()]).unwrap();
    assert!(Object::is(&chained, &animator));
    let stopped = call(&chained, "stop", &[JsValue::TRUE]).unwrap();
    assert!(Object::is(&stopped, &animator));
    let finished = call(&stopped, "finish", &[]).unwrap();
    assert!(Object::is(&finished, &animator));
}

#[wasm_bindgen_test]
fn js_easing_functions_are_called_with_four_numbers() {
    let f = Function::new_with_args("t, b, c, d", "return b + c * t / d;");
    let easing = easing_from_js(f.into()).resolve();
    assert_eq!(easing.apply(50.0, 10.0, 100.0, 100.0), 60.0);

    let throws = Function::new_with_args("t, b, c, d", "throw new Error('nope');");
    let easing = easing_from_js(throws.into()).resolve();
    assert_eq!(easing.apply(50.0, 10.0, 100.0, 100.0), 110.0);

    assert!(matches!(easing_from_js("linear".into()), EasingSpec::Named(ref n) if n == "linear"));
    assert!(matches!(easing_from_js(42.into()), EasingSpec::Default));
    assert!(matches!(easing_from_js(JsValue::UNDEFINED), EasingSpec::Default));
}

#[wasm_bindgen_test]
fn hyphenated_names_with_a_unit_change_convert_and_restore() {
    let el = mk_element();
    el.style().set_property("margin-left", "32px").unwrap();
    let animator = take(el.clone()).unwrap();
    let easing = Function::new_with_args("t, b, c, d", "return b + c * t / d;");

    call(
        &animator,
        "animate",
        &[props(r#"{ "margin-left": "4em" }"#), 1000.into(), easing.into()],
    )
    .unwrap();
    // The conversion write is undone before the first frame.
    assert_eq!(inline(&el, "margin-left"), "32px");
    assert_eq!(getter(&animator, "isAnimating"), JsValue::TRUE);

    call(&animator, "finish", &[]).unwrap();
    assert_eq!(inline(&el, "margin-left"), "4em");
}
