//! Style target over a DOM element: computed-style reads, inline-style writes,
//! and scroll offsets routed to the element itself.
//!
//! The element is held through a JS `WeakRef`, so an animator never keeps its
//! element alive. Once the element is collected reads come back empty and
//! writes are dropped.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use vizij_tween_core::units::{css_name, is_element_property, split_numeric};
use vizij_tween_core::StyleTarget;

#[wasm_bindgen]
extern "C" {
    type WeakRef;

    #[wasm_bindgen(constructor)]
    fn new(target: &JsValue) -> WeakRef;

    /// The referent, or `undefined` once it has been collected.
    #[wasm_bindgen(method, js_name = deref)]
    fn target(this: &WeakRef) -> JsValue;
}

pub struct ElementStyle {
    window: Window,
    element: WeakRef,
}

impl ElementStyle {
    pub fn new(window: Window, element: &HtmlElement) -> Self {
        Self {
            window,
            element: WeakRef::new(element),
        }
    }

    /// The element, if it is still alive.
    pub fn element(&self) -> Option<HtmlElement> {
        self.element.target().dyn_into::<HtmlElement>().ok()
    }
}

impl StyleTarget for ElementStyle {
    fn read(&self, name: &str) -> String {
        let Some(element) = self.element() else {
            return String::new();
        };
        match name {
            "scrollTop" => return element.scroll_top().to_string(),
            "scrollLeft" => return element.scroll_left().to_string(),
            _ => {}
        }
        match self.window.get_computed_style(&element) {
            Ok(Some(decl)) => decl.get_property_value(&css_name(name)).unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn write(&self, name: &str, value: &str) {
        let Some(element) = self.element() else {
            return;
        };
        if is_element_property(name) {
            let (v, _) = split_numeric(value);
            match name {
                "scrollTop" => element.set_scroll_top(v.round() as i32),
                _ => element.set_scroll_left(v.round() as i32),
            }
            return;
        }
        if let Err(e) = element.style().set_property(&css_name(name), value) {
            log::debug!("style write {name}={value} failed: {e:?}");
        }
    }
}
