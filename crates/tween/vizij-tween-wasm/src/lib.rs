//! wasm-bindgen surface for Vizij tweens.
//!
//! `take(element)` returns the element's animator, creating it on first use.
//! The element -> animator association lives in a JS `WeakMap`; animators
//! reach their element only through a `WeakRef`, so neither side keeps the
//! element alive. `animate`/`stop`/`finish` return that same registered
//! object, so chaining never allocates new wrappers.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, WeakMap};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use vizij_tween_core::units::properties_from_json;
use vizij_tween_core::{Animator, Config, EasingSpec};

mod element;
mod frames;

pub use element::ElementStyle;
pub use frames::BrowserFrames;

struct Registry {
    cfg: Config,
    animators: WeakMap,
}

thread_local! {
    static REGISTRY: RefCell<Option<Registry>> = const { RefCell::new(None) };
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|cell| {
        let mut slot = cell.borrow_mut();
        let reg = slot.get_or_insert_with(|| Registry {
            cfg: Config::default(),
            animators: WeakMap::new(),
        });
        f(reg)
    })
}

/// Map a JS easing argument: a name, a `(elapsed, start, delta, duration)`
/// function, or anything else for the default.
pub fn easing_from_js(easing: JsValue) -> EasingSpec {
    if let Some(name) = easing.as_string() {
        return EasingSpec::Named(name);
    }
    match easing.dyn_into::<Function>() {
        Ok(f) => EasingSpec::custom(move |t, b, c, d| {
            let args = Array::of4(&t.into(), &b.into(), &c.into(), &d.into());
            match f.apply(&JsValue::UNDEFINED, &args) {
                Ok(v) => v.as_f64().unwrap_or(b),
                Err(e) => {
                    log::debug!("custom easing threw: {e:?}");
                    b + c
                }
            }
        }),
        Err(_) => EasingSpec::Default,
    }
}

/// Animation controller bound to one element.
#[wasm_bindgen]
pub struct TweenAnimator {
    core: Animator,
    // Keeps the style target alive; the core animator only holds it weakly.
    // The target itself holds the element through a `WeakRef`.
    style: Rc<ElementStyle>,
}

#[wasm_bindgen]
impl TweenAnimator {
    /// Queue an animation.
    ///   animator.animate({ left: 100, "margin-top": "2em" }, 400, "linear", () => {})
    /// `easing` may be a name, a `(elapsed, start, delta, duration) => value`
    /// function, or undefined.
    #[wasm_bindgen]
    pub fn animate(
        &self,
        properties: JsValue,
        duration_ms: Option<f64>,
        easing: JsValue,
        on_complete: Option<Function>,
    ) -> Result<JsValue, JsError> {
        let json: serde_json::Value = swb::from_value(properties)
            .map_err(|e| JsError::new(&format!("animate properties error: {e}")))?;
        let props = properties_from_json(json)
            .map_err(|e| JsError::new(&format!("animate properties error: {e}")))?;
        let easing = easing_from_js(easing);
        let duration_ms = duration_ms.unwrap_or(0.0);
        match on_complete {
            Some(f) => self.core.animate(props, duration_ms, easing, move || {
                if let Err(e) = f.call0(&JsValue::UNDEFINED) {
                    log::debug!("onComplete threw: {e:?}");
                }
            }),
            None => self.core.animate(props, duration_ms, easing, || {}),
        };
        Ok(self.registered())
    }

    /// Cancel the current frame and drop the running job (or every job).
    #[wasm_bindgen]
    pub fn stop(&self, clear_queue: Option<bool>) -> JsValue {
        self.core.stop(clear_queue.unwrap_or(false));
        self.registered()
    }

    /// Jump every queued job to its destination and empty the queue.
    #[wasm_bindgen]
    pub fn finish(&self) -> JsValue {
        self.core.finish();
        self.registered()
    }

    #[wasm_bindgen(getter, js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.core.is_animating()
    }

    #[wasm_bindgen(getter, js_name = queueLength)]
    pub fn queue_len(&self) -> usize {
        self.core.queue_len()
    }
}

impl TweenAnimator {
    /// The object `take` handed out for this element, for chaining.
    /// `undefined` once the element has been collected.
    fn registered(&self) -> JsValue {
        match self.style.element() {
            Some(element) => {
                let key: &Object = element.as_ref();
                with_registry(|reg| reg.animators.get(key))
            }
            None => JsValue::UNDEFINED,
        }
    }
}

/// Set the configuration used by animators created from now on. Pass a JSON
/// object or undefined/null for defaults.
///   configure({ force_timer: true })
#[wasm_bindgen]
pub fn configure(config: JsValue) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
        Config::default()
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
    };
    with_registry(|reg| reg.cfg = cfg);
    Ok(())
}

/// The animator for `element`; the same object is returned on every call.
#[wasm_bindgen]
pub fn take(element: HtmlElement) -> Result<JsValue, JsError> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or_else(|| JsError::new("take: no window"))?;
    with_registry(|reg| {
        let key: &Object = element.as_ref();
        let existing = reg.animators.get(key);
        if !jsvalue_is_undefined_or_null(&existing) {
            return Ok(existing);
        }
        let timing = Rc::new(BrowserFrames::detect(window.clone(), &reg.cfg));
        let style = Rc::new(ElementStyle::new(window, &element));
        let animator = TweenAnimator {
            core: Animator::new(&style, timing, &reg.cfg),
            style,
        };
        let value = JsValue::from(animator);
        reg.animators.set(key, &value);
        Ok(value)
    })
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
