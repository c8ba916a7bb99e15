//! Browser timing source: `requestAnimationFrame` (or a vendor-prefixed
//! variant) with a `setTimeout` fallback.

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use vizij_tween_core::{detect_timing, Config, FrameHandle, TimingKind, TimingSource};

enum Backend {
    Frame { request: Function, cancel: Function },
    Timer { delay_ms: i32 },
}

pub struct BrowserFrames {
    window: Window,
    backend: Backend,
}

fn window_fn(window: &Window, name: &str) -> Option<Function> {
    Reflect::get(window, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

impl BrowserFrames {
    /// Inspect the window once and fix the backend for this timing source.
    pub fn detect(window: Window, cfg: &Config) -> Self {
        let timer = Backend::Timer {
            delay_ms: cfg.fallback_delay_ms,
        };
        if cfg.force_timer {
            return Self {
                window,
                backend: timer,
            };
        }
        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let kind = detect_timing(|name| window_fn(&window, name).is_some(), &user_agent);
        let backend = match kind {
            TimingKind::AnimationFrame { request, cancel } => {
                match (window_fn(&window, request), window_fn(&window, cancel)) {
                    (Some(request), Some(cancel)) => Backend::Frame { request, cancel },
                    _ => timer,
                }
            }
            TimingKind::Timer => timer,
        };
        Self { window, backend }
    }

    fn set_timeout(&self, callback: &JsValue, delay_ms: i32) -> FrameHandle {
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms,
            )
            .unwrap_or_else(|e| {
                log::warn!("setTimeout failed: {e:?}");
                0
            });
        FrameHandle(id as u32 as u64)
    }
}

impl TimingSource for BrowserFrames {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let js_cb = Closure::once_into_js(move || callback());
        match &self.backend {
            Backend::Frame { request, .. } => match request.call1(&self.window, &js_cb) {
                Ok(id) => FrameHandle(id.as_f64().unwrap_or(0.0) as u32 as u64),
                Err(e) => {
                    log::warn!("frame request failed, using timer: {e:?}");
                    self.set_timeout(&js_cb, 0)
                }
            },
            Backend::Timer { delay_ms } => self.set_timeout(&js_cb, *delay_ms),
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        let id = handle.0 as u32 as i32;
        match &self.backend {
            Backend::Frame { cancel, .. } => {
                if let Err(e) = cancel.call1(&self.window, &JsValue::from(id)) {
                    log::debug!("frame cancel failed: {e:?}");
                }
            }
            Backend::Timer { .. } => self.window.clear_timeout_with_handle(id),
        }
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
