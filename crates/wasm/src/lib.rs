#![cfg(target_arch = "wasm32")]
#![deny(unsafe_code)]
//! Browser host: mounts a pointer field onto a `<canvas>`.
//!
//! [`mount`] wires the canvas, window, document and reduced-motion media
//! query to the field and starts a `requestAnimationFrame` loop. The
//! lifecycle itself is `pointer_field_core::lifecycle::Mount`; this crate
//! only adapts the DOM to it, so unmounting (or dropping the returned
//! [`FieldHandle`]) leaves nothing attached.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::DVec2;
use pointer_field_core::lifecycle::{with_mounted, SharedMount};
use pointer_field_core::params::param_u64;
use pointer_field_core::{
    Engine, FieldError, FrameScheduler, InputEvent, ListenerTarget, Mount, Painter, Srgb, Surface,
};
use pointer_field_engines::FieldKind;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

const DEFAULT_SEED: u64 = 0x5EED;
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Canvas2D implementation of [`Painter`] in logical coordinates.
struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
    surface: Surface,
}

impl Painter for CanvasPainter {
    fn clear(&mut self, color: Srgb) {
        let s = self.surface.scale();
        if let Err(e) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log::error!("set_transform error: {:?}", e);
        }
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx
            .fill_rect(0.0, 0.0, self.surface.width(), self.surface.height());
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }
}

/// `requestAnimationFrame` driven by the shared frame closure.
struct RafScheduler {
    window: web::Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request(&mut self) -> Option<i32> {
        let slot = self.callback.borrow();
        let callback = slot.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::error!("cancel_animation_frame error: {:?}", e);
        }
    }
}

/// DOM side of [`ListenerTarget`].
struct DomTarget(web::EventTarget);

impl ListenerTarget for DomTarget {
    type Callback = Closure<dyn FnMut(web::Event)>;
    type Error = JsValue;

    fn add_listener(&self, kind: &'static str, callback: &Self::Callback) -> Result<(), JsValue> {
        self.0
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
    }

    fn remove_listener(&self, kind: &'static str, callback: &Self::Callback) {
        if let Err(e) = self
            .0
            .remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        {
            log::error!("remove {kind} listener error: {:?}", e);
        }
    }
}

type HostMount = Mount<FieldKind, CanvasPainter, RafScheduler, DomTarget>;
type SharedState = SharedMount<FieldKind, CanvasPainter, RafScheduler>;

fn js_error(e: FieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn measure(canvas: &web::HtmlCanvasElement, window: &web::Window) -> Surface {
    Surface::new(
        canvas.client_width() as f64,
        canvas.client_height() as f64,
        window.device_pixel_ratio(),
    )
}

fn apply_size(canvas: &web::HtmlCanvasElement, surface: &Surface) {
    canvas.set_width(surface.pixel_width());
    canvas.set_height(surface.pixel_height());
}

/// A mounted field. Dropping it unmounts.
#[wasm_bindgen]
pub struct FieldHandle {
    mount: HostMount,
    frame_callback: FrameCallback,
}

impl FieldHandle {
    fn listen(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        self.mount.listen(DomTarget(target.clone()), kind, callback)
    }
}

#[wasm_bindgen]
impl FieldHandle {
    /// Stops the loop, cancels the pending frame and detaches every listener.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        let name = self.mount.with(|m| m.engine.name());
        if self.mount.unmount() {
            log::info!("unmounted {} field", name.unwrap_or("unknown"));
        }
        self.frame_callback.borrow_mut().take();
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.mount.with(|m| m.engine.particle_count()).unwrap_or(0)
    }

    /// Current parameters as a JSON string, or `"null"` once unmounted.
    pub fn params(&self) -> String {
        self.mount
            .with(|m| m.engine.params().to_string())
            .unwrap_or_else(|| "null".to_string())
    }
}

impl Drop for FieldHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mounts `field` ("grid" or "sparks") onto `canvas`.
///
/// Returns `Ok(None)` without scheduling anything when the host has no
/// window or the canvas has no 2D context. Errors only for unknown field
/// names, malformed params, or listener registration failures.
#[wasm_bindgen]
pub fn mount(
    canvas: web::HtmlCanvasElement,
    field: &str,
    params: &str,
) -> Result<Option<FieldHandle>, JsValue> {
    let Some(window) = web::window() else {
        log::warn!("no window; {field} field not mounted");
        return Ok(None);
    };
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => ctx.dyn_into::<web::CanvasRenderingContext2d>().map_err(|_| {
            js_error(FieldError::SurfaceUnavailable(
                "2d context is not a CanvasRenderingContext2D".into(),
            ))
        })?,
        _ => {
            log::warn!("no 2d context; {field} field not mounted");
            return Ok(None);
        }
    };
    let document = window.document();

    let params: serde_json::Value = serde_json::from_str(if params.is_empty() { "{}" } else { params })
        .map_err(|e| {
            js_error(FieldError::InvalidParam {
                name: "params".into(),
                reason: e.to_string(),
            })
        })?;
    let seed = param_u64(&params, "seed", DEFAULT_SEED);

    let surface = measure(&canvas, &window);
    apply_size(&canvas, &surface);
    let mut kind = FieldKind::from_name(field, surface, seed, &params).map_err(js_error)?;

    let motion_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
    if let Some(query) = &motion_query {
        kind.handle(&InputEvent::ReducedMotion(query.matches()));
    }

    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    let scheduler = RafScheduler {
        window: window.clone(),
        callback: Rc::clone(&frame_callback),
    };
    // From here on, an early return drops the handle, which unmounts.
    let mut handle = FieldHandle {
        mount: Mount::new(kind, CanvasPainter { ctx, surface }, scheduler),
        frame_callback,
    };
    let state: SharedState = handle.mount.state();

    {
        let state = Rc::clone(&state);
        *handle.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            with_mounted(&state, |m| m.on_frame(timestamp));
        }) as Box<dyn FnMut(f64)>));
    }

    // Moves are tracked window-wide so the pointer is seen leaving the canvas
    // even when it exits faster than a canvas event fires.
    {
        let state = Rc::clone(&state);
        let canvas = canvas.clone();
        handle.listen(&window, "pointermove", move |event| {
            let Some(mouse) = event.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let p = DVec2::new(
                mouse.client_x() as f64 - rect.left(),
                mouse.client_y() as f64 - rect.top(),
            );
            let inside = p.x >= 0.0 && p.y >= 0.0 && p.x <= rect.width() && p.y <= rect.height();
            let event = if inside {
                InputEvent::pointer_move(p)
            } else {
                InputEvent::PointerLeave
            };
            with_mounted(&state, |m| m.engine.handle(&event));
        })?;
    }
    {
        let state = Rc::clone(&state);
        handle.listen(&canvas, "pointerleave", move |_| {
            with_mounted(&state, |m| m.engine.handle(&InputEvent::PointerLeave));
        })?;
    }
    {
        let state = Rc::clone(&state);
        handle.listen(&canvas, "pointerenter", move |_| {
            with_mounted(&state, |m| m.engine.handle(&InputEvent::PointerEnter));
        })?;
    }
    {
        let state = Rc::clone(&state);
        let canvas = canvas.clone();
        let win = window.clone();
        handle.listen(&window, "resize", move |_| {
            let surface = measure(&canvas, &win);
            apply_size(&canvas, &surface);
            with_mounted(&state, |m| {
                m.painter.surface = surface;
                m.engine.handle(&InputEvent::Resize {
                    width: surface.width(),
                    height: surface.height(),
                    scale: surface.scale(),
                });
            });
        })?;
    }
    if let Some(document) = &document {
        let state = Rc::clone(&state);
        let doc = document.clone();
        handle.listen(document, "visibilitychange", move |_| {
            let visible = !doc.hidden();
            with_mounted(&state, |m| {
                m.engine.handle(&InputEvent::Visibility(visible));
                m.frames.set_visible(visible);
            });
        })?;
    }
    if let Some(query) = &motion_query {
        let state = Rc::clone(&state);
        let q = query.clone();
        handle.listen(query, "change", move |_| {
            let reduce = q.matches();
            with_mounted(&state, |m| m.engine.handle(&InputEvent::ReducedMotion(reduce)));
        })?;
    }

    let hidden = document.as_ref().is_some_and(|d| d.hidden());
    handle.mount.start(!hidden);
    handle.mount.with(|m| {
        log::info!(
            "mounted {} field ({} particles, {}x{} @{})",
            m.engine.name(),
            m.engine.particle_count(),
            surface.width(),
            surface.height(),
            surface.scale()
        );
    });

    Ok(Some(handle))
}
