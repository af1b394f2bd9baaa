//! Leptos component wrapping the particle field canvas.
//!
//! The component creates an HTML canvas element sized to the viewport and
//! runs the animation loop via `requestAnimationFrame`. A window `resize`
//! listener feeds the debounced regeneration, and a `visibilitychange`
//! listener suspends the loop while the tab is hidden. Everything detaches
//! on cleanup; a late frame or resize callback after that is a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use super::rng::JsRandom;
use super::state::FieldRenderer;
use super::theme::FieldConfig;

/// Renderer plus frame-scheduling accounting for one canvas instance.
struct FieldContext {
	renderer: FieldRenderer<JsRandom>,
	/// Handle of the outstanding `requestAnimationFrame`, if any.
	frame_handle: Option<i32>,
}

type SharedContext = Rc<RefCell<Option<FieldContext>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Monotonic timestamp in milliseconds for debounce bookkeeping.
fn now_ms(window: &Window) -> f64 {
	window
		.performance()
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}

fn viewport_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(0.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(0.0),
	)
}

/// Request the next animation frame unless one is already outstanding or the
/// renderer stopped scheduling.
fn request_frame(context: &SharedContext, animate: &SharedClosure) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(ref mut c) = *context.borrow_mut() {
		if c.frame_handle.is_some() || !c.renderer.is_active() {
			return;
		}
		if let Some(ref cb) = *animate.borrow() {
			if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				c.frame_handle = Some(handle);
			}
		}
	}
}

/// Renders the ambient particle field on a canvas element.
///
/// Fullscreen by default: the canvas tracks the viewport and regenerates its
/// population after resizes settle. Pass explicit `width`/`height` with
/// `fullscreen = false` to embed a fixed-size field instead.
#[component]
pub fn ParticleFieldCanvas(
	#[prop(optional)] config: FieldConfig,
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_style = format!(
		"position: fixed; inset: 0; pointer-events: none; z-index: 0; opacity: {};",
		config.canvas_opacity
	);

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let visibility_cb: SharedClosure = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init, visibility_cb_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		visibility_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// A purely cosmetic layer: if the 2d context is unavailable the
		// effect stays dark and the rest of the page is untouched.
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(obj)) => match obj.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("particle-field: unexpected 2d context type, effect disabled");
					return;
				}
			},
			_ => {
				warn!("particle-field: 2d context unavailable, effect disabled");
				return;
			}
		};

		let mut renderer = FieldRenderer::new(config.clone(), JsRandom);
		renderer.initialize(w, h);
		if window.document().is_some_and(|d| d.hidden()) {
			renderer.suspend();
		}
		*context_init.borrow_mut() = Some(FieldContext {
			renderer,
			frame_handle: None,
		});

		if fullscreen {
			let context_resize = context_init.clone();
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.renderer.on_resize(nw, nh, now_ms(&win));
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_vis, animate_vis) = (context_init.clone(), animate_init.clone());
		*visibility_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(document) = web_sys::window().and_then(|w| w.document()) else {
				return;
			};
			let mut resumed = false;
			if let Some(ref mut c) = *context_vis.borrow_mut() {
				if document.hidden() {
					c.renderer.suspend();
				} else {
					resumed = c.renderer.resume();
				}
			}
			// Restart the loop only on a real Suspended -> Active edge;
			// request_frame ignores a still-outstanding frame.
			if resumed {
				request_frame(&context_vis, &animate_vis);
			}
		}));
		if let Some(document) = window.document() {
			if let Some(ref cb) = *visibility_cb_init.borrow() {
				let _ = document.add_event_listener_with_callback(
					"visibilitychange",
					cb.as_ref().unchecked_ref(),
				);
			}
		}

		let (context_anim, animate_inner, canvas_anim) =
			(context_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut schedule = false;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.frame_handle = None;
				if c.renderer.is_active() {
					if let Some(win) = web_sys::window() {
						// Debounced resize settles between frames
						if let Some((nw, nh)) = c.renderer.poll_resize(now_ms(&win)) {
							canvas_anim.set_width(nw as u32);
							canvas_anim.set_height(nh as u32);
						}
					}
					c.renderer.advance();
					render::draw(c.renderer.field(), &ctx, c.renderer.config());
					schedule = true;
				}
			}
			if schedule {
				request_frame(&context_anim, &animate_inner);
			}
		}));
		request_frame(&context_init, &animate_init);
	});

	let (context_cleanup, animate_cleanup, resize_cleanup, visibility_cleanup) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		visibility_cb.clone(),
	);
	// The captured Rc handles are !Send, but CSR runs single-threaded;
	// SendWrapper satisfies on_cleanup's Send + Sync bounds.
	let cleanup = leptos::__reexports::send_wrapper::SendWrapper::new(move || {
		let window = web_sys::window();
		if let Some(ref mut c) = *context_cleanup.borrow_mut() {
			c.renderer.teardown();
			if let (Some(w), Some(handle)) = (window.as_ref(), c.frame_handle.take()) {
				w.cancel_animation_frame(handle).ok();
			}
		}
		if let (Some(w), Some(cb)) = (window.as_ref(), resize_cleanup.borrow_mut().take()) {
			let _ = w.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if let (Some(d), Some(cb)) = (
			window.as_ref().and_then(|w| w.document()),
			visibility_cleanup.borrow_mut().take(),
		) {
			let _ = d.remove_event_listener_with_callback(
				"visibilitychange",
				cb.as_ref().unchecked_ref(),
			);
		}
		// Safe to drop now that the pending frame, if any, was cancelled
		animate_cleanup.borrow_mut().take();
	});
	on_cleanup(move || cleanup.take()());

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			style=canvas_style
		/>
	}
}
