use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, DragEvent, Event, EventTarget, HtmlCanvasElement, HtmlElement,
	MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::config::CanvasConfig;
use super::drag::{MOUSE_POINTER, PointerId};
use super::error::CanvasError;
use super::render::{self, ImageCache};
use super::scrollbar::{Axis, ScrollbarOverlay, is_touch_device};
use super::state::{BubbleCanvasState, CanvasEvent};
use super::types::{CanvasItem, DRAG_PAYLOAD_TYPE};

type Shared = Rc<RefCell<Option<BubbleCanvasState>>>;

/// Item plus the logical position it was reported at.
pub type PlacedItem = (CanvasItem, (f64, f64));

#[derive(Clone, Copy, Default)]
struct Callbacks {
	moved_across_boundary: Option<Callback<PlacedItem>>,
	dropped_on_canvas: Option<Callback<PlacedItem>>,
	position_persist: Option<Callback<PlacedItem>>,
	open_external_link: Option<Callback<String>>,
}

impl Callbacks {
	/// Must be called with the state borrow released: hosts react by
	/// handing the canvas new data.
	fn dispatch(&self, events: Vec<CanvasEvent>) {
		for event in events {
			match event {
				CanvasEvent::ItemMovedAcrossBoundary { item, x, y } => {
					if let Some(cb) = self.moved_across_boundary {
						cb.run((item, (x, y)));
					}
				}
				CanvasEvent::ItemDroppedOnCanvas { item, x, y } => {
					if let Some(cb) = self.dropped_on_canvas {
						cb.run((item, (x, y)));
					}
				}
				CanvasEvent::PositionPersist { item, x, y } => {
					if let Some(cb) = self.position_persist {
						cb.run((item, (x, y)));
					}
				}
				CanvasEvent::OpenExternalLink(url) => match self.open_external_link {
					Some(cb) => cb.run(url),
					None => open_in_new_tab(&url),
				},
			}
		}
	}
}

fn open_in_new_tab(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.open_with_url_and_target(url, "_blank") {
		warn!("could not open {url}: {}", CanvasError::from(err));
	}
}

#[derive(Clone, Copy)]
struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

impl Sizing {
	fn measure(&self, window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
		let inner = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		if self.fullscreen {
			return (
				inner(window.inner_width(), 800.0),
				inner(window.inner_height(), 600.0),
			);
		}
		let parent = canvas.parent_element();
		(
			self.width.unwrap_or_else(|| {
				parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)
			}),
			self.height.unwrap_or_else(|| {
				parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)
			}),
		)
	}
}

/// An event listener that detaches itself when dropped.
struct Listener {
	target: EventTarget,
	kind: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach<E: JsCast + 'static>(
		target: &EventTarget,
		kind: &'static str,
		mut handler: impl FnMut(E) + 'static,
	) -> Result<Self, CanvasError> {
		let closure =
			Closure::<dyn FnMut(Event)>::new(move |ev: Event| handler(ev.unchecked_into::<E>()));
		target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			kind,
			closure,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
	}
}

/// requestAnimationFrame loop; cancelled on [`FrameLoop::stop`] or drop.
struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	handle: Rc<Cell<Option<i32>>>,
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

impl FrameLoop {
	fn start(mut step: impl FnMut() + 'static) -> Self {
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let (callback_inner, handle_inner) = (callback.clone(), handle.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			handle_inner.set(None);
			step();
			if let Some(ref cb) = *callback_inner.borrow() {
				handle_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			handle.set(request_frame(cb));
		}
		Self { callback, handle }
	}

	fn stop(&self) {
		if let Some(id) = self.handle.take()
			&& let Some(window) = web_sys::window()
		{
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Everything a mounted canvas owns outside the reactive graph.
struct CanvasRuntime {
	frame_loop: FrameLoop,
	listeners: Vec<Listener>,
	overlay: Rc<ScrollbarOverlay>,
	shared: Shared,
}

impl CanvasRuntime {
	fn teardown(self) {
		let CanvasRuntime {
			frame_loop,
			listeners,
			overlay,
			shared,
		} = self;
		frame_loop.stop();
		drop(listeners);
		drop(overlay);
		if let Some(ref mut s) = *shared.borrow_mut() {
			s.sim.stop();
		}
		info!("bubble canvas torn down");
	}
}

/// What every event handler needs; cloned into each closure.
#[derive(Clone)]
struct Wiring {
	shared: Shared,
	canvas: HtmlCanvasElement,
	overlay: Rc<ScrollbarOverlay>,
	callbacks: Callbacks,
}

impl Wiring {
	/// Runs `f` against the state, then repaints the scrollbars and cursor
	/// from whatever it left behind. The borrow ends before returning.
	fn with_state<R>(&self, f: impl FnOnce(&mut BubbleCanvasState) -> R) -> Option<R> {
		let mut guard = self.shared.borrow_mut();
		let s = guard.as_mut()?;
		let out = f(s);
		self.overlay.apply(&s.scrollbars());
		let _ = HtmlElement::style(&self.canvas).set_property("cursor", s.cursor().css());
		Some(out)
	}

	/// Keeps the scrollbar overlay on top of the canvas' client box.
	fn fit_overlay(&self) {
		let rect = self.canvas.get_bounding_client_rect();
		self.overlay.place(rect.left(), rect.top(), rect.width(), rect.height());
	}

	fn point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(client_x as f64 - rect.left(), client_y as f64 - rect.top())
	}

	fn emit(&self, events: Option<Vec<CanvasEvent>>) {
		if let Some(events) = events {
			self.callbacks.dispatch(events);
		}
	}

	fn changed_touches(&self, ev: &TouchEvent) -> Vec<(PointerId, f64, f64)> {
		let list = ev.changed_touches();
		(0..list.length())
			.filter_map(|i| list.get(i))
			.map(|t| {
				let (x, y) = self.point(t.client_x(), t.client_y());
				(t.identifier(), x, y)
			})
			.collect()
	}
}

fn thumb_coordinate(axis: Axis, ev: &MouseEvent) -> f64 {
	match axis {
		Axis::Horizontal => ev.client_x() as f64,
		Axis::Vertical => ev.client_y() as f64,
	}
}

fn mount(
	canvas: HtmlCanvasElement,
	shared: &Shared,
	items: &[CanvasItem],
	config: CanvasConfig,
	sizing: Sizing,
	callbacks: Callbacks,
) -> Result<CanvasRuntime, CanvasError> {
	let window = web_sys::window().ok_or_else(|| CanvasError::Dom("no window".into()))?;
	let document = window
		.document()
		.ok_or_else(|| CanvasError::Dom("no document".into()))?;

	let (w, h) = sizing.measure(&window, &canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| CanvasError::Dom("2d context unavailable".into()))?
		.dyn_into()
		.map_err(|_| CanvasError::Dom("not a 2d context".into()))?;

	let overlay = Rc::new(ScrollbarOverlay::mount(
		&document,
		&config.scrollbar,
		is_touch_device(&window),
	)?);
	let state = BubbleCanvasState::new(items, w, h, config, js_sys::Date::now() as u64);
	overlay.apply(&state.scrollbars());
	info!("bubble canvas mounted at {w}x{h} with {} nodes", state.sim.len());
	*shared.borrow_mut() = Some(state);

	let wiring = Wiring {
		shared: shared.clone(),
		canvas: canvas.clone(),
		overlay: overlay.clone(),
		callbacks,
	};
	wiring.fit_overlay();
	let win: &EventTarget = window.as_ref();
	let surface: &EventTarget = canvas.as_ref();
	let mut listeners = Vec::new();

	let wr = wiring.clone();
	listeners.push(Listener::attach(win, "resize", move |_: Event| {
		let Some(window) = web_sys::window() else {
			return;
		};
		let (nw, nh) = sizing.measure(&window, &wr.canvas);
		wr.canvas.set_width(nw as u32);
		wr.canvas.set_height(nh as u32);
		wr.fit_overlay();
		wr.with_state(|s| s.resize(nw, nh));
	})?);

	// Moves and releases are tracked on the window so drags survive leaving
	// the canvas.
	let wr = wiring.clone();
	listeners.push(Listener::attach(win, "mousemove", move |ev: MouseEvent| {
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		wr.with_state(|s| match s.thumb_axis() {
			Some(axis) => {
				ev.prevent_default();
				s.thumb_move(thumb_coordinate(axis, &ev));
			}
			None => s.pointer_move(MOUSE_POINTER, x, y),
		});
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(win, "mouseup", move |ev: MouseEvent| {
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		let events = wr.with_state(|s| {
			if let Some(axis) = s.thumb_up() {
				wr.overlay.set_active(axis, false);
			}
			s.pointer_up(MOUSE_POINTER, x, y)
		});
		wr.emit(events);
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "mousedown", move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		ev.prevent_default();
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		wr.with_state(|s| s.pointer_down(MOUSE_POINTER, x, y));
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "mouseleave", move |_: MouseEvent| {
		wr.with_state(|s| s.pointer_leave());
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "dblclick", move |ev: MouseEvent| {
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		let events = wr.with_state(|s| s.double_click(x, y));
		wr.emit(events);
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "wheel", move |ev: WheelEvent| {
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		let consumed = wr.with_state(|s| {
			s.wheel(x, y, ev.delta_x(), ev.delta_y(), ev.ctrl_key(), ev.meta_key())
		});
		if consumed == Some(true) {
			ev.prevent_default();
		}
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "touchstart", move |ev: TouchEvent| {
		ev.prevent_default();
		let touches = wr.changed_touches(&ev);
		wr.with_state(|s| {
			for (id, x, y) in touches {
				s.touch_start(id, x, y);
			}
		});
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "touchmove", move |ev: TouchEvent| {
		ev.prevent_default();
		let touches = wr.changed_touches(&ev);
		wr.with_state(|s| {
			for (id, x, y) in touches {
				s.touch_move(id, x, y);
			}
		});
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "touchend", move |ev: TouchEvent| {
		let touches = wr.changed_touches(&ev);
		let now = js_sys::Date::now();
		let events = wr.with_state(|s| {
			touches
				.into_iter()
				.flat_map(|(id, x, y)| s.touch_end(id, x, y, now))
				.collect::<Vec<_>>()
		});
		wr.emit(events);
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "touchcancel", move |ev: TouchEvent| {
		let touches = wr.changed_touches(&ev);
		let events = wr.with_state(|s| {
			touches
				.into_iter()
				.flat_map(|(id, x, y)| s.touch_cancel(id, x, y))
				.collect::<Vec<_>>()
		});
		wr.emit(events);
	})?);

	listeners.push(Listener::attach(surface, "dragover", |ev: DragEvent| {
		ev.prevent_default();
	})?);

	let wr = wiring.clone();
	listeners.push(Listener::attach(surface, "drop", move |ev: DragEvent| {
		ev.prevent_default();
		let payload = ev
			.data_transfer()
			.and_then(|dt| dt.get_data(DRAG_PAYLOAD_TYPE).ok())
			.unwrap_or_default();
		let (x, y) = wr.point(ev.client_x(), ev.client_y());
		let events = wr.with_state(|s| s.drop_payload(&payload, x, y));
		wr.emit(events);
	})?);

	for axis in [Axis::Horizontal, Axis::Vertical] {
		let wr = wiring.clone();
		let thumb: &EventTarget = overlay.thumb(axis).as_ref();
		listeners.push(Listener::attach(thumb, "mousedown", move |ev: MouseEvent| {
			ev.prevent_default();
			ev.stop_propagation();
			wr.with_state(|s| s.thumb_down(axis, thumb_coordinate(axis, &ev)));
			wr.overlay.set_active(axis, true);
		})?);
	}

	let wr = wiring.clone();
	let bars: &EventTarget = overlay.container().as_ref();
	listeners.push(Listener::attach(bars, "wheel", move |ev: WheelEvent| {
		let consumed = wr.with_state(|s| {
			s.scrollbar_wheel(ev.delta_x(), ev.delta_y(), ev.ctrl_key(), ev.meta_key())
		});
		if consumed == Some(true) {
			ev.prevent_default();
		}
	})?);

	let shared_anim = shared.clone();
	let mut images = ImageCache::default();
	let frame_loop = FrameLoop::start(move || {
		if let Some(ref mut s) = *shared_anim.borrow_mut() {
			s.tick();
			render::render(s, &ctx, &mut images);
		}
	});

	Ok(CanvasRuntime {
		frame_loop,
		listeners,
		overlay,
		shared: shared.clone(),
	})
}

/// Force-directed album and genre canvas.
///
/// `data` holds what is on the canvas; the host owns it and updates it in
/// response to the callbacks. Nodes that survive an update keep their
/// position and motion.
#[component]
pub fn BubbleCanvas(
	#[prop(into)] data: Signal<Vec<CanvasItem>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: CanvasConfig,
	#[prop(optional, into)] on_item_moved_across_boundary: Option<Callback<PlacedItem>>,
	#[prop(optional, into)] on_item_dropped_on_canvas: Option<Callback<PlacedItem>>,
	#[prop(optional, into)] on_position_persist: Option<Callback<PlacedItem>>,
	#[prop(optional, into)] on_open_external_link: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared: Shared = Rc::new(RefCell::new(None));
	let runtime = StoredValue::new_local(None::<CanvasRuntime>);
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};
	let callbacks = Callbacks {
		moved_across_boundary: on_item_moved_across_boundary,
		dropped_on_canvas: on_item_dropped_on_canvas,
		position_persist: on_position_persist,
		open_external_link: on_open_external_link,
	};

	let shared_init = shared.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if shared_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let items = data.get_untracked();
		match mount(canvas, &shared_init, &items, config.clone(), sizing, callbacks) {
			Ok(rt) => runtime.set_value(Some(rt)),
			Err(err) => warn!("bubble canvas failed to mount: {err}"),
		}
	});

	let shared_data = shared.clone();
	Effect::new(move |_| {
		let items = data.get();
		if let Some(ref mut s) = *shared_data.borrow_mut() {
			let summary = s.set_items(&items);
			debug!(
				"canvas data: {} kept, {} added, {} removed",
				summary.kept,
				summary.added,
				summary.removed
			);
		}
	});

	on_cleanup(move || {
		runtime.try_update_value(|rt| {
			if let Some(rt) = rt.take() {
				rt.teardown();
			}
		});
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="bubble-canvas"
			style="display: block; touch-action: none; cursor: default;"
		/>
	}
}
