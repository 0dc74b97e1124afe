use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent, Window,
};

use super::config::NetworkConfig;
use super::error::NetworkError;
use super::render;
use super::state::NetworkState;

type Callback = Closure<dyn FnMut()>;
type Listener = Closure<dyn FnMut(Event)>;

/// Owns the animation state and every browser hook driving it: the frame
/// loop, the arc and pulse intervals, and the window listeners.
///
/// Everything runs on the main thread, so the callbacks share the state
/// through `Rc<RefCell<_>>` and never overlap.
pub struct NetworkRuntime {
	window: Window,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	state: Rc<RefCell<NetworkState>>,
	alive: Rc<Cell<bool>>,
	frame: Rc<RefCell<Option<Callback>>>,
	frame_id: Rc<Cell<Option<i32>>>,
	timers: Vec<(i32, Callback)>,
	listeners: Vec<(&'static str, Listener)>,
}

impl NetworkRuntime {
	/// Validates `config`, sizes `canvas` to the viewport and scatters the
	/// initial node field.
	pub fn new(canvas: HtmlCanvasElement, config: NetworkConfig) -> Result<Self, NetworkError> {
		config.validate()?;
		let window = web_sys::window().ok_or(NetworkError::NoWindow)?;
		let ctx = canvas
			.get_context("2d")?
			.ok_or(NetworkError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| NetworkError::NoContext)?;

		let (w, h) = viewport(&window)?;
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
		let state = NetworkState::new(config, w, h, seed);

		Ok(Self {
			window,
			canvas,
			ctx,
			state: Rc::new(RefCell::new(state)),
			alive: Rc::new(Cell::new(false)),
			frame: Rc::new(RefCell::new(None)),
			frame_id: Rc::new(Cell::new(None)),
			timers: Vec::new(),
			listeners: Vec::new(),
		})
	}

	/// Hooks up input, timers and the frame loop. A second call is a no-op.
	pub fn start(&mut self) -> Result<(), NetworkError> {
		if self.alive.get() {
			return Ok(());
		}
		self.alive.set(true);

		self.listen_pointer()?;
		self.listen_resize()?;

		let (arc_ms, pulse_ms) = {
			let s = self.state.borrow();
			(s.config.arc.interval_ms, s.config.periodic_pulse_interval_ms)
		};
		let state = self.state.clone();
		self.every(arc_ms, move || {
			state.borrow_mut().spawn_energy_arc();
		})?;
		let state = self.state.clone();
		self.every(pulse_ms, move || {
			state.borrow_mut().spawn_periodic_pulse();
		})?;

		self.start_frames()?;
		info!("particle network started");
		Ok(())
	}

	/// Cancels the pending frame, both intervals and every listener.
	/// Safe to call more than once.
	pub fn stop(&mut self) {
		let was_running = self.alive.replace(false);
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// Breaks the frame closure's reference to itself.
		self.frame.borrow_mut().take();
		for (id, _) in self.timers.drain(..) {
			self.window.clear_interval_with_handle(id);
		}
		for (event, cb) in self.listeners.drain(..) {
			let _ = self
				.window
				.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
		if was_running {
			info!("particle network stopped");
		}
	}

	fn start_frames(&mut self) -> Result<(), NetworkError> {
		let (state, alive, ctx, window) = (
			self.state.clone(),
			self.alive.clone(),
			self.ctx.clone(),
			self.window.clone(),
		);
		let (frame, frame_id) = (self.frame.clone(), self.frame_id.clone());

		*self.frame.borrow_mut() = Some(Closure::new(move || {
			// A frame scheduled before stop() may still fire once.
			if !alive.get() {
				return;
			}
			{
				let mut s = state.borrow_mut();
				s.tick();
				if let Err(err) = render::render(&s, &ctx) {
					error!("particle network frame failed: {err:?}");
				}
			}
			if let Some(cb) = frame.borrow().as_ref() {
				match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					Ok(id) => frame_id.set(Some(id)),
					Err(err) => error!("could not schedule next frame: {err:?}"),
				}
			}
		}));

		if let Some(cb) = self.frame.borrow().as_ref() {
			let id = self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.frame_id.set(Some(id));
		}
		Ok(())
	}

	fn every(&mut self, ms: i32, tick: impl FnMut() + 'static) -> Result<(), NetworkError> {
		let cb: Callback = Closure::new(tick);
		let id = self
			.window
			.set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms)?;
		self.timers.push((id, cb));
		Ok(())
	}

	fn listen(
		&mut self,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<(), NetworkError> {
		let cb: Listener = Closure::new(handler);
		self.window
			.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
		self.listeners.push((event, cb));
		Ok(())
	}

	fn listen_pointer(&mut self) -> Result<(), NetworkError> {
		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		self.listen("mousemove", move |ev| {
			if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
				let (x, y) = to_canvas(&canvas, ev.client_x(), ev.client_y());
				state.borrow_mut().set_pointer(x, y);
			}
		})?;

		for event in ["touchstart", "touchmove"] {
			let (state, canvas) = (self.state.clone(), self.canvas.clone());
			self.listen(event, move |ev| {
				let touch = ev.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0));
				if let Some(touch) = touch {
					let (x, y) = to_canvas(&canvas, touch.client_x(), touch.client_y());
					state.borrow_mut().set_pointer(x, y);
				}
			})?;
		}

		for event in ["touchend", "touchcancel"] {
			let state = self.state.clone();
			self.listen(event, move |_| state.borrow_mut().clear_pointer())?;
		}
		Ok(())
	}

	fn listen_resize(&mut self) -> Result<(), NetworkError> {
		let (state, canvas, window) = (
			self.state.clone(),
			self.canvas.clone(),
			self.window.clone(),
		);
		self.listen("resize", move |_| match viewport(&window) {
			Ok((w, h)) => {
				canvas.set_width(w as u32);
				canvas.set_height(h as u32);
				state.borrow_mut().resize(w, h);
			}
			Err(err) => error!("particle network resize failed: {err}"),
		})
	}
}

impl Drop for NetworkRuntime {
	fn drop(&mut self) {
		self.stop();
	}
}

fn viewport(window: &Window) -> Result<(f64, f64), NetworkError> {
	let measure = |v: Result<JsValue, JsValue>| -> Result<f64, NetworkError> {
		v?.as_f64()
			.ok_or_else(|| NetworkError::Js("viewport size is not a number".into()))
	};
	Ok((measure(window.inner_width())?, measure(window.inner_height())?))
}

fn to_canvas(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}
