use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use send_wrapper::SendWrapper;
use web_sys::HtmlCanvasElement;

use super::config::NetworkConfig;
use super::runtime::NetworkRuntime;

/// Full-viewport animated particle network, drawn behind the page content.
///
/// Pointer and touch input are read from the window, so the canvas itself
/// ignores pointer events and never blocks the content above it.
#[component]
pub fn ParticleNetwork(
	/// Tunables; defaults match the site's background.
	#[prop(optional)]
	config: Option<NetworkConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: Rc<RefCell<Option<NetworkRuntime>>> = Rc::new(RefCell::new(None));
	let config = config.unwrap_or_default();

	let runtime_init = runtime.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let mut slot = runtime_init.borrow_mut();
		if let Some(mut previous) = slot.take() {
			previous.stop();
		}
		let started = NetworkRuntime::new(canvas, config.clone())
			.and_then(|mut rt| rt.start().map(|()| rt));
		match started {
			Ok(rt) => *slot = Some(rt),
			Err(err) => error!("particle network unavailable: {err}"),
		}
	});

	let runtime_cleanup = SendWrapper::new(runtime);
	on_cleanup(move || {
		if let Some(mut rt) = runtime_cleanup.borrow_mut().take() {
			rt.stop();
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-network"
			style="position: fixed; inset: 0; display: block; z-index: 0; pointer-events: none;"
		/>
	}
}
