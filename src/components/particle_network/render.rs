use std::f64::consts::PI;

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::path_length;
use super::state::NetworkState;

const CYAN: (u8, u8, u8) = (0, 225, 255);
const EDGE_ALPHA: f64 = 0.2;
const EDGE_WIDTH: f64 = 2.5;

fn cyan(alpha: f64) -> String {
	format!("rgba({}, {}, {}, {})", CYAN.0, CYAN.1, CYAN.2, alpha)
}

/// The canvas save/restore stack.
trait StateStack {
	fn save(&self);
	fn restore(&self);
}

impl StateStack for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}
}

/// Runs `body` between a save and a restore. The restore happens even
/// when `body` fails.
fn isolated<C: StateStack, E>(ctx: &C, body: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
	ctx.save();
	let result = body();
	ctx.restore();
	result
}

/// Draws every item, skipping the ones that fail. Returns the first error.
fn draw_each<T, E: std::fmt::Debug>(
	layer: &str,
	items: impl IntoIterator<Item = T>,
	mut draw: impl FnMut(T) -> Result<(), E>,
) -> Result<(), E> {
	let mut first = None;
	for item in items {
		if let Err(err) = draw(item) {
			debug!("skipped a {layer} entity: {err:?}");
			first.get_or_insert(err);
		}
	}
	first.map_or(Ok(()), Err)
}

/// Draws one frame. A layer that throws does not stop the layers above
/// it; the first error is returned once everything has been drawn.
pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_edges(state, ctx);
	let layers = [
		draw_pulses(state, ctx),
		draw_nodes(state, ctx),
		draw_arcs(state, ctx),
	];
	layers.into_iter().collect()
}

fn draw_edges(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let positions = state.positions();
	for &(i, j) in state.edges() {
		let (a, b) = (&state.nodes[i], &state.nodes[j]);
		let mut intensity = a.highlight.max(b.highlight).clamp(0.0, 1.0);
		if state.is_hovered_edge(a.id(), b.id()) {
			intensity = intensity.max(state.config.edge_intensity);
		}
		let boost = 1.0 + intensity;

		ctx.begin_path();
		ctx.move_to(positions[i].x, positions[i].y);
		ctx.line_to(positions[j].x, positions[j].y);
		ctx.set_stroke_style_str(&cyan(EDGE_ALPHA * boost));
		ctx.set_line_width(EDGE_WIDTH * boost);
		ctx.set_shadow_color(&cyan(intensity * 0.5));
		ctx.set_shadow_blur(10.0 * intensity);
		ctx.stroke();
	}
	ctx.set_shadow_blur(0.0);
}

fn draw_pulses(state: &NetworkState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let live = state.pulses.iter().filter(|p| p.is_live());
	isolated(ctx, || {
		draw_each("pulse", live, |pulse| -> Result<(), JsValue> {
			ctx.begin_path();
			ctx.arc(pulse.origin.x, pulse.origin.y, pulse.radius, 0.0, 2.0 * PI)?;
			ctx.set_stroke_style_str(&cyan(pulse.alpha));
			ctx.set_line_width(pulse.line_width);
			ctx.stroke();
			Ok(())
		})
	})
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let base = state.config.node_radius;
	ctx.set_fill_style_str(&cyan(1.0));
	let placed = state.nodes.iter().zip(state.positions());
	let drawn = draw_each("node", placed, |(node, pos)| -> Result<(), JsValue> {
		let h = if node.highlight.is_finite() { node.highlight } else { 0.0 };
		ctx.begin_path();
		ctx.arc(pos.x, pos.y, base * (1.0 + 0.5 * h), 0.0, 2.0 * PI)?;
		ctx.set_shadow_color(&cyan(h * 0.8));
		ctx.set_shadow_blur(20.0 * h);
		ctx.fill();
		Ok(())
	});
	ctx.set_shadow_blur(0.0);
	drawn
}

fn draw_arcs(state: &NetworkState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let drawable = state.arcs.iter().filter_map(|arc| {
		if arc.path.len() < 2 || !arc.is_finite() {
			return None;
		}
		let length = path_length(&arc.path);
		(length >= 1.0).then_some((arc, length))
	});

	draw_each("arc", drawable, |(arc, length)| {
		isolated(ctx, || -> Result<(), JsValue> {
			ctx.set_stroke_style_str(&format!("rgba(200, 240, 255, {})", arc.alpha));
			ctx.set_line_width(1.0 + arc.alpha * 1.5);
			ctx.set_shadow_color(&format!("rgba(150, 220, 255, {})", arc.alpha * 0.7));
			ctx.set_shadow_blur(15.0 + 10.0 * arc.alpha);
			ctx.set_line_cap("round");
			// One dash as long as the path; sliding the offset reveals it.
			let dash = js_sys::Array::of2(&JsValue::from_f64(length), &JsValue::from_f64(length));
			ctx.set_line_dash(&dash)?;
			ctx.set_line_dash_offset(arc.dash_offset(length));

			ctx.begin_path();
			ctx.move_to(arc.path[0].x, arc.path[0].y);
			for p in &arc.path[1..] {
				ctx.line_to(p.x, p.y);
			}
			ctx.stroke();
			Ok(())
		})
	})
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	/// Records stack calls and draws in order.
	#[derive(Default)]
	struct Recorder(RefCell<Vec<String>>);

	impl Recorder {
		fn push(&self, entry: impl Into<String>) {
			self.0.borrow_mut().push(entry.into());
		}

		fn log(&self) -> Vec<String> {
			self.0.borrow().clone()
		}
	}

	impl StateStack for Recorder {
		fn save(&self) {
			self.push("save");
		}

		fn restore(&self) {
			self.push("restore");
		}
	}

	#[test]
	fn isolated_restores_when_the_body_fails() {
		let ctx = Recorder::default();
		let result = isolated(&ctx, || {
			ctx.push("draw");
			Err("line dash rejected")
		});
		assert_eq!(result, Err("line dash rejected"));
		assert_eq!(ctx.log(), ["save", "draw", "restore"]);
	}

	#[test]
	fn isolated_restores_after_success() {
		let ctx = Recorder::default();
		let result: Result<(), &str> = isolated(&ctx, || Ok(()));
		assert_eq!(result, Ok(()));
		assert_eq!(ctx.log(), ["save", "restore"]);
	}

	#[test]
	fn failing_entity_does_not_stop_the_rest() {
		let ctx = Recorder::default();
		let result = draw_each("arc", 0..5, |i| {
			ctx.push(format!("draw {i}"));
			if i % 2 == 1 { Err(i) } else { Ok(()) }
		});
		assert_eq!(result, Err(1));
		assert_eq!(ctx.log(), ["draw 0", "draw 1", "draw 2", "draw 3", "draw 4"]);
	}

	#[test]
	fn stack_stays_balanced_when_every_entity_fails() {
		let ctx = Recorder::default();
		let result = draw_each("arc", ["a", "b", "c"], |name| isolated(&ctx, || Err(name)));
		assert_eq!(result, Err("a"));
		let log = ctx.log();
		assert_eq!(log.iter().filter(|e| *e == "save").count(), 3);
		assert_eq!(log.iter().filter(|e| *e == "restore").count(), 3);
		assert_eq!(log.last().map(String::as_str), Some("restore"));
	}

	#[test]
	fn empty_layer_draws_nothing() {
		let result: Result<(), &str> = draw_each("pulse", Vec::<u8>::new(), |_| Err("unreachable"));
		assert_eq!(result, Ok(()));
	}
}
