use super::config::PulseStyle;
use super::geometry::Point;

/// A point of the network. The anchor never moves; the drawn position
/// oscillates around it.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	id: usize,
	base: Point,
	pub highlight: f64,
}

impl Node {
	pub fn new(id: usize, base: Point) -> Self {
		Self {
			id,
			base,
			highlight: 0.0,
		}
	}

	pub fn id(&self) -> usize {
		self.id
	}

	pub fn base(&self) -> Point {
		self.base
	}

	/// Anchor plus a wave offset phased by the node id.
	pub fn animated_position(&self, time: f64, amplitude: f64) -> Point {
		let phase = time + self.id as f64;
		Point::new(
			self.base.x + phase.sin() * amplitude,
			self.base.y + phase.cos() * amplitude,
		)
	}
}

/// Outcome of advancing an arc by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcPhase {
	Drawing,
	Fading,
	Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnergyArc {
	pub from_id: usize,
	pub to_id: usize,
	/// Fraction of the path revealed.
	pub progress: f64,
	pub alpha: f64,
	pub path: Vec<Point>,
}

impl EnergyArc {
	pub fn new(from_id: usize, to_id: usize) -> Self {
		Self {
			from_id,
			to_id,
			progress: 0.0,
			alpha: 1.0,
			path: Vec::new(),
		}
	}

	/// Arcs that could never finish drawing or fading expire at once.
	pub fn advance(&mut self, bolt_speed: f64, fade_speed: f64) -> ArcPhase {
		if !(bolt_speed > 0.0 && fade_speed > 0.0) {
			return ArcPhase::Expired;
		}
		if self.progress < 1.0 {
			self.progress = (self.progress + bolt_speed).min(1.0);
			return ArcPhase::Drawing;
		}
		self.alpha -= fade_speed;
		if self.alpha <= 0.0 {
			ArcPhase::Expired
		} else {
			ArcPhase::Fading
		}
	}

	pub fn is_finite(&self) -> bool {
		self.progress.is_finite()
			&& self.alpha.is_finite()
			&& self.path.iter().all(|p| p.is_finite())
	}

	/// Line dash offset revealing `progress` of a path of the given length.
	pub fn dash_offset(&self, path_length: f64) -> f64 {
		path_length * (1.0 - self.progress)
	}
}

/// An expanding ring. `node_id` is set for rings raised from a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Pulse {
	pub node_id: Option<usize>,
	pub origin: Point,
	pub radius: f64,
	pub max_radius: f64,
	pub expansion_speed: f64,
	pub line_width: f64,
	pub base_alpha: f64,
	pub alpha: f64,
}

impl Pulse {
	pub fn new(node_id: Option<usize>, origin: Point, style: &PulseStyle) -> Self {
		Self {
			node_id,
			origin,
			radius: 0.0,
			max_radius: style.max_radius,
			expansion_speed: style.expansion_speed,
			line_width: style.line_width,
			base_alpha: style.alpha,
			alpha: style.alpha,
		}
	}

	/// Grows the ring by one frame. Returns false once it should be dropped.
	pub fn advance(&mut self) -> bool {
		self.radius += self.expansion_speed;
		self.alpha = self.base_alpha * (1.0 - self.radius / self.max_radius);
		self.is_live()
	}

	/// A ring that cannot grow would never retire, so it is not live either.
	pub fn is_live(&self) -> bool {
		self.is_finite()
			&& self.expansion_speed > 0.0
			&& self.radius >= 0.0
			&& self.alpha > 0.0
			&& self.radius < self.max_radius
	}

	fn is_finite(&self) -> bool {
		self.origin.is_finite()
			&& self.radius.is_finite()
			&& self.expansion_speed.is_finite()
			&& self.alpha.is_finite()
			&& self.line_width.is_finite()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerState {
	pub position: Option<Point>,
}

/// What the pointer is over this frame. Edges are stored as `(lower, higher)` ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	pub node: Option<usize>,
	pub edge: Option<(usize, usize)>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn animated_position_stays_within_amplitude() {
		let node = Node::new(3, Point::new(100.0, 100.0));
		for step in 0..200 {
			let p = node.animated_position(step as f64 * 0.015, 5.0);
			assert!(p.distance(node.base()) <= 5.0 + 1e-9);
		}
	}

	#[test]
	fn nodes_with_different_ids_move_out_of_phase() {
		let (a, b) = (
			Node::new(0, Point::new(0.0, 0.0)),
			Node::new(1, Point::new(0.0, 0.0)),
		);
		assert_ne!(a.animated_position(0.5, 5.0), b.animated_position(0.5, 5.0));
	}

	#[test]
	fn arc_draws_in_then_fades_then_expires() {
		let mut arc = EnergyArc::new(0, 1);
		let mut last_progress = arc.progress;
		let mut phases = Vec::new();
		loop {
			let before_alpha = arc.alpha;
			let phase = arc.advance(0.08, 0.03);
			phases.push(phase);
			match phase {
				ArcPhase::Drawing => {
					assert!(arc.progress >= last_progress);
					assert!(arc.progress <= 1.0);
					assert_eq!(arc.alpha, 1.0);
					last_progress = arc.progress;
				}
				ArcPhase::Fading => {
					assert_eq!(arc.progress, 1.0);
					assert!(arc.alpha < before_alpha);
					assert!(arc.alpha > 0.0);
				}
				ArcPhase::Expired => {
					assert!(arc.alpha <= 0.0);
					break;
				}
			}
		}
		// 13 frames to reach progress 1, then ceil(1 / 0.03) = 34 to fade
		assert_eq!(phases.iter().filter(|p| **p == ArcPhase::Drawing).count(), 13);
		assert_eq!(phases.len(), 13 + 34);
	}

	#[test]
	fn arc_dash_offset_shrinks_to_zero() {
		let mut arc = EnergyArc::new(0, 1);
		assert_eq!(arc.dash_offset(200.0), 200.0);
		arc.progress = 0.5;
		assert_eq!(arc.dash_offset(200.0), 100.0);
		arc.progress = 1.0;
		assert_eq!(arc.dash_offset(200.0), 0.0);
	}

	#[test]
	fn non_finite_arc_is_detected() {
		let mut arc = EnergyArc::new(0, 1);
		assert!(arc.is_finite());
		arc.path.push(Point::new(f64::NAN, 0.0));
		assert!(!arc.is_finite());
	}

	#[test]
	fn pulse_grows_until_max_radius() {
		let style = PulseStyle {
			max_radius: 10.0,
			expansion_speed: 1.0,
			line_width: 2.0,
			alpha: 0.6,
		};
		let mut pulse = Pulse::new(Some(0), Point::new(0.0, 0.0), &style);
		let mut frames = 0;
		let mut last_radius = pulse.radius;
		while pulse.advance() {
			assert!(pulse.radius > last_radius);
			assert!(pulse.alpha > 0.0);
			last_radius = pulse.radius;
			frames += 1;
		}
		assert_eq!(frames, 9);
		assert!(pulse.radius >= pulse.max_radius);
	}

	#[test]
	fn arc_with_stalled_speeds_expires_immediately() {
		let mut stalled = EnergyArc::new(0, 1);
		assert_eq!(stalled.advance(0.0, 0.03), ArcPhase::Expired);
		let mut backwards = EnergyArc::new(0, 1);
		assert_eq!(backwards.advance(-0.08, 0.03), ArcPhase::Expired);
		let mut never_fades = EnergyArc::new(0, 1);
		assert_eq!(never_fades.advance(0.08, 0.0), ArcPhase::Expired);
	}

	#[test]
	fn pulse_that_cannot_grow_is_not_live() {
		let still = PulseStyle {
			expansion_speed: 0.0,
			..PulseStyle::default()
		};
		let mut pulse = Pulse::new(Some(0), Point::new(0.0, 0.0), &still);
		assert!(!pulse.advance());
		assert_eq!(pulse.radius, 0.0);
	}

	#[test]
	fn shrinking_pulse_is_not_live() {
		let shrinking = PulseStyle {
			expansion_speed: -1.0,
			..PulseStyle::default()
		};
		let mut pulse = Pulse::new(Some(0), Point::new(0.0, 0.0), &shrinking);
		assert!(!pulse.advance());
		assert!(pulse.radius < 0.0);
		assert!(!pulse.is_live());
	}

	#[test]
	fn pulse_with_nan_origin_is_not_live() {
		let mut pulse = Pulse::new(None, Point::new(f64::NAN, 1.0), &PulseStyle::default());
		assert!(!pulse.advance());
	}
}
