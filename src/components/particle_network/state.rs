use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{HighlightMode, NetworkConfig};
use super::field::{self, NeighborMap};
use super::geometry::{Point, jittered_path, point_to_segment_distance};
use super::types::{ArcPhase, EnergyArc, HoverState, Node, PointerState, Pulse};

/// Everything the animation loop, the timers and the input listeners share.
pub struct NetworkState {
	pub config: NetworkConfig,
	pub width: f64,
	pub height: f64,
	pub time: f64,
	pub nodes: Vec<Node>,
	pub neighbors: NeighborMap,
	pub arcs: Vec<EnergyArc>,
	pub pulses: Vec<Pulse>,
	pub pointer: PointerState,
	pub hover: HoverState,
	// Per-frame caches, indexed like `nodes`.
	positions: Vec<Point>,
	edges: Vec<(usize, usize)>,
	rng: StdRng,
}

impl NetworkState {
	pub fn new(config: NetworkConfig, width: f64, height: f64, seed: u64) -> Self {
		let mut state = Self {
			config,
			width,
			height,
			time: 0.0,
			nodes: Vec::new(),
			neighbors: NeighborMap::new(),
			arcs: Vec::new(),
			pulses: Vec::new(),
			pointer: PointerState::default(),
			hover: HoverState::default(),
			positions: Vec::new(),
			edges: Vec::new(),
			rng: StdRng::seed_from_u64(seed),
		};
		state.regenerate();
		state
	}

	/// Throws away every node, arc and pulse and scatters a fresh field for
	/// the new viewport.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.regenerate();
	}

	fn regenerate(&mut self) {
		let target = self.config.density.node_count(self.width);
		self.nodes = field::scatter_nodes(
			self.width,
			self.height,
			target,
			self.config.min_node_distance,
			self.config.placement_attempts,
			&mut self.rng,
		);
		self.reset_derived();
		info!(
			"particle network: {} of {} nodes for {}x{}",
			self.nodes.len(),
			target,
			self.width,
			self.height
		);
	}

	fn reset_derived(&mut self) {
		self.neighbors = field::build_neighbor_map(&self.nodes, self.config.connection_radius);
		self.arcs.clear();
		self.pulses.clear();
		self.hover = HoverState::default();
		self.update_positions();
		self.update_edges();
	}

	pub fn set_pointer(&mut self, x: f64, y: f64) {
		self.pointer.position = Some(Point::new(x, y));
	}

	pub fn clear_pointer(&mut self) {
		self.pointer.position = None;
		self.hover = HoverState::default();
	}

	/// Animated positions for the current frame, indexed like `nodes`.
	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	/// Index pairs of nodes connected this frame.
	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn is_hovered_edge(&self, a: usize, b: usize) -> bool {
		self.hover.edge == Some((a.min(b), a.max(b)))
	}

	pub fn has_pulse(&self, node_id: usize) -> bool {
		self.pulses.iter().any(|p| p.node_id == Some(node_id))
	}

	pub fn tick(&mut self) {
		self.time += self.config.wave_speed;
		self.update_positions();
		self.update_edges();
		self.update_hover();
		self.apply_highlight();
		self.pulses.retain_mut(Pulse::advance);
		self.register_hover_pulses();
		self.update_arcs();
	}

	fn update_positions(&mut self) {
		let (time, amplitude) = (self.time, self.config.wave_amplitude);
		self.positions = self
			.nodes
			.iter()
			.map(|n| n.animated_position(time, amplitude))
			.collect();
	}

	fn update_edges(&mut self) {
		let radius = self.config.connection_radius;
		self.edges.clear();
		for (i, a) in self.positions.iter().enumerate() {
			for (j, b) in self.positions.iter().enumerate().skip(i + 1) {
				if a.distance(*b) < radius {
					self.edges.push((i, j));
				}
			}
		}
	}

	fn update_hover(&mut self) {
		let Some(pointer) = self.pointer.position else {
			self.hover = HoverState::default();
			return;
		};

		let mut edge = None;
		let mut min_edge = self.config.edge_hover_radius;
		for &(i, j) in &self.edges {
			let d = point_to_segment_distance(pointer, self.positions[i], self.positions[j]);
			if d < min_edge {
				min_edge = d;
				let (a, b) = (self.nodes[i].id(), self.nodes[j].id());
				edge = Some((a.min(b), a.max(b)));
			}
		}

		let mut node = None;
		let mut min_node = self.config.node_hover_radius;
		for (n, p) in self.nodes.iter().zip(&self.positions) {
			let d = p.distance(pointer);
			if d < min_node {
				min_node = d;
				node = Some(n.id());
			}
		}

		self.hover = HoverState { node, edge };
	}

	fn apply_highlight(&mut self) {
		let hover = &self.hover;
		let neighbors: &[usize] = hover
			.node
			.and_then(|id| self.neighbors.get(&id))
			.map(Vec::as_slice)
			.unwrap_or_default();

		for node in &mut self.nodes {
			let id = node.id();
			let target = if hover.node == Some(id) {
				1.0
			} else if neighbors.contains(&id) {
				self.config.neighbor_intensity
			} else if hover.edge.is_some_and(|(a, b)| a == id || b == id) {
				self.config.edge_intensity
			} else {
				0.0
			};

			node.highlight = match self.config.highlight_mode {
				HighlightMode::Direct => target,
				HighlightMode::Eased { rate } => {
					let next = node.highlight + (target - node.highlight) * rate.clamp(0.0, 1.0);
					if (target - next).abs() < 0.01 { target } else { next }
				}
			};
		}
	}

	fn register_hover_pulses(&mut self) {
		let Some(pointer) = self.pointer.position else {
			return;
		};
		let radius = self.config.node_hover_radius;
		for (node, pos) in self.nodes.iter().zip(&self.positions) {
			let id = node.id();
			if pos.distance(pointer) < radius && !self.pulses.iter().any(|p| p.node_id == Some(id)) {
				self.pulses
					.push(Pulse::new(Some(id), *pos, &self.config.hover_pulse));
			}
		}
	}

	fn update_arcs(&mut self) {
		let arc_config = &self.config.arc;
		let (nodes, positions, rng) = (&self.nodes, &self.positions, &mut self.rng);
		let lookup = |id| frame_position(nodes, positions, id);

		self.arcs.retain_mut(|arc| {
			if arc.advance(arc_config.bolt_speed, arc_config.fade_speed) == ArcPhase::Expired {
				return false;
			}
			let (Some(from), Some(to)) = (lookup(arc.from_id), lookup(arc.to_id)) else {
				debug!("dropping arc {}->{}: endpoint gone", arc.from_id, arc.to_id);
				return false;
			};
			arc.path = jittered_path(
				from,
				to,
				arc_config.jaggedness,
				arc_config.segment_length,
				&mut *rng,
			);
			arc.is_finite()
		});
	}

	/// Starts an arc from a random node to a random node within
	/// `arc.max_distance` of it. Returns false when there is no candidate.
	pub fn spawn_energy_arc(&mut self) -> bool {
		if self.nodes.len() < 2 {
			return false;
		}
		let from = &self.nodes[self.rng.gen_range(0..self.nodes.len())];
		let max_distance = self.config.arc.max_distance;
		let candidates: Vec<usize> = self
			.nodes
			.iter()
			.filter(|n| {
				let d = from.base().distance(n.base());
				n.id() != from.id() && d > 0.0 && d < max_distance
			})
			.map(Node::id)
			.collect();

		if candidates.is_empty() {
			debug!("no arc target near node {}", from.id());
			return false;
		}
		let to = candidates[self.rng.gen_range(0..candidates.len())];
		self.arcs.push(EnergyArc::new(from.id(), to));
		true
	}

	/// Re-raises a pulse from the hovered node unless one is still expanding.
	pub fn spawn_periodic_pulse(&mut self) -> bool {
		let Some(id) = self.hover.node else {
			return false;
		};
		if self.has_pulse(id) {
			return false;
		}
		let Some(origin) = frame_position(&self.nodes, &self.positions, id) else {
			return false;
		};
		self.pulses
			.push(Pulse::new(Some(id), origin, &self.config.periodic_pulse));
		true
	}

	#[cfg(test)]
	fn with_nodes(config: NetworkConfig, width: f64, height: f64, anchors: &[(f64, f64)]) -> Self {
		let mut state = Self::new(config, width, height, 0);
		state.nodes = anchors
			.iter()
			.enumerate()
			.map(|(id, &(x, y))| Node::new(id, Point::new(x, y)))
			.collect();
		state.reset_derived();
		state
	}
}

/// Current animated position of the node with `id`, if it still exists.
fn frame_position(nodes: &[Node], positions: &[Point], id: usize) -> Option<Point> {
	nodes
		.get(id)
		.filter(|n| n.id() == id)
		.and_then(|_| positions.get(id).copied())
}
