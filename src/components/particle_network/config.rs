use super::error::NetworkError;

/// Viewport-width step function deciding how many nodes to scatter.
///
/// Edge count grows quadratically with node count, so narrow viewports get
/// fewer nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityTiers {
	/// Widths below this use the phone tier.
	pub tablet_breakpoint: f64,
	/// Widths at or above this use the desktop tier.
	pub desktop_breakpoint: f64,
	/// Node count for phones.
	pub phone: usize,
	/// Node count between the two breakpoints.
	pub tablet: usize,
	/// Node count for wide viewports.
	pub desktop: usize,
}

impl Default for DensityTiers {
	fn default() -> Self {
		Self {
			tablet_breakpoint: 768.0,
			desktop_breakpoint: 1200.0,
			phone: 20,
			tablet: 45,
			desktop: 70,
		}
	}
}

impl DensityTiers {
	/// Target node count for a viewport of the given width.
	pub fn node_count(&self, width: f64) -> usize {
		if width < self.tablet_breakpoint {
			self.phone
		} else if width < self.desktop_breakpoint {
			self.tablet
		} else {
			self.desktop
		}
	}
}

/// How node highlight intensity follows the hover target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HighlightMode {
	/// Intensity is assigned the target value every frame.
	Direct,
	/// Intensity moves `rate` of the remaining distance per frame.
	Eased {
		/// Fraction of the gap closed per frame, in (0, 1].
		rate: f64,
	},
}

/// Appearance and growth of one kind of pulse ring.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseStyle {
	/// Radius at which the ring is retired.
	pub max_radius: f64,
	/// Radius added per frame.
	pub expansion_speed: f64,
	/// Stroke width of the ring.
	pub line_width: f64,
	/// Opacity at radius zero.
	pub alpha: f64,
}

impl Default for PulseStyle {
	fn default() -> Self {
		Self {
			max_radius: 120.0,
			expansion_speed: 1.0,
			line_width: 3.0,
			alpha: 0.6,
		}
	}
}

/// Spawning and animation of energy arcs.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcConfig {
	/// Milliseconds between spawn attempts.
	pub interval_ms: i32,
	/// Anchor distance under which two nodes may be joined by an arc.
	pub max_distance: f64,
	/// Draw-in progress added per frame.
	pub bolt_speed: f64,
	/// Alpha removed per frame once fully drawn.
	pub fade_speed: f64,
	/// Perpendicular displacement as a fraction of the arc length.
	pub jaggedness: f64,
	/// Approximate length of one jittered segment.
	pub segment_length: f64,
}

impl Default for ArcConfig {
	fn default() -> Self {
		Self {
			interval_ms: 2000,
			max_distance: 250.0,
			bolt_speed: 0.08,
			fade_speed: 0.03,
			jaggedness: 0.18,
			segment_length: 15.0,
		}
	}
}

/// Every tunable of the particle network.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
	/// Node count per viewport width.
	pub density: DensityTiers,
	/// Minimum anchor spacing the scatter tries to honour.
	pub min_node_distance: f64,
	/// Distance under which two nodes are connected.
	pub connection_radius: f64,
	/// Samples tried per node before the scatter gives up.
	pub placement_attempts: usize,
	/// Time added per frame; drives the wave motion.
	pub wave_speed: f64,
	/// Offset of the wave motion around each anchor.
	pub wave_amplitude: f64,
	/// Radius of an unhighlighted node.
	pub node_radius: f64,
	/// Pointer distance that hovers a node.
	pub node_hover_radius: f64,
	/// Pointer distance that hovers an edge.
	pub edge_hover_radius: f64,
	/// Intensity given to neighbors of the hovered node.
	pub neighbor_intensity: f64,
	/// Intensity given to the endpoints of the hovered edge.
	pub edge_intensity: f64,
	/// Direct or eased highlight changes.
	pub highlight_mode: HighlightMode,
	/// Energy arc tunables.
	pub arc: ArcConfig,
	/// Pulse raised when the pointer reaches a node.
	pub hover_pulse: PulseStyle,
	/// Pulse re-raised on a timer from the hovered node.
	pub periodic_pulse: PulseStyle,
	/// Milliseconds between periodic pulses.
	pub periodic_pulse_interval_ms: i32,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			density: DensityTiers::default(),
			min_node_distance: 90.0,
			connection_radius: 200.0,
			placement_attempts: 5000,
			wave_speed: 0.015,
			wave_amplitude: 5.0,
			node_radius: 6.0,
			node_hover_radius: 60.0,
			edge_hover_radius: 30.0,
			neighbor_intensity: 0.35,
			edge_intensity: 0.8,
			highlight_mode: HighlightMode::Direct,
			arc: ArcConfig::default(),
			hover_pulse: PulseStyle::default(),
			periodic_pulse: PulseStyle::default(),
			periodic_pulse_interval_ms: 15_000,
		}
	}
}

impl NetworkConfig {
	/// Rejects values that would keep pulses or arcs alive forever or
	/// stall the animation.
	pub fn validate(&self) -> Result<(), NetworkError> {
		let positive = [
			(self.hover_pulse.expansion_speed, "hover_pulse.expansion_speed"),
			(self.hover_pulse.max_radius, "hover_pulse.max_radius"),
			(self.periodic_pulse.expansion_speed, "periodic_pulse.expansion_speed"),
			(self.periodic_pulse.max_radius, "periodic_pulse.max_radius"),
			(self.arc.bolt_speed, "arc.bolt_speed"),
			(self.arc.fade_speed, "arc.fade_speed"),
			(self.connection_radius, "connection_radius"),
			(self.node_radius, "node_radius"),
		];
		if let Some((_, name)) = positive.iter().find(|(v, _)| !(v.is_finite() && *v > 0.0)) {
			return Err(NetworkError::InvalidConfig(*name));
		}
		if self.arc.interval_ms <= 0 {
			return Err(NetworkError::InvalidConfig("arc.interval_ms"));
		}
		if self.periodic_pulse_interval_ms <= 0 {
			return Err(NetworkError::InvalidConfig("periodic_pulse_interval_ms"));
		}
		if let HighlightMode::Eased { rate } = self.highlight_mode {
			if !(rate > 0.0 && rate <= 1.0) {
				return Err(NetworkError::InvalidConfig("highlight_mode.rate"));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phone_width_uses_fewest_nodes() {
		let tiers = DensityTiers::default();
		assert_eq!(tiers.node_count(500.0), tiers.phone);
		assert_eq!(tiers.node_count(0.0), tiers.phone);
	}

	#[test]
	fn breakpoints_are_inclusive_on_the_upper_tier() {
		let tiers = DensityTiers::default();
		assert_eq!(tiers.node_count(767.9), tiers.phone);
		assert_eq!(tiers.node_count(768.0), tiers.tablet);
		assert_eq!(tiers.node_count(1199.0), tiers.tablet);
		assert_eq!(tiers.node_count(1200.0), tiers.desktop);
		assert_eq!(tiers.node_count(1600.0), tiers.desktop);
	}

	#[test]
	fn default_config_is_valid() {
		assert_eq!(NetworkConfig::default().validate(), Ok(()));
	}

	#[test]
	fn stalled_pulse_speeds_are_rejected() {
		for speed in [0.0, -1.0, f64::NAN] {
			let mut config = NetworkConfig::default();
			config.hover_pulse.expansion_speed = speed;
			assert_eq!(
				config.validate(),
				Err(NetworkError::InvalidConfig("hover_pulse.expansion_speed"))
			);

			let mut config = NetworkConfig::default();
			config.periodic_pulse.expansion_speed = speed;
			assert_eq!(
				config.validate(),
				Err(NetworkError::InvalidConfig("periodic_pulse.expansion_speed"))
			);
		}
	}

	#[test]
	fn stalled_arc_speeds_are_rejected() {
		let mut config = NetworkConfig::default();
		config.arc.bolt_speed = 0.0;
		assert_eq!(config.validate(), Err(NetworkError::InvalidConfig("arc.bolt_speed")));

		let mut config = NetworkConfig::default();
		config.arc.fade_speed = -0.03;
		assert_eq!(config.validate(), Err(NetworkError::InvalidConfig("arc.fade_speed")));
	}

	#[test]
	fn eased_rate_must_be_a_fraction() {
		let mut config = NetworkConfig::default();
		config.highlight_mode = HighlightMode::Eased { rate: 0.0 };
		assert!(config.validate().is_err());
		config.highlight_mode = HighlightMode::Eased { rate: 1.0 };
		assert!(config.validate().is_ok());
	}

	#[test]
	fn timer_intervals_must_be_positive() {
		let mut config = NetworkConfig::default();
		config.arc.interval_ms = 0;
		assert_eq!(config.validate(), Err(NetworkError::InvalidConfig("arc.interval_ms")));
	}

	#[test]
	fn tiers_grow_with_width() {
		let tiers = DensityTiers::default();
		assert!(tiers.phone < tiers.tablet);
		assert!(tiers.tablet < tiers.desktop);
	}
}
