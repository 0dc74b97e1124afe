use std::f64::consts::PI;

use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Distance from `p` to the segment `a`-`b`, clamped to the endpoints.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (abx, aby) = (b.x - a.x, b.y - a.y);
	let len_sq = abx * abx + aby * aby;
	if len_sq == 0.0 {
		return p.distance(a);
	}
	let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
	if t < 0.0 {
		return p.distance(a);
	}
	if t > 1.0 {
		return p.distance(b);
	}
	p.distance(Point::new(a.x + t * abx, a.y + t * aby))
}

pub fn path_length(path: &[Point]) -> f64 {
	path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Jagged polyline from `from` to `to`. Waypoints are displaced perpendicular
/// to the chord, most strongly at the middle and not at all at the ends.
pub fn jittered_path<R: Rng + ?Sized>(
	from: Point,
	to: Point,
	jaggedness: f64,
	segment_length: f64,
	rng: &mut R,
) -> Vec<Point> {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = dx.hypot(dy);
	let segments = if segment_length > 0.0 {
		((dist / segment_length).floor() as usize).max(2)
	} else {
		2
	};

	let mut path = Vec::with_capacity(segments + 1);
	path.push(from);
	if dist > 1.0 {
		let (px, py) = (-dy / dist, dx / dist);
		for k in 1..segments {
			let t = k as f64 / segments as f64;
			let displacement = rng.gen_range(-0.5..0.5) * dist * jaggedness * (t * PI).sin();
			path.push(Point::new(
				from.x + dx * t + px * displacement,
				from.y + dy * t + py * displacement,
			));
		}
	}
	path.push(to);
	path
}
