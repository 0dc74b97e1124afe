use std::collections::HashMap;

use log::warn;
use rand::Rng;

use super::geometry::Point;
use super::types::Node;

/// Node id to the ids of nodes whose anchors lie within the connection radius.
pub type NeighborMap = HashMap<usize, Vec<usize>>;

/// Greedy rejection sampling: each node gets `attempts` uniform samples to
/// find a spot at least `min_distance` from every node placed so far. The
/// first node that cannot be placed ends the scatter early.
pub fn scatter_nodes<R: Rng + ?Sized>(
	width: f64,
	height: f64,
	count: usize,
	min_distance: f64,
	attempts: usize,
	rng: &mut R,
) -> Vec<Node> {
	let mut nodes: Vec<Node> = Vec::with_capacity(count);
	if !(width > 0.0 && height > 0.0) {
		return nodes;
	}

	for id in 0..count {
		let placed = (0..attempts).find_map(|_| {
			let candidate = Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
			nodes
				.iter()
				.all(|n| n.base().distance(candidate) >= min_distance)
				.then_some(candidate)
		});

		match placed {
			Some(base) => nodes.push(Node::new(id, base)),
			None => {
				warn!(
					"could not place node #{}; stopping early at {} of {} nodes",
					id + 1,
					nodes.len(),
					count
				);
				break;
			}
		}
	}
	nodes
}

pub fn build_neighbor_map(nodes: &[Node], radius: f64) -> NeighborMap {
	nodes
		.iter()
		.map(|a| {
			let neighbors = nodes
				.iter()
				.filter(|b| b.id() != a.id() && a.base().distance(b.base()) < radius)
				.map(Node::id)
				.collect();
			(a.id(), neighbors)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn min_pairwise(nodes: &[Node]) -> f64 {
		let mut min = f64::INFINITY;
		for (i, a) in nodes.iter().enumerate() {
			for b in &nodes[i + 1..] {
				min = min.min(a.base().distance(b.base()));
			}
		}
		min
	}

	#[test]
	fn scatter_fills_roomy_viewport_with_spacing() {
		let mut rng = StdRng::seed_from_u64(11);
		let nodes = scatter_nodes(1600.0, 900.0, 70, 90.0, 5000, &mut rng);

		assert_eq!(nodes.len(), 70);
		assert!(min_pairwise(&nodes) >= 90.0);
		for node in &nodes {
			let p = node.base();
			assert!((0.0..1600.0).contains(&p.x));
			assert!((0.0..900.0).contains(&p.y));
		}
	}

	#[test]
	fn ids_are_sequential() {
		let mut rng = StdRng::seed_from_u64(5);
		let nodes = scatter_nodes(800.0, 600.0, 20, 90.0, 5000, &mut rng);
		let ids: Vec<_> = nodes.iter().map(Node::id).collect();
		assert_eq!(ids, (0..nodes.len()).collect::<Vec<_>>());
	}

	#[test]
	fn crowded_viewport_stops_early() {
		let mut rng = StdRng::seed_from_u64(1);
		// at most four 90px-spaced points fit in a 100x100 square
		let nodes = scatter_nodes(100.0, 100.0, 20, 90.0, 500, &mut rng);

		assert!(!nodes.is_empty());
		assert!(nodes.len() < 20);
		assert!(min_pairwise(&nodes) >= 90.0);
	}

	#[test]
	fn spacing_holds_for_any_seed() {
		for seed in 0..20 {
			let mut rng = StdRng::seed_from_u64(seed);
			let nodes = scatter_nodes(500.0, 400.0, 30, 90.0, 200, &mut rng);
			assert!(nodes.len() <= 30);
			assert!(min_pairwise(&nodes) >= 90.0);
		}
	}

	#[test]
	fn empty_viewport_yields_no_nodes() {
		let mut rng = StdRng::seed_from_u64(1);
		assert!(scatter_nodes(0.0, 600.0, 20, 90.0, 5000, &mut rng).is_empty());
		assert!(scatter_nodes(800.0, -1.0, 20, 90.0, 5000, &mut rng).is_empty());
	}

	#[test]
	fn neighbor_map_is_symmetric() {
		let mut rng = StdRng::seed_from_u64(42);
		let nodes = scatter_nodes(1200.0, 800.0, 50, 90.0, 5000, &mut rng);
		let map = build_neighbor_map(&nodes, 200.0);

		assert_eq!(map.len(), nodes.len());
		for (a, neighbors) in &map {
			assert!(!neighbors.contains(a));
			for b in neighbors {
				assert!(map[b].contains(a), "{b} lists {a} missing");
			}
		}
	}

	#[test]
	fn neighbor_map_uses_strict_radius() {
		let nodes = vec![
			Node::new(0, Point::new(0.0, 0.0)),
			Node::new(1, Point::new(200.0, 0.0)),
			Node::new(2, Point::new(0.0, 150.0)),
		];
		let map = build_neighbor_map(&nodes, 200.0);
		assert_eq!(map[&0], vec![2]);
		assert!(map[&1].is_empty());
		assert_eq!(map[&2], vec![0]);
	}
}
