//! Clos topology sized to minimize pairwise interaction terms.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;
use crate::node::Node;
use crate::switch::Switch;

use super::clos::{clos_network, ClosSizing};
use super::SwitchingNetwork;

/// Three-stage Clos network choosing stage sizes by estimated edge count.
///
/// For every subnetwork size the estimated quadratic-term count of the best
/// Clos decomposition is compared against a single clique switch, and the
/// cheaper of the two is used; the comparison is memoized. Switch degrees
/// vary, only the total interaction count is optimized.
pub struct ClosMinEdge {
	/// size -> (edge count, whether a clique beats decomposing).
	edge_count: RefCell<HashMap<usize, (u64, bool)>>,
}

impl Default for ClosMinEdge {
	fn default() -> Self {
		Self::new()
	}
}

impl ClosMinEdge {
	pub fn new() -> Self {
		// A 2-node clique has 4 variables, hence 6 pairwise terms.
		let seeded = HashMap::from([(0, (0, true)), (1, (0, true)), (2, (6, true))]);
		Self {
			edge_count: RefCell::new(seeded),
		}
	}

	fn estimated_edges(&self, n: usize) -> (u64, bool) {
		if let Some(&cached) = self.edge_count.borrow().get(&n) {
			return cached;
		}
		let (exterior, interior) = self.optimal_sizes(n);
		let decomposed = self.staged_edges(n, exterior, interior);
		let clique = (n * (2 * n - 1)) as u64;
		let result = (decomposed.min(clique), clique <= decomposed);
		self.edge_count.borrow_mut().insert(n, result);
		result
	}

	/// Edge count of one decomposition level: each ingress/egress switch is
	/// a clique over its group plus the middle nodes, and every strand
	/// recurses.
	fn staged_edges(&self, n: usize, exterior: usize, interior: usize) -> u64 {
		let middle = self.estimated_edges(interior).0 * exterior as u64;
		let mut exterior_edges: u64 = 0;
		for group in 0..interior {
			let start = n * group / interior;
			let end = n * (group + 1) / interior;
			let vars = (end - start + exterior) as u64;
			exterior_edges += vars * (vars - 1) / 2;
		}
		exterior_edges * 2 + middle
	}

	fn optimal_sizes(&self, n: usize) -> (usize, usize) {
		(2..n)
			.map(|exterior| (exterior, n.div_ceil(exterior)))
			.min_by_key(|&(exterior, interior)| self.staged_edges(n, exterior, interior))
			.expect("sizes are only requested for n >= 3")
	}
}

impl ClosSizing for ClosMinEdge {
	fn implement_if_small(&self, left: &[String], right: &[String]) -> Result<Option<Vec<Switch>>> {
		let n = left.len().max(right.len());
		if self.estimated_edges(n).1 {
			Ok(Some(vec![Switch::balance(
				left.iter().cloned(),
				right.iter().cloned(),
			)]))
		} else {
			Ok(None)
		}
	}

	fn channel_sizes(&self, n_left: usize, n_right: usize) -> (usize, usize) {
		self.optimal_sizes(n_left.max(n_right))
	}
}

impl SwitchingNetwork for ClosMinEdge {
	fn raw_network(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		_threshold: Option<usize>,
	) -> Result<Vec<Switch>> {
		let left: Vec<String> = left_nodes.iter().map(|node| node.name.clone()).collect();
		let right: Vec<String> = right_nodes.iter().map(|node| node.name.clone()).collect();
		clos_network(self, &left, &right)
	}
}
