//! Bubble-sort cascade of 2x2 compare-exchange switches.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::switch::Switch;

use super::SwitchingNetwork;

/// Sorting-network-style cascade over adjacent lanes.
///
/// O(n^2) switches of degree 2; works for any input size. Each lane `i`
/// carries its left node through a chain of intermediate variables to its
/// right node, and every compare-exchange switch lets the routed count move
/// toward one end.
pub struct BubbleSortNetwork;

/// Raw compare-exchange cascade between equally sized lane lists.
///
/// Shared with the divide-and-conquer base case, which feeds it reordered
/// terminal nodes.
pub(crate) fn compare_exchange_cascade(left_nodes: &[Node], right_nodes: &[Node]) -> Vec<Switch> {
	debug_assert_eq!(left_nodes.len(), right_nodes.len());
	let n = left_nodes.len();
	if n == 0 {
		return Vec::new();
	}
	if n == 1 {
		// A single lane has nothing to exchange; connect it straight through.
		return vec![Switch::balance(
			[left_nodes[0].name.clone()],
			[right_nodes[0].name.clone()],
		)];
	}

	// lanes[i] is the chain of names from left to right on lane i.
	let mut lanes: Vec<Vec<String>> = Vec::with_capacity(n);
	for i in 0..n {
		let inner = if i > 0 { (n - 1 - i) * 2 } else { n - 2 };
		let mut lane = Vec::with_capacity(inner + 2);
		lane.push(left_nodes[i].name.clone());
		for j in 0..inner {
			lane.push(format!("{}_{}_{}", left_nodes[i].name, j, right_nodes[i].name));
		}
		lane.push(right_nodes[i].name.clone());
		lanes.push(lane);
	}

	let mut progress = vec![0usize; n];
	let mut switches = Vec::new();
	for i in (1..n).chain((1..n - 1).rev()) {
		for j in (0..i).step_by(2) {
			let (k1, k2) = (i - j, i - j - 1);
			switches.push(Switch::balance(
				[lanes[k1][progress[k1]].clone(), lanes[k2][progress[k2]].clone()],
				[
					lanes[k1][progress[k1] + 1].clone(),
					lanes[k2][progress[k2] + 1].clone(),
				],
			));
			progress[k1] += 1;
			progress[k2] += 1;
		}
	}
	switches
}

impl SwitchingNetwork for BubbleSortNetwork {
	fn raw_network(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		_threshold: Option<usize>,
	) -> Result<Vec<Switch>> {
		if left_nodes.len() != right_nodes.len() {
			return Err(Error::InvalidConstraint(
				"left and right node counts must match".to_string(),
			));
		}
		Ok(compare_exchange_cascade(left_nodes, right_nodes))
	}
}
