//! Divide-and-conquer decomposition into pairwise exchange stages.

use crate::error::{Error, Result};
use crate::node::{Node, NodeAttribute};
use crate::switch::Switch;

use super::bubble_sort::compare_exchange_cascade;
use super::SwitchingNetwork;

/// Recursive half-splitting network.
///
/// Each level pairs lane `i` with lane `i + ceil(n/2)` through a fresh
/// auxiliary pair, then recurses on the two halves with the ones-count of
/// the target split between them. Recursion bottoms out on all-equal
/// targets (straight lanes), one-hot/one-cold targets (a bubble cascade),
/// or once the group size drops to `threshold` (a single dense switch).
///
/// The target side must consist of fixed nodes only, which covers the
/// equality-style constraints; bounded targets need a sorting topology.
pub struct DivideAndConquerNetwork;

impl SwitchingNetwork for DivideAndConquerNetwork {
	fn raw_network(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		threshold: Option<usize>,
	) -> Result<Vec<Switch>> {
		if left_nodes.len() != right_nodes.len() {
			return Err(Error::InvalidConstraint(
				"left and right node counts must match".to_string(),
			));
		}
		if !left_nodes
			.iter()
			.all(|node| node.attribute == NodeAttribute::ZeroOrOne)
		{
			return Err(Error::InvalidConstraint(
				"divide_and_conquer requires free left nodes".to_string(),
			));
		}
		if !right_nodes.iter().all(Node::is_fixed) {
			return Err(Error::InvalidConstraint(
				"divide_and_conquer supports only fixed target patterns \
				 (equality-style constraints)"
					.to_string(),
			));
		}
		let mut switches = Vec::new();
		subdivide(left_nodes, right_nodes, threshold, &mut switches);
		Ok(switches)
	}
}

fn subdivide(
	left_nodes: &[Node],
	right_nodes: &[Node],
	threshold: Option<usize>,
	out: &mut Vec<Switch>,
) {
	let n = left_nodes.len();
	let zeros: Vec<Node> = right_nodes
		.iter()
		.filter(|node| node.attribute == NodeAttribute::AlwaysZero)
		.cloned()
		.collect();
	let ones: Vec<Node> = right_nodes
		.iter()
		.filter(|node| node.attribute == NodeAttribute::AlwaysOne)
		.cloned()
		.collect();
	debug_assert_eq!(zeros.len() + ones.len(), n);

	// Uniform target: every lane connects straight through.
	if zeros.len() == n || ones.len() == n {
		out.extend(
			left_nodes
				.iter()
				.zip(right_nodes)
				.map(|(l, r)| Switch::balance([l.name.clone()], [r.name.clone()])),
		);
		return;
	}

	// One-hot (or one-cold) target: a bubble cascade moves the odd value to
	// the far lane.
	if ones.len() == 1 {
		let reordered: Vec<Node> = zeros.into_iter().chain(ones).collect();
		out.extend(compare_exchange_cascade(left_nodes, &reordered));
		return;
	}
	if zeros.len() == 1 {
		let reordered: Vec<Node> = ones.into_iter().chain(zeros).collect();
		out.extend(compare_exchange_cascade(left_nodes, &reordered));
		return;
	}

	if let Some(threshold) = threshold {
		if n <= threshold {
			out.push(Switch::balance(
				left_nodes.iter().map(|node| node.name.clone()),
				right_nodes.iter().map(|node| node.name.clone()),
			));
			return;
		}
	}

	let half = n.div_ceil(2);
	let mut aux_nodes: Vec<Node> = left_nodes
		.iter()
		.enumerate()
		.map(|(idx, node)| Node::free(format!("{}_{idx}", node.name)))
		.collect();
	for i in 0..n / 2 {
		out.push(Switch::balance(
			[left_nodes[i].name.clone(), left_nodes[i + half].name.clone()],
			[aux_nodes[i].name.clone(), aux_nodes[i + half].name.clone()],
		));
	}
	// An odd middle lane has no exchange partner and passes through as-is.
	if n % 2 == 1 {
		aux_nodes[n / 2] = left_nodes[n / 2].clone();
	}

	let ones_first = ones.len().div_ceil(2);
	let zeros_first = half - ones_first;
	let first_targets: Vec<Node> = ones[..ones_first]
		.iter()
		.chain(&zeros[..zeros_first])
		.cloned()
		.collect();
	let second_targets: Vec<Node> = ones[ones_first..]
		.iter()
		.chain(&zeros[zeros_first..])
		.cloned()
		.collect();
	subdivide(&aux_nodes[..half], &first_targets, threshold, out);
	subdivide(&aux_nodes[half..], &second_targets, threshold, out);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn free_lanes(n: usize) -> Vec<Node> {
		(0..n).map(|i| Node::free(format!("L{i}"))).collect()
	}

	fn equal_to_targets(n: usize, k: usize) -> Vec<Node> {
		(0..n)
			.map(|i| {
				if i < n - k {
					Node::always_zero(format!("R{i}"))
				} else {
					Node::always_one(format!("R{i}"))
				}
			})
			.collect()
	}

	#[test]
	fn uniform_targets_connect_lanes_directly() {
		let left = free_lanes(4);
		let switches = DivideAndConquerNetwork
			.raw_network(&left, &equal_to_targets(4, 0), None)
			.unwrap();
		assert_eq!(switches.len(), 4);
		assert!(switches.iter().all(|s| s.degree() == 1));

		let switches = DivideAndConquerNetwork
			.raw_network(&left, &equal_to_targets(4, 4), None)
			.unwrap();
		assert_eq!(switches.len(), 4);
	}

	#[test]
	fn one_hot_uses_the_bubble_cascade() {
		let left = free_lanes(4);
		let switches = DivideAndConquerNetwork
			.raw_network(&left, &equal_to_targets(4, 1), None)
			.unwrap();
		assert_eq!(switches.len(), 4 * 3 / 2);
		assert!(switches.iter().all(|s| s.degree() == 2));
	}

	#[test]
	fn general_case_splits_into_halves() {
		let left = free_lanes(4);
		let switches = DivideAndConquerNetwork
			.raw_network(&left, &equal_to_targets(4, 2), None)
			.unwrap();
		// Two exchange pairs, then each half is a 2-lane one-hot cascade.
		assert_eq!(switches.len(), 2 + 1 + 1);
		assert!(switches[0].left_nodes().contains("L0"));
		assert!(switches[0].left_nodes().contains("L2"));
		assert!(switches[1].left_nodes().contains("L1"));
		assert!(switches[1].left_nodes().contains("L3"));
	}

	#[test]
	fn threshold_stops_subdivision() {
		let left = free_lanes(8);
		let switches = DivideAndConquerNetwork
			.raw_network(&left, &equal_to_targets(8, 4), Some(8))
			.unwrap();
		assert_eq!(switches.len(), 1);
		assert_eq!(switches[0].degree(), 8);
	}

	#[test]
	fn rejects_bounded_targets() {
		let left = free_lanes(4);
		let targets: Vec<Node> = (0..4)
			.map(|i| {
				if i < 2 {
					Node::always_zero(format!("R{i}"))
				} else {
					Node::not_care(format!("R{i}"))
				}
			})
			.collect();
		assert!(matches!(
			DivideAndConquerNetwork.raw_network(&left, &targets, None),
			Err(Error::InvalidConstraint(_)),
		));
	}

	#[test]
	fn rejects_fixed_left_nodes() {
		let mut left = free_lanes(4);
		left[0] = Node::always_one("L0");
		assert!(matches!(
			DivideAndConquerNetwork.raw_network(&left, &equal_to_targets(4, 1), None),
			Err(Error::InvalidConstraint(_)),
		));
	}
}
