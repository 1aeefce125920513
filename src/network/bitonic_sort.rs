//! Bitonic-merge arrangement of compare-exchange switches.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::switch::Switch;

use super::SwitchingNetwork;

/// Compare-exchange switches in the bitonic merge recursion.
///
/// O(n log^2 n) switches of degree 2; the input size must be a power of
/// two. The lanes are built anchored at the terminal side and the schedule
/// is emitted in reverse, which yields the same network read left-to-right.
pub struct BitonicSortNetwork;

impl SwitchingNetwork for BitonicSortNetwork {
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
		let n = left_nodes.len();
		if !n.is_power_of_two() {
			return Err(Error::InvalidNetworkSize(format!(
				"bitonic_sort requires a power-of-two input, got {n}",
			)));
		}
		if n == 1 {
			return Ok(vec![Switch::balance(
				[left_nodes[0].name.clone()],
				[right_nodes[0].name.clone()],
			)]);
		}
		let log_n = n.trailing_zeros() as usize;

		// lanes[i][0] is the terminal node; the chain runs back to the left
		// node at the far end.
		let inner = log_n * (log_n + 1) / 2 - 1;
		let mut lanes: Vec<Vec<String>> = Vec::with_capacity(n);
		for i in 0..n {
			let mut lane = Vec::with_capacity(inner + 2);
			lane.push(right_nodes[i].name.clone());
			for j in 0..inner {
				lane.push(format!("{}_{}_{}", right_nodes[i].name, j, left_nodes[i].name));
			}
			lane.push(left_nodes[i].name.clone());
			lanes.push(lane);
		}

		let mut progress = vec![0usize; n];
		let mut switches = Vec::new();
		for m_max in (0..log_n).rev() {
			for m in 0..=m_max {
				let step = 1usize << m;
				for i in 0..n {
					if (i / step) % 2 == 0 {
						let partner = i + step;
						switches.push(Switch::balance(
							[
								lanes[i][progress[i] + 1].clone(),
								lanes[partner][progress[partner] + 1].clone(),
							],
							[
								lanes[i][progress[i]].clone(),
								lanes[partner][progress[partner]].clone(),
							],
						));
						progress[i] += 1;
						progress[partner] += 1;
					}
				}
			}
		}
		switches.reverse();
		Ok(switches)
	}
}
