//! Batcher's odd-even merge sort arrangement of compare-exchange switches.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::switch::Switch;

use super::SwitchingNetwork;

/// Compare-exchange switches per Batcher's odd-even merge recursion.
///
/// O(n log^2 n) switches of degree 2 with a smaller constant than the
/// bitonic arrangement; the input size must be a power of two. The schedule
/// is generated anchored at the terminal side over positional lane indices,
/// then mapped to lane-chain names and flipped into left-to-right order.
pub struct OddEvenMergeSortNetwork;

impl SwitchingNetwork for OddEvenMergeSortNetwork {
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
				"oddeven_merge_sort requires a power-of-two input, got {n}",
			)));
		}
		if n == 1 {
			return Ok(vec![Switch::balance(
				[left_nodes[0].name.clone()],
				[right_nodes[0].name.clone()],
			)]);
		}
		let log_n = n.trailing_zeros() as usize;

		// Comparators as (lane, position) pairs, counted from the terminal
		// side.
		let mut progress = vec![0usize; n];
		let mut comparators: Vec<[(usize, usize); 2]> = Vec::new();
		for m_max in (1..=log_n).rev() {
			let block = 1usize << m_max;
			for i_base in (0..n).step_by(block) {
				for m in 0..m_max {
					let step = 1isize << m;
					let i_start = if m < m_max - 1 {
						i_base as isize
					} else {
						i_base as isize - step
					};
					let i_end = (i_base + block) as isize - step;
					for i in i_start..i_end {
						if ((i - i_start) / step) % 2 == 1 {
							let (a, b) = (i as usize, (i + step) as usize);
							comparators.push([(a, progress[a]), (b, progress[b])]);
							progress[a] += 1;
							progress[b] += 1;
						}
					}
				}
			}
		}

		// Position j on lane i: 0 is the terminal node, progress[i] is the
		// left node, anything between is an intermediate.
		let name_of = |lane: usize, position: usize| -> String {
			if position == 0 {
				right_nodes[lane].name.clone()
			} else if position == progress[lane] {
				left_nodes[lane].name.clone()
			} else {
				format!(
					"{}_{}_{}",
					right_nodes[lane].name,
					position - 1,
					left_nodes[lane].name,
				)
			}
		};

		let mut switches: Vec<Switch> = comparators
			.iter()
			.map(|&[(a, pa), (b, pb)]| {
				Switch::balance(
					[name_of(a, pa + 1), name_of(b, pb + 1)],
					[name_of(a, pa), name_of(b, pb)],
				)
			})
			.collect();
		switches.reverse();
		Ok(switches)
	}
}
