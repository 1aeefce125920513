//! Beneš network: the Clos skeleton with exterior width 2.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::switch::Switch;

use super::clos::{clos_network, ClosSizing};
use super::SwitchingNetwork;

/// Rearrangeable log-depth network of degree-2 switches.
///
/// The input size must be a power of two; each level splits into two
/// half-size subnetworks until groups of two remain.
pub struct BenesNetwork;

impl ClosSizing for BenesNetwork {
	fn implement_if_small(&self, left: &[String], right: &[String]) -> Result<Option<Vec<Switch>>> {
		if left.len().max(right.len()) <= 2 {
			Ok(Some(vec![Switch::balance(
				left.iter().cloned(),
				right.iter().cloned(),
			)]))
		} else {
			Ok(None)
		}
	}

	fn channel_sizes(&self, n_left: usize, n_right: usize) -> (usize, usize) {
		let n = n_left.max(n_right);
		let mut interior = 1;
		while 2 * interior < n {
			interior *= 2;
		}
		(2, interior)
	}
}

impl SwitchingNetwork for BenesNetwork {
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
				"benes requires a power-of-two input, got {n}",
			)));
		}
		let left: Vec<String> = left_nodes.iter().map(|node| node.name.clone()).collect();
		let right: Vec<String> = right_nodes.iter().map(|node| node.name.clone()).collect();
		clos_network(self, &left, &right)
	}
}
