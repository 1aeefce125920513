//! Clos topology sized to bound the switch degree.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::switch::Switch;

use super::clos::{clos_network, ClosSizing};
use super::SwitchingNetwork;

/// Three-stage Clos network whose every switch has degree at most
/// `max_degree`.
///
/// The exterior group width is chosen in `[2, max_degree]` to minimize the
/// total switch count, estimated recursively and memoized. Smaller degrees
/// cost more auxiliary variables.
pub struct ClosMaxDegree {
	max_degree: usize,
	switch_count: RefCell<HashMap<usize, u64>>,
}

impl ClosMaxDegree {
	pub fn new(max_degree: usize) -> Result<Self> {
		if max_degree < 2 {
			return Err(Error::InvalidConfiguration(format!(
				"max_degree must be at least 2, got {max_degree}",
			)));
		}
		Ok(Self {
			max_degree,
			switch_count: RefCell::new(HashMap::new()),
		})
	}

	/// Estimated number of switches for a network of the given size.
	fn estimated_switches(&self, n: usize) -> u64 {
		if let Some(&count) = self.switch_count.borrow().get(&n) {
			return count;
		}
		let count = if n <= self.max_degree {
			1
		} else {
			let (exterior, interior) = self.optimal_sizes(n);
			self.staged_switches(exterior, interior)
		};
		self.switch_count.borrow_mut().insert(n, count);
		count
	}

	/// Switch count of one decomposition level: an ingress and an egress
	/// switch per group plus `exterior` recursive middle networks.
	fn staged_switches(&self, exterior: usize, interior: usize) -> u64 {
		2 * interior as u64 + exterior as u64 * self.estimated_switches(interior)
	}

	fn optimal_sizes(&self, n: usize) -> (usize, usize) {
		(2..=self.max_degree)
			.map(|exterior| (exterior, n.div_ceil(exterior)))
			.min_by_key(|&(exterior, interior)| self.staged_switches(exterior, interior))
			.expect("max_degree >= 2 leaves at least one candidate")
	}
}

impl ClosSizing for ClosMaxDegree {
	fn implement_if_small(&self, left: &[String], right: &[String]) -> Result<Option<Vec<Switch>>> {
		let n = left.len().max(right.len());
		if n < 2 {
			return Err(Error::InvalidNetworkSize(format!(
				"clos_network_max_degree requires at least 2 nodes, got {n}",
			)));
		}
		if n <= self.max_degree {
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

impl SwitchingNetwork for ClosMaxDegree {
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
