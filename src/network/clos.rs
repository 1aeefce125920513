//! Shared three-stage Clos skeleton.
//!
//! A Clos stage splits the left nodes into `interior` groups, balances each
//! group against `exterior` fresh middle nodes (ingress), recursively
//! balances the middle nodes strand-by-strand (middle), and symmetrically
//! regroups onto the right nodes (egress). The concrete topologies differ
//! only in how they size the stages and when they stop recursing.

use crate::error::Result;
use crate::switch::Switch;

/// Stage sizing policy for a Clos-family topology.
pub(crate) trait ClosSizing {
	/// A direct implementation for inputs this policy considers small, or
	/// `None` to keep decomposing. Errors reject inputs the topology cannot
	/// handle at all.
	fn implement_if_small(&self, left: &[String], right: &[String]) -> Result<Option<Vec<Switch>>>;

	/// `(exterior, interior)` stage sizes with `exterior * interior >= max(n_left, n_right)`.
	fn channel_sizes(&self, n_left: usize, n_right: usize) -> (usize, usize);
}

/// Build the three-stage network recursively under the given sizing policy.
pub(crate) fn clos_network(
	sizing: &dyn ClosSizing,
	left: &[String],
	right: &[String],
) -> Result<Vec<Switch>> {
	if let Some(switches) = sizing.implement_if_small(left, right)? {
		return Ok(switches);
	}

	let left_size = left.len();
	let right_size = right.len();
	let (exterior, interior) = sizing.channel_sizes(left_size, right_size);
	let middle_size = exterior * interior;
	assert!(
		left_size.max(right_size) <= middle_size,
		"clos sizing produced too few middle nodes",
	);

	let mut ingress: Vec<Switch> = Vec::with_capacity(interior);
	let mut ingress_nodes: Vec<String> = Vec::with_capacity(middle_size);
	for group in 0..interior {
		let start = group * left_size / interior;
		let end = (group + 1) * left_size / interior;
		let middle: Vec<String> = (exterior * group..exterior * (group + 1))
			.map(|i| format!("{}_{i}", left[i.min(end - 1)]))
			.collect();
		ingress.push(Switch::balance(left[start..end].iter().cloned(), middle.iter().cloned()));
		ingress_nodes.extend(middle);
	}

	let mut egress: Vec<Switch> = Vec::with_capacity(interior);
	let mut egress_nodes: Vec<String> = Vec::with_capacity(middle_size);
	for group in 0..interior {
		let start = group * right_size / interior;
		let end = (group + 1) * right_size / interior;
		let middle: Vec<String> = (exterior * group..exterior * (group + 1))
			.map(|i| format!("{}_{i}", right[i.min(end - 1)]))
			.collect();
		egress.push(Switch::balance(middle.iter().cloned(), right[start..end].iter().cloned()));
		egress_nodes.extend(middle);
	}

	// Strand s collects the s-th middle node of every group on both sides;
	// each strand is balanced by a recursive network of size `interior`.
	let mut middle_stage: Vec<Switch> = Vec::new();
	for strand in 0..exterior {
		let strand_left: Vec<String> = ingress_nodes
			.iter()
			.skip(strand)
			.step_by(exterior)
			.cloned()
			.collect();
		let strand_right: Vec<String> = egress_nodes
			.iter()
			.skip(strand)
			.step_by(exterior)
			.cloned()
			.collect();
		middle_stage.extend(clos_network(sizing, &strand_left, &strand_right)?);
	}

	let mut switches = ingress;
	switches.extend(middle_stage);
	switches.extend(egress);
	Ok(switches)
}
