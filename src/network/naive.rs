//! Naive formulation: a single all-to-all switch.

use crate::error::Result;
use crate::node::Node;
use crate::switch::Switch;

use super::SwitchingNetwork;

/// One switch connecting every left variable to every right variable.
///
/// No auxiliary variables, but the switch degree equals the input size, so
/// the quadratic expansion is dense.
pub struct NaiveNetwork;

impl SwitchingNetwork for NaiveNetwork {
	fn raw_network(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		_threshold: Option<usize>,
	) -> Result<Vec<Switch>> {
		Ok(vec![Switch::balance(
			left_nodes.iter().map(|node| node.name.clone()),
			right_nodes.iter().map(|node| node.name.clone()),
		)])
	}
}
