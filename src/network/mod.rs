//! Switching-network topologies.
//!
//! Every topology implements [`SwitchingNetwork`]: decompose a balance
//! between two node lists into a cascade of bounded-degree switches. The
//! provided [`SwitchingNetwork::generate`] runs the raw topology through a
//! simplification pass that folds fixed terminal nodes into switch
//! constants and propagates forced values backwards, so the emitted
//! switches reference only free or don't-care variables.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::node::{Node, NodeAttribute};
use crate::switch::Switch;

mod benes;
mod bitonic_sort;
mod bubble_sort;
mod clos;
mod clos_max_degree;
mod clos_min_edge;
mod divide_and_conquer;
mod naive;
mod oddeven_merge_sort;

pub use benes::BenesNetwork;
pub use bitonic_sort::BitonicSortNetwork;
pub use bubble_sort::BubbleSortNetwork;
pub use clos_max_degree::ClosMaxDegree;
pub use clos_min_edge::ClosMinEdge;
pub use divide_and_conquer::DivideAndConquerNetwork;
pub use naive::NaiveNetwork;
pub use oddeven_merge_sort::OddEvenMergeSortNetwork;

/// Identifier for each switching-network formulation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NetworkType {
	Naive,
	Benes,
	BitonicSort,
	BubbleSort,
	ClosNetworkMaxDegree,
	ClosNetworkMinEdge,
	DivideAndConquer,
	OddEvenMergeSort,
}

impl NetworkType {
	pub fn as_str(&self) -> &'static str {
		match self {
			NetworkType::Naive => "naive",
			NetworkType::Benes => "benes",
			NetworkType::BitonicSort => "bitonic_sort",
			NetworkType::BubbleSort => "bubble_sort",
			NetworkType::ClosNetworkMaxDegree => "clos_network_max_degree",
			NetworkType::ClosNetworkMinEdge => "clos_network_min_edge",
			NetworkType::DivideAndConquer => "divide_and_conquer",
			NetworkType::OddEvenMergeSort => "oddeven_merge_sort",
		}
	}

	/// Instantiate the generator for this topology.
	///
	/// `max_degree` is consumed only by [`NetworkType::ClosNetworkMaxDegree`],
	/// which requires it.
	pub fn build(self, max_degree: Option<usize>) -> Result<Box<dyn SwitchingNetwork>> {
		Ok(match self {
			NetworkType::Naive => Box::new(NaiveNetwork),
			NetworkType::Benes => Box::new(BenesNetwork),
			NetworkType::BitonicSort => Box::new(BitonicSortNetwork),
			NetworkType::BubbleSort => Box::new(BubbleSortNetwork),
			NetworkType::ClosNetworkMaxDegree => {
				let max_degree = max_degree.ok_or_else(|| {
					Error::InvalidConfiguration(
						"clos_network_max_degree requires a max_degree setting".to_string(),
					)
				})?;
				Box::new(ClosMaxDegree::new(max_degree)?)
			}
			NetworkType::ClosNetworkMinEdge => Box::new(ClosMinEdge::new()),
			NetworkType::DivideAndConquer => Box::new(DivideAndConquerNetwork),
			NetworkType::OddEvenMergeSort => Box::new(OddEvenMergeSortNetwork),
		})
	}
}

impl fmt::Display for NetworkType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A switching-network topology.
pub trait SwitchingNetwork {
	/// The raw cascade for the given left/right nodes, before fixed-node
	/// simplification. Validates topology size preconditions and fails
	/// atomically.
	fn raw_network(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		threshold: Option<usize>,
	) -> Result<Vec<Switch>>;

	/// Build the network, folding fixed terminal nodes into constants.
	fn generate(
		&self,
		left_nodes: &[Node],
		right_nodes: &[Node],
		threshold: Option<usize>,
	) -> Result<Vec<Switch>> {
		let raw = self.raw_network(left_nodes, right_nodes, threshold)?;
		simplify(raw, right_nodes)
	}
}

/// Fold fixed nodes into switch constants, walking from the terminal side.
///
/// Each switch is inspected with the attributes of its right-side nodes
/// already known (terminal attributes for the last stage, propagated ones
/// for everything upstream). Depending on the achievable range of the right
/// side the left nodes are pinned to a scalar, marked don't-care, or left
/// free; fixed right nodes are dropped and their count moves into
/// `right_constant`.
fn simplify(network: Vec<Switch>, right_nodes: &[Node]) -> Result<Vec<Switch>> {
	let mut current_nodes: BTreeSet<String> =
		right_nodes.iter().map(|node| node.name.clone()).collect();
	let mut attribute: HashMap<String, NodeAttribute> = right_nodes
		.iter()
		.map(|node| (node.name.clone(), node.attribute))
		.collect();

	let attr = |map: &HashMap<String, NodeAttribute>, name: &str| -> NodeAttribute {
		*map.get(name).expect("attribute tracked for every placed node")
	};

	let mut result: Vec<Switch> = Vec::new();
	for switch in network.iter().rev() {
		assert!(
			switch.right_nodes().iter().all(|node| current_nodes.contains(node)),
			"generator emitted a switch whose right side is not connected",
		);
		for node in switch.right_nodes() {
			current_nodes.remove(node);
		}
		assert!(
			switch.left_nodes().iter().all(|node| !current_nodes.contains(node)),
			"generator emitted a switch that redefines an existing node",
		);
		current_nodes.extend(switch.left_nodes().iter().cloned());

		let num_left = switch.left_nodes().len() as i64;
		let ones = switch
			.right_nodes()
			.iter()
			.filter(|node| attr(&attribute, node) == NodeAttribute::AlwaysOne)
			.count() as i64;
		let non_zeros = switch
			.right_nodes()
			.iter()
			.filter(|node| attr(&attribute, node) != NodeAttribute::AlwaysZero)
			.count() as i64;
		let right_sum_min = ones + switch.right_constant() - switch.left_constant();
		let right_sum_max = non_zeros + switch.right_constant() - switch.left_constant();

		if right_sum_max < 0 || right_sum_min > num_left {
			return Err(Error::InvalidConstraint(format!(
				"infeasible balance: right side requires [{right_sum_min}, {right_sum_max}] \
				 out of {num_left} left variables",
			)));
		}

		if right_sum_min == num_left {
			// The lower bound saturates the left side: pin every left node to 1.
			for node in switch.left_nodes() {
				attribute.insert(node.clone(), NodeAttribute::AlwaysOne);
				result.push(Switch::with_constants([node.clone()], Vec::<String>::new(), 0, 1));
			}
		} else if right_sum_max == 0 {
			for node in switch.left_nodes() {
				attribute.insert(node.clone(), NodeAttribute::AlwaysZero);
				result.push(Switch::with_constants([node.clone()], Vec::<String>::new(), 0, 0));
			}
		} else if switch
			.right_nodes()
			.iter()
			.all(|node| attr(&attribute, node) == NodeAttribute::NotCare)
			&& right_sum_min <= 0
			&& right_sum_max >= num_left
		{
			// Nothing downstream restricts the left side; the switch vanishes.
			for node in switch.left_nodes() {
				attribute.insert(node.clone(), NodeAttribute::NotCare);
			}
		} else {
			for node in switch.left_nodes() {
				attribute.insert(node.clone(), NodeAttribute::ZeroOrOne);
			}
			let surviving_right: Vec<String> = switch
				.right_nodes()
				.iter()
				.filter(|node| {
					let a = attr(&attribute, node);
					a != NodeAttribute::AlwaysOne && a != NodeAttribute::AlwaysZero
				})
				.cloned()
				.collect();
			result.push(Switch::with_constants(
				switch.left_nodes().iter().cloned(),
				surviving_right,
				switch.left_constant(),
				switch.right_constant() + ones,
			));
		}
	}
	result.reverse();
	trace!(
		raw_switches = network.len(),
		simplified_switches = result.len(),
		"simplified switching network",
	);
	Ok(result)
}
