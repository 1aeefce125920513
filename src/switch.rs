//! Switch elements and their aggregation into a QUBO.
//!
//! A [`Switch`] encodes the atomic balance constraint
//! `sum(left) + left_constant == sum(right) + right_constant` between two
//! disjoint sets of binary variables. [`Qubo::from_switches`] folds a whole
//! network of switches into a single quadratic objective whose zero-energy
//! assignments are exactly those balancing every switch.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use itertools::{iproduct, Itertools};

/// Single switch: left and right variable sets and integer constants.
///
/// The two sides must be disjoint as names. The *degree* of a switch is the
/// larger of its two side sizes; it bounds the quadratic terms the switch
/// contributes independently of overall problem size.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Switch {
	left_nodes: BTreeSet<String>,
	right_nodes: BTreeSet<String>,
	left_constant: i64,
	right_constant: i64,
}

impl Switch {
	/// A switch asserting `sum(left) == sum(right)`.
	pub fn balance(
		left: impl IntoIterator<Item = impl Into<String>>,
		right: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self::with_constants(left, right, 0, 0)
	}

	/// A switch asserting `sum(left) + left_constant == sum(right) + right_constant`.
	pub fn with_constants(
		left: impl IntoIterator<Item = impl Into<String>>,
		right: impl IntoIterator<Item = impl Into<String>>,
		left_constant: i64,
		right_constant: i64,
	) -> Self {
		let left_nodes: BTreeSet<String> = left.into_iter().map(Into::into).collect();
		let right_nodes: BTreeSet<String> = right.into_iter().map(Into::into).collect();
		assert!(
			left_nodes.is_disjoint(&right_nodes),
			"duplicate variables between left and right side of a switch",
		);
		Self {
			left_nodes,
			right_nodes,
			left_constant,
			right_constant,
		}
	}

	pub fn left_nodes(&self) -> &BTreeSet<String> {
		&self.left_nodes
	}

	pub fn right_nodes(&self) -> &BTreeSet<String> {
		&self.right_nodes
	}

	pub fn left_constant(&self) -> i64 {
		self.left_constant
	}

	pub fn right_constant(&self) -> i64 {
		self.right_constant
	}

	/// Number of variables in this switch (left + right).
	pub fn num_variables(&self) -> usize {
		self.left_nodes.len() + self.right_nodes.len()
	}

	/// The larger of the two side sizes.
	pub fn degree(&self) -> usize {
		self.left_nodes.len().max(self.right_nodes.len())
	}

	/// Number of quadratic terms this switch alone would contribute.
	pub fn num_edges(&self) -> usize {
		let n = self.num_variables();
		n * (n - 1) / 2
	}
}

/// QUBO representation: variables, linear and quadratic coefficients, and a
/// constant term.
///
/// Variables are kept in first-reference order; coefficient maps iterate in
/// sorted order, so two equal QUBOs render identically. Coefficients are
/// exact integers: expanding `(sum(left) - sum(right) + c)^2` over 0/1
/// variables never produces anything else.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Qubo {
	variables: Vec<String>,
	linear: BTreeMap<String, i64>,
	quadratic: BTreeMap<(String, String), i64>,
	constant: i64,
}

impl Qubo {
	pub fn new() -> Self {
		Self::default()
	}

	/// Convert a network of switches into a single QUBO, summing the
	/// expansion of `(sum(left) + lc - sum(right) - rc)^2` per switch.
	pub fn from_switches(switches: &[Switch]) -> Self {
		let mut qubo = Self::new();
		for switch in switches {
			qubo.fold_switch(switch);
		}
		qubo
	}

	/// Register a variable without attaching any term. Idempotent.
	pub fn declare_variable(&mut self, name: impl Into<String>) {
		let name = name.into();
		if !self.variables.contains(&name) {
			self.variables.push(name);
		}
	}

	/// Add one switch's quadratic penalty into the aggregate.
	///
	/// Shared variable pairs accumulate additively, which is what lets
	/// overlapping local balance penalties compose into one objective.
	pub fn fold_switch(&mut self, switch: &Switch) {
		// (L1 + L2 - R1 - R2 + C)^2
		// = 2 L1 L2 + 2 R1 R2 - 2 (L1 R1 + ...)
		// + L1 + L2 + R1 + R2 + 2C (L1 + L2 - R1 - R2)
		// + C^2
		let c = switch.left_constant - switch.right_constant;
		for node in switch.left_nodes.iter().chain(&switch.right_nodes) {
			self.declare_variable(node.clone());
		}
		for (a, b) in switch.left_nodes.iter().tuple_combinations() {
			self.add_quadratic(a, b, 2);
		}
		for (a, b) in switch.right_nodes.iter().tuple_combinations() {
			self.add_quadratic(a, b, 2);
		}
		for (a, b) in iproduct!(&switch.left_nodes, &switch.right_nodes) {
			self.add_quadratic(a, b, -2);
		}
		for node in &switch.left_nodes {
			// x * x = x folds the square of a binary variable into its
			// linear term.
			self.add_linear(node, 2 * c + 1);
		}
		for node in &switch.right_nodes {
			self.add_linear(node, -2 * c + 1);
		}
		self.constant += c * c;
	}

	/// Sum another QUBO into this one.
	pub fn merge(&mut self, other: &Qubo) {
		for variable in &other.variables {
			self.declare_variable(variable.clone());
		}
		for (name, coefficient) in &other.linear {
			self.add_linear(name, *coefficient);
		}
		for ((a, b), coefficient) in &other.quadratic {
			self.add_quadratic(a, b, *coefficient);
		}
		self.constant += other.constant;
	}

	fn add_linear(&mut self, name: &str, coefficient: i64) {
		*self.linear.entry(name.to_string()).or_insert(0) += coefficient;
	}

	fn add_quadratic(&mut self, a: &str, b: &str, coefficient: i64) {
		debug_assert_ne!(a, b);
		let key = if a < b {
			(a.to_string(), b.to_string())
		} else {
			(b.to_string(), a.to_string())
		};
		*self.quadratic.entry(key).or_insert(0) += coefficient;
	}

	/// Variables in first-reference order.
	pub fn variables(&self) -> &[String] {
		&self.variables
	}

	pub fn linear(&self) -> &BTreeMap<String, i64> {
		&self.linear
	}

	pub fn quadratic(&self) -> &BTreeMap<(String, String), i64> {
		&self.quadratic
	}

	pub fn constant(&self) -> i64 {
		self.constant
	}

	/// Evaluate the objective for a full assignment.
	///
	/// # Panics
	///
	/// Panics if the assignment misses a variable that carries a term.
	pub fn energy(&self, assignment: &HashMap<String, bool>) -> i64 {
		let value = |name: &str| -> i64 {
			let set = assignment
				.get(name)
				.unwrap_or_else(|| panic!("assignment missing variable {name}"));
			i64::from(*set)
		};
		let mut energy = self.constant;
		for (name, coefficient) in &self.linear {
			energy += coefficient * value(name);
		}
		for ((a, b), coefficient) in &self.quadratic {
			energy += coefficient * value(a) * value(b);
		}
		energy
	}
}

/// Aggregate size figures of a switch network.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NetworkStats {
	pub num_switches: usize,
	/// Distinct variables not in the caller's original set.
	pub num_auxiliary: usize,
	pub max_degree: usize,
	/// Sum of per-switch pairwise term counts.
	pub num_edges: usize,
}

/// Size figures for a network, given the caller's original variable names.
pub fn network_stats(switches: &[Switch], originals: &BTreeSet<String>) -> NetworkStats {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut num_auxiliary = 0;
	for node in switches
		.iter()
		.flat_map(|switch| switch.left_nodes.iter().chain(&switch.right_nodes))
	{
		if !originals.contains(node) && seen.insert(node) {
			num_auxiliary += 1;
		}
	}
	NetworkStats {
		num_switches: switches.len(),
		num_auxiliary,
		max_degree: switches.iter().map(Switch::degree).max().unwrap_or(0),
		num_edges: switches.iter().map(Switch::num_edges).sum(),
	}
}

/// Group switches into layers by distance from the initial nodes.
///
/// Starting from the given initial names, each switch is assigned the layer
/// at which it is first reached following left-to-right producer/consumer
/// edges. Returns `layer -> sorted switch indices`; switches unreachable
/// from the initial nodes are absent.
pub fn layer_structure(
	switches: &[Switch],
	initial: &BTreeSet<String>,
) -> BTreeMap<usize, Vec<usize>> {
	let mut left_node_to_switch: HashMap<&str, usize> = HashMap::new();
	for (idx, switch) in switches.iter().enumerate() {
		for node in &switch.left_nodes {
			left_node_to_switch.insert(node, idx);
		}
	}

	let mut waiting: Vec<(&str, usize)> = switches
		.iter()
		.flat_map(|switch| switch.left_nodes.iter())
		.filter(|node| initial.contains(*node))
		.map(|node| (node.as_str(), 0))
		.collect();

	let mut switch_to_layer: HashMap<usize, usize> = HashMap::new();
	while let Some((node, layer)) = waiting.pop() {
		let Some(&idx) = left_node_to_switch.get(node) else {
			continue;
		};
		if switch_to_layer.contains_key(&idx) {
			continue;
		}
		switch_to_layer.insert(idx, layer);
		waiting.extend(
			switches[idx]
				.right_nodes
				.iter()
				.map(|node| (node.as_str(), layer + 1)),
		);
	}

	let mut layers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
	for (idx, layer) in switch_to_layer {
		layers.entry(layer).or_default().push(idx);
	}
	for indices in layers.values_mut() {
		indices.sort_unstable();
	}
	layers
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assign(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
		pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
	}

	#[test]
	#[should_panic(expected = "duplicate variables")]
	fn rejects_shared_node() {
		Switch::balance(["a", "b"], ["b", "c"]);
	}

	#[test]
	fn degree_and_edges() {
		let switch = Switch::balance(["a", "b", "c"], ["d"]);
		assert_eq!(switch.degree(), 3);
		assert_eq!(switch.num_variables(), 4);
		assert_eq!(switch.num_edges(), 6);
	}

	#[test]
	fn one_switch_expansion() {
		// (a + b - 1)^2 = 2ab - a - b + 1
		let qubo = Qubo::from_switches(&[Switch::with_constants(["a", "b"], Vec::<&str>::new(), 0, 1)]);
		assert_eq!(qubo.variables(), ["a", "b"]);
		assert_eq!(qubo.linear()[&"a".to_string()], -1);
		assert_eq!(qubo.linear()[&"b".to_string()], -1);
		assert_eq!(qubo.quadratic()[&("a".to_string(), "b".to_string())], 2);
		assert_eq!(qubo.constant(), 1);

		assert_eq!(qubo.energy(&assign(&[("a", false), ("b", false)])), 1);
		assert_eq!(qubo.energy(&assign(&[("a", true), ("b", false)])), 0);
		assert_eq!(qubo.energy(&assign(&[("a", true), ("b", true)])), 1);
	}

	#[test]
	fn cross_switch_terms_accumulate() {
		// The pair (a, b) appears once per switch and must sum.
		let switches = [Switch::balance(["a", "b"], ["c"]), Switch::balance(["a", "b"], ["d"])];
		let qubo = Qubo::from_switches(&switches);
		assert_eq!(qubo.quadratic()[&("a".to_string(), "b".to_string())], 4);
	}

	#[test]
	fn cross_side_pairs_are_negative() {
		let qubo = Qubo::from_switches(&[Switch::balance(["a"], ["b"])]);
		assert_eq!(qubo.quadratic()[&("a".to_string(), "b".to_string())], -2);
		// (a - b)^2 is zero exactly on the balanced assignments.
		assert_eq!(qubo.energy(&assign(&[("a", false), ("b", false)])), 0);
		assert_eq!(qubo.energy(&assign(&[("a", true), ("b", true)])), 0);
		assert_eq!(qubo.energy(&assign(&[("a", true), ("b", false)])), 1);
	}

	#[test]
	fn merge_sums_coefficients() {
		let mut qubo = Qubo::from_switches(&[Switch::balance(["a"], ["b"])]);
		let other = Qubo::from_switches(&[Switch::balance(["a"], ["c"])]);
		qubo.merge(&other);
		assert_eq!(qubo.variables(), ["a", "b", "c"]);
		assert_eq!(qubo.linear()[&"a".to_string()], 2);
	}

	#[test]
	fn stats_count_auxiliaries_once() {
		let switches = [Switch::balance(["x0", "x1"], ["t0", "t1"]), Switch::balance(["t0", "t1"], ["t2"])];
		let originals: BTreeSet<String> = ["x0", "x1"].iter().map(|s| s.to_string()).collect();
		let stats = network_stats(&switches, &originals);
		assert_eq!(stats.num_switches, 2);
		assert_eq!(stats.num_auxiliary, 3);
		assert_eq!(stats.max_degree, 2);
		assert_eq!(stats.num_edges, 6 + 3);
	}

	#[test]
	fn layers_follow_producer_consumer_edges() {
		let switches = [
			Switch::balance(["x0", "x1"], ["t0", "t1"]),
			Switch::balance(["t0", "t1"], ["t2"]),
		];
		let initial: BTreeSet<String> = ["x0", "x1"].iter().map(|s| s.to_string()).collect();
		let layers = layer_structure(&switches, &initial);
		assert_eq!(layers[&0], [0]);
		assert_eq!(layers[&1], [1]);
	}
}
