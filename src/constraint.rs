//! Counting constraints over binary variables and their compilation.
//!
//! A [`Constraint`] pairs an ordered variable list with a [`ConstraintKind`]
//! and a network topology; building it runs the classifier, the selected
//! generator, auxiliary-name prefixing, and the switch-to-QUBO fold.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::NetworkType;
use crate::node::{Node, NodeAttribute};
use crate::prefix::Namespace;
use crate::switch::{Qubo, Switch};

/// Kind of counting constraint over the sum of binary variables.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConstraintKind {
	/// Exactly one variable is 1.
	OneHot,
	/// The sum equals the given value.
	EqualTo(i64),
	/// The sum is at most the given value.
	LessEqual(i64),
	/// The sum is at least the given value.
	GreaterEqual(i64),
	/// The sum lies in the given inclusive range.
	Clamp(i64, i64),
}

/// Build the left and right node lists a switching network balances.
///
/// The left side carries the caller's variables as free nodes. The right
/// side is the sorted unary encoding of the constraint: reading terminal
/// positions from last to first, `AlwaysOne` positions force the count up
/// to the bound, `AlwaysZero` positions cap it, and `NotCare` positions are
/// the bounded slack of the inequality kinds.
pub fn initial_nodes(
	variables: &[String],
	kind: ConstraintKind,
) -> Result<(Vec<Node>, Vec<Node>)> {
	let n = variables.len() as i64;
	if n == 0 {
		return Err(Error::InvalidConstraint(
			"constraint requires at least one variable".to_string(),
		));
	}
	let mut seen = HashSet::new();
	for variable in variables {
		if !seen.insert(variable.as_str()) {
			return Err(Error::InvalidConstraint(format!(
				"duplicate variable {variable}",
			)));
		}
	}

	let bound_in_range = |k: i64| (0..=n).contains(&k);
	match kind {
		ConstraintKind::OneHot => {}
		ConstraintKind::EqualTo(k) | ConstraintKind::LessEqual(k) | ConstraintKind::GreaterEqual(k) => {
			if !bound_in_range(k) {
				return Err(Error::InvalidConstraint(format!(
					"bound {k} must be between 0 and {n}",
				)));
			}
		}
		ConstraintKind::Clamp(lo, hi) => {
			if !bound_in_range(lo) || !bound_in_range(hi) || lo > hi {
				return Err(Error::InvalidConstraint(format!(
					"bounds must satisfy 0 <= {lo} <= {hi} <= {n}",
				)));
			}
		}
	}

	let terminal_attribute = |i: i64| match kind {
		ConstraintKind::OneHot => {
			if i < n - 1 {
				NodeAttribute::AlwaysZero
			} else {
				NodeAttribute::AlwaysOne
			}
		}
		ConstraintKind::EqualTo(k) => {
			if i < n - k {
				NodeAttribute::AlwaysZero
			} else {
				NodeAttribute::AlwaysOne
			}
		}
		ConstraintKind::LessEqual(k) => {
			if i < n - k {
				NodeAttribute::AlwaysZero
			} else {
				NodeAttribute::NotCare
			}
		}
		ConstraintKind::GreaterEqual(k) => {
			if i < n - k {
				NodeAttribute::NotCare
			} else {
				NodeAttribute::AlwaysOne
			}
		}
		ConstraintKind::Clamp(lo, hi) => {
			if i < n - hi {
				NodeAttribute::AlwaysZero
			} else if i < n - lo {
				NodeAttribute::NotCare
			} else {
				NodeAttribute::AlwaysOne
			}
		}
	};

	let left_nodes = variables.iter().map(|name| Node::free(name.as_str())).collect();
	let right_nodes = (0..n)
		.map(|i| Node {
			name: format!("R{i}"),
			attribute: terminal_attribute(i),
		})
		.collect();
	Ok((left_nodes, right_nodes))
}

/// Rename every auxiliary variable (anything outside the caller's set) by
/// prepending the prefix, so independently built QUBOs can be summed.
fn prefix_auxiliaries(switches: Vec<Switch>, originals: &HashSet<&str>, prefix: &str) -> Vec<Switch> {
	let renamed = |name: &String| -> String {
		if originals.contains(name.as_str()) {
			name.clone()
		} else {
			format!("{prefix}_{name}")
		}
	};
	switches
		.into_iter()
		.map(|switch| {
			Switch::with_constants(
				switch.left_nodes().iter().map(renamed),
				switch.right_nodes().iter().map(renamed),
				switch.left_constant(),
				switch.right_constant(),
			)
		})
		.collect()
}

/// A counting constraint plus the formulation used to compile it.
///
/// Compilation is a pure function of this description and the consumed
/// prefix; the [`Namespace`] is the only shared state.
#[derive(Clone, Debug)]
pub struct Constraint {
	variables: Vec<String>,
	kind: ConstraintKind,
	network: NetworkType,
	threshold: Option<usize>,
	max_degree: Option<usize>,
	prefix: Option<String>,
}

impl Constraint {
	pub fn new(
		variables: impl IntoIterator<Item = impl Into<String>>,
		kind: ConstraintKind,
	) -> Self {
		Self {
			variables: variables.into_iter().map(Into::into).collect(),
			kind,
			network: NetworkType::DivideAndConquer,
			threshold: None,
			max_degree: None,
			prefix: None,
		}
	}

	/// Select the switching-network topology. Defaults to
	/// [`NetworkType::DivideAndConquer`].
	pub fn network(mut self, network: NetworkType) -> Self {
		self.network = network;
		self
	}

	/// Stop recursive subdivision once a group is this small, trading
	/// auxiliary variables for larger switch degrees.
	pub fn threshold(mut self, threshold: usize) -> Self {
		self.threshold = Some(threshold);
		self
	}

	/// Degree bound for [`NetworkType::ClosNetworkMaxDegree`].
	pub fn max_degree(mut self, max_degree: usize) -> Self {
		self.max_degree = Some(max_degree);
		self
	}

	/// Namespace auxiliary variables with this token instead of consuming
	/// one from the [`Namespace`].
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Compile to a switch network with namespaced auxiliary variables.
	pub fn switches(&self, namespace: &Namespace) -> Result<Vec<Switch>> {
		if self.threshold == Some(0) {
			return Err(Error::InvalidConfiguration(
				"threshold must be at least 1".to_string(),
			));
		}
		let (left_nodes, right_nodes) = initial_nodes(&self.variables, self.kind)?;
		let network = self.network.build(self.max_degree)?;
		debug!(
			network = %self.network,
			num_variables = self.variables.len(),
			"generating switching network",
		);
		let switches = network.generate(&left_nodes, &right_nodes, self.threshold)?;
		let prefix = match &self.prefix {
			Some(prefix) => prefix.clone(),
			None => namespace.next_prefix(),
		};
		let originals: HashSet<&str> = self.variables.iter().map(String::as_str).collect();
		Ok(prefix_auxiliaries(switches, &originals, &prefix))
	}

	/// Compile all the way down to an aggregated QUBO.
	///
	/// The QUBO's zero-energy assignments, restricted to the caller's
	/// variables, are exactly those satisfying the constraint; the caller's
	/// variables keep their order at the front of the variable list.
	pub fn qubo(&self, namespace: &Namespace) -> Result<Qubo> {
		let switches = self.switches(namespace)?;
		let mut qubo = Qubo::new();
		for variable in &self.variables {
			qubo.declare_variable(variable.clone());
		}
		for switch in &switches {
			qubo.fold_switch(switch);
		}
		debug!(
			num_switches = switches.len(),
			num_variables = qubo.variables().len(),
			"compiled constraint to QUBO",
		);
		Ok(qubo)
	}

	/// The initial node names, useful for [`crate::switch::layer_structure`].
	pub fn variable_set(&self) -> BTreeSet<String> {
		self.variables.iter().cloned().collect()
	}
}
