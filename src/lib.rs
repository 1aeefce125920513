//! Sparse QUBO formulations of counting constraints over binary variables.
//!
//! A counting constraint ("exactly one of these is 1", "the sum equals k",
//! "the sum lies in [lo, hi]") is decomposed by a switching network into a
//! cascade of small balance constraints ([`Switch`]es), which fold into one
//! quadratic objective ([`Qubo`]) whose zero-energy assignments are exactly
//! the satisfying ones. The network topologies trade auxiliary-variable
//! count against switch degree, so the resulting QUBO can be shaped for
//! sparse solver connectivity.
//!
//! ```
//! use sparse_qubo::{Constraint, ConstraintKind, Namespace, NetworkType};
//!
//! let ns = Namespace::new();
//! let qubo = Constraint::new(["x0", "x1", "x2", "x3"], ConstraintKind::OneHot)
//! 	.network(NetworkType::DivideAndConquer)
//! 	.qubo(&ns)
//! 	.unwrap();
//! assert_eq!(&qubo.variables()[..4], ["x0", "x1", "x2", "x3"]);
//! ```
//!
//! QUBOs built from the same [`Namespace`] use disjoint auxiliary-variable
//! names and can be summed with [`Qubo::merge`].

pub mod constraint;
pub mod error;
pub mod network;
pub mod node;
pub mod prefix;
pub mod switch;

pub use constraint::{initial_nodes, Constraint, ConstraintKind};
pub use error::{Error, Result};
pub use network::{NetworkType, SwitchingNetwork};
pub use node::{Node, NodeAttribute};
pub use prefix::Namespace;
pub use switch::{layer_structure, network_stats, NetworkStats, Qubo, Switch};
