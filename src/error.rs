/// Errors surfaced by the constraint compiler.
///
/// All of these are programmer/input errors: validation happens before any
/// switch is constructed, nothing is retried, and there is no partial state
/// to roll back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The constraint bounds or variable list are inconsistent, or the
	/// selected topology cannot decompose this target pattern.
	#[error("invalid constraint: {0}")]
	InvalidConstraint(String),
	/// The selected topology cannot be built for this input size.
	#[error("invalid network size: {0}")]
	InvalidNetworkSize(String),
	/// A tuning parameter is outside its admissible range.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
