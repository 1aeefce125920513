//! Collision-free prefixes for auxiliary variables.
//!
//! Every constraint build consumes one prefix and namespaces all auxiliary
//! variables it mints with it, so QUBOs built from the same [`Namespace`]
//! can be summed without name collisions.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotone counter handing out auxiliary-variable prefixes (`C0`, `C1`, ...).
///
/// The counter is consumed once per constraint build, not once per
/// auxiliary variable. It never resets on its own; call [`Namespace::reset`]
/// to start over (mainly useful for tests and reproducible variable names).
/// The increment is atomic, so a `Namespace` may be shared across threads.
#[derive(Debug, Default)]
pub struct Namespace {
	counter: AtomicU64,
}

impl Namespace {
	pub const fn new() -> Self {
		Self {
			counter: AtomicU64::new(0),
		}
	}

	/// The next unused prefix.
	pub fn next_prefix(&self) -> String {
		let n = self.counter.fetch_add(1, Ordering::Relaxed);
		format!("C{n}")
	}

	/// Set the counter back to zero, so the next build uses `C0` again.
	pub fn reset(&self) {
		self.counter.store(0, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefixes_are_sequential() {
		let ns = Namespace::new();
		assert_eq!(ns.next_prefix(), "C0");
		assert_eq!(ns.next_prefix(), "C1");
		assert_eq!(ns.next_prefix(), "C2");
	}

	#[test]
	fn reset_starts_over() {
		let ns = Namespace::new();
		ns.next_prefix();
		ns.next_prefix();
		ns.reset();
		assert_eq!(ns.next_prefix(), "C0");
	}

	#[test]
	fn shared_across_threads_without_duplicates() {
		use std::collections::HashSet;
		use std::sync::Arc;

		let ns = Arc::new(Namespace::new());
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let ns = Arc::clone(&ns);
				std::thread::spawn(move || (0..100).map(|_| ns.next_prefix()).collect::<Vec<_>>())
			})
			.collect();
		let mut seen = HashSet::new();
		for handle in handles {
			for prefix in handle.join().unwrap() {
				assert!(seen.insert(prefix), "duplicate prefix handed out");
			}
		}
		assert_eq!(seen.len(), 400);
	}
}
