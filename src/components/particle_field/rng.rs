//! Injectable random-number source for particle generation.
//!
//! The field only ever needs uniform values in `[0, 1)`, so the seam is a
//! single-method trait. Production code draws from the browser's
//! `Math.random`; tests and reproducible fields use the deterministic
//! sine-hash generator.

/// Source of uniform random values in `[0, 1)`.
pub trait RandomSource {
	/// Next uniform value in `[0, 1)`.
	fn next(&mut self) -> f64;

	/// Uniform value in `[lo, hi)`.
	fn range(&mut self, lo: f64, hi: f64) -> f64 {
		lo + self.next() * (hi - lo)
	}
}

/// Browser-backed source using `Math.random`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
	fn next(&mut self) -> f64 {
		js_sys::Math::random()
	}
}

/// Deterministic sine-hash source, seeded by a counter.
///
/// Produces the same sequence for the same seed on every platform, which
/// keeps field generation reproducible without pulling in a PRNG crate.
#[derive(Clone, Copy, Debug)]
pub struct HashRandom {
	state: f64,
}

impl HashRandom {
	pub fn new(seed: u64) -> Self {
		Self {
			state: seed as f64,
		}
	}
}

impl RandomSource for HashRandom {
	fn next(&mut self) -> f64 {
		self.state += 1.0;
		let x = (self.state * 12.9898 + self.state * 78.233).sin() * 43758.5453;
		x - x.floor()
	}
}
