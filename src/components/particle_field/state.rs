//! Renderer lifecycle: visibility suspension, debounced resize, teardown.
//!
//! [`FieldRenderer`] owns the particle field and a small state machine driven
//! by discrete signals (visibility changed, resize observed, teardown
//! requested). Timing is expressed against caller-supplied `now` timestamps
//! in milliseconds rather than a real timer, so the frame loop polls the
//! debounce once per frame and every lifecycle rule is testable natively.

use log::debug;

use super::field::ParticleField;
use super::rng::RandomSource;
use super::theme::FieldConfig;

/// Scheduling state of the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Ticks run and the next frame gets scheduled.
	Active,
	/// Surface not visible: no ticks, no scheduling, state frozen.
	Suspended,
	/// Terminal. No signal leaves this phase.
	TornDown,
}

/// A resize waiting out its quiescence window.
#[derive(Clone, Copy, Debug)]
struct PendingResize {
	width: f64,
	height: f64,
	deadline: f64,
}

/// Particle field plus lifecycle state for one canvas instance.
///
/// Owned by a single component; nothing here is shared or process-global,
/// so independent instances coexist and tests drive one directly.
pub struct FieldRenderer<R: RandomSource> {
	field: ParticleField,
	config: FieldConfig,
	phase: Phase,
	pending_resize: Option<PendingResize>,
	rng: R,
}

impl<R: RandomSource> FieldRenderer<R> {
	/// New renderer with an empty field, starting Active.
	pub fn new(config: FieldConfig, rng: R) -> Self {
		Self {
			field: ParticleField::empty(),
			config,
			phase: Phase::Active,
			pending_resize: None,
			rng,
		}
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Whether ticks should run and frames be scheduled.
	pub fn is_active(&self) -> bool {
		self.phase == Phase::Active
	}

	/// Regenerate the population for a viewport. Idempotent; replaces any
	/// previous population outright. Ignored once torn down.
	pub fn initialize(&mut self, width: f64, height: f64) {
		if self.phase == Phase::TornDown {
			return;
		}
		self.field
			.regenerate(&self.config, width, height, &mut self.rng);
		debug!(
			"particle-field: initialized {} particles for {width}x{height}",
			self.field.particles.len()
		);
	}

	/// One simulation step. Drawing is the caller's second half of the frame.
	pub fn advance(&mut self) {
		if self.phase != Phase::Active {
			return;
		}
		self.field.advance();
	}

	/// Record a resize signal, restarting the quiescence window.
	pub fn on_resize(&mut self, width: f64, height: f64, now: f64) {
		if self.phase == Phase::TornDown {
			return;
		}
		self.pending_resize = Some(PendingResize {
			width,
			height,
			deadline: now + self.config.resize_debounce_ms,
		});
	}

	/// Apply a settled resize, if any.
	///
	/// Returns the new viewport size once the quiescence window has elapsed,
	/// after regenerating the population for it. A burst of resize signals
	/// therefore regenerates exactly once.
	pub fn poll_resize(&mut self, now: f64) -> Option<(f64, f64)> {
		if self.phase == Phase::TornDown {
			return None;
		}
		let pending = self.pending_resize?;
		if now < pending.deadline {
			return None;
		}
		self.pending_resize = None;
		self.initialize(pending.width, pending.height);
		Some((pending.width, pending.height))
	}

	/// Visibility lost: stop ticking, freeze all particle state.
	pub fn suspend(&mut self) {
		if self.phase == Phase::Active {
			self.phase = Phase::Suspended;
			debug!("particle-field: suspended");
		}
	}

	/// Visibility regained. Returns true when this call transitioned out of
	/// Suspended and the caller should schedule the next frame; suspension
	/// time does not advance the simulation.
	pub fn resume(&mut self) -> bool {
		if self.phase != Phase::Suspended {
			return false;
		}
		self.phase = Phase::Active;
		debug!("particle-field: resumed");
		true
	}

	/// Terminal shutdown: cancels the pending resize and refuses all later
	/// signals, so a late timer or frame callback is a no-op.
	pub fn teardown(&mut self) {
		self.phase = Phase::TornDown;
		self.pending_resize = None;
		debug!("particle-field: torn down");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::rng::HashRandom;

	fn renderer() -> FieldRenderer<HashRandom> {
		let mut r = FieldRenderer::new(FieldConfig::default(), HashRandom::new(5));
		r.initialize(800.0, 600.0);
		r
	}

	fn positions(r: &FieldRenderer<HashRandom>) -> Vec<(f64, f64)> {
		r.field().particles.iter().map(|p| (p.x, p.y)).collect()
	}

	#[test]
	fn starts_active_with_population() {
		let r = renderer();
		assert_eq!(r.phase(), Phase::Active);
		assert_eq!(r.field().particles.len(), 24);
	}

	#[test]
	fn resize_burst_regenerates_once_after_quiescence() {
		let mut r = renderer();
		let before = positions(&r);

		// Five signals inside one 250 ms window
		r.on_resize(900.0, 600.0, 0.0);
		r.on_resize(1000.0, 600.0, 50.0);
		r.on_resize(1100.0, 600.0, 100.0);
		r.on_resize(1200.0, 700.0, 150.0);
		r.on_resize(1280.0, 720.0, 200.0);

		// Window restarts on every signal: nothing settles before 200 + 250
		assert_eq!(r.poll_resize(249.0), None);
		assert_eq!(r.poll_resize(449.0), None);
		assert_eq!(positions(&r), before);

		// One regeneration, at the last observed size
		assert_eq!(r.poll_resize(450.0), Some((1280.0, 720.0)));
		assert_eq!(r.field().width(), 1280.0);
		assert_ne!(positions(&r), before);

		// Nothing left pending
		assert_eq!(r.poll_resize(10_000.0), None);
	}

	#[test]
	fn suspend_freezes_and_resume_continues_in_place() {
		let mut r = renderer();
		r.advance();
		let frozen = positions(&r);

		r.suspend();
		assert_eq!(r.phase(), Phase::Suspended);
		for _ in 0..100 {
			r.advance();
		}
		assert_eq!(positions(&r), frozen, "ticks must not run while suspended");

		assert!(r.resume());
		assert_eq!(positions(&r), frozen, "resume must not catch up missed frames");
		r.advance();
		assert_ne!(positions(&r), frozen);
	}

	#[test]
	fn resume_reports_transition_only_from_suspended() {
		let mut r = renderer();
		assert!(!r.resume(), "already active");
		r.suspend();
		assert!(r.resume());
		assert!(!r.resume(), "second resume is a no-op");
	}

	#[test]
	fn teardown_is_terminal() {
		let mut r = renderer();
		r.on_resize(1024.0, 768.0, 0.0);
		r.teardown();

		// Late debounce poll: cancelled, no regeneration
		assert_eq!(r.poll_resize(10_000.0), None);
		assert_eq!(r.field().width(), 800.0);

		// No signal leaves TornDown
		assert!(!r.resume());
		r.suspend();
		assert_eq!(r.phase(), Phase::TornDown);
		r.on_resize(1.0, 1.0, 0.0);
		assert_eq!(r.poll_resize(10_000.0), None);

		// Late frame callback: advance is inert
		let frozen = positions(&r);
		r.advance();
		assert_eq!(positions(&r), frozen);
	}

	#[test]
	fn initialize_is_idempotent_replacement() {
		let mut r = renderer();
		let first = positions(&r);
		r.initialize(800.0, 600.0);
		let second = positions(&r);
		assert_eq!(first.len(), second.len());
		assert_ne!(first, second, "no particle state survives reinitialization");
	}
}
