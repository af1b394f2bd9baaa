//! Particle population and per-frame simulation math.
//!
//! [`ParticleField`] owns the current population and advances it one Euler
//! step per display frame with toroidal wrap-around at the viewport edges.
//! Everything here is pure in-memory math; drawing lives in `render` and
//! lifecycle/scheduling in `state`, so this module tests without a canvas.

use super::rng::RandomSource;
use super::theme::FieldConfig;

/// A single drifting particle.
///
/// Velocity, size, and opacity are fixed at creation; only the position
/// mutates, once per frame.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub opacity: f64,
}

/// A link segment between two nearby particles, ready to stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	/// Stroke alpha, decaying linearly with pair distance.
	pub alpha: f64,
}

/// The particle population over one viewport-sized region.
///
/// Invariant: every particle coordinate lies in `[0, dimension)` between
/// frames. Regeneration replaces the whole population; size never changes
/// in place.
pub struct ParticleField {
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
}

impl ParticleField {
	/// Population size for a viewport: one particle per
	/// `area_per_particle` px², capped at `max_particles`.
	pub fn population_size(config: &FieldConfig, width: f64, height: f64) -> usize {
		if width <= 0.0 || height <= 0.0 || config.area_per_particle <= 0.0 {
			return 0;
		}
		let by_area = (width * height / config.area_per_particle).floor() as usize;
		by_area.min(config.max_particles)
	}

	/// Create an empty field; call [`regenerate`](Self::regenerate) to populate.
	pub fn empty() -> Self {
		Self {
			particles: Vec::new(),
			width: 0.0,
			height: 0.0,
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	/// Discard the current population and generate a fresh one for the
	/// given viewport. Idempotent; no particle state survives the call.
	pub fn regenerate(
		&mut self,
		config: &FieldConfig,
		width: f64,
		height: f64,
		rng: &mut impl RandomSource,
	) {
		let count = Self::population_size(config, width, height);
		self.width = width;
		self.height = height;
		self.particles.clear();
		self.particles.reserve(count);

		for _ in 0..count {
			self.particles.push(Particle {
				x: rng.next() * width,
				y: rng.next() * height,
				vx: (rng.next() - 0.5) * config.drift,
				vy: (rng.next() - 0.5) * config.drift,
				size: rng.range(config.size_min, config.size_max),
				opacity: rng.range(config.opacity_min, config.opacity_max),
			});
		}
	}

	/// Advance every particle one frame: add velocity, then wrap into
	/// `[0, dimension)` on both axes.
	pub fn advance(&mut self) {
		for p in &mut self.particles {
			p.x = wrap(p.x + p.vx, self.width);
			p.y = wrap(p.y + p.vy, self.height);
		}
	}

	/// Link segments for the current frame.
	///
	/// Pairs closer than `link_distance` qualify, visited in population
	/// order (outer `i`, inner `j = i + 1`), truncated at `max_links`.
	/// The truncation is a cost bound, not a closest-pairs selection.
	pub fn links(&self, config: &FieldConfig) -> Vec<Link> {
		let mut links = Vec::new();

		'outer: for (i, a) in self.particles.iter().enumerate() {
			for b in &self.particles[i + 1..] {
				if links.len() >= config.max_links {
					break 'outer;
				}
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				let distance = (dx * dx + dy * dy).sqrt();
				if distance < config.link_distance {
					links.push(Link {
						x1: a.x,
						y1: a.y,
						x2: b.x,
						y2: b.y,
						alpha: config.link_alpha * (1.0 - distance / config.link_distance),
					});
				}
			}
		}

		links
	}
}

/// Wrap a coordinate into `[0, dim)`.
///
/// Euclidean remainder handles arbitrary overshoot in either direction; the
/// final guard catches rounding that would land exactly on `dim`.
fn wrap(value: f64, dim: f64) -> f64 {
	if dim <= 0.0 {
		return 0.0;
	}
	let wrapped = value.rem_euclid(dim);
	if wrapped >= dim { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::rng::HashRandom;

	fn field_for(width: f64, height: f64) -> ParticleField {
		let mut field = ParticleField::empty();
		let mut rng = HashRandom::new(9);
		field.regenerate(&FieldConfig::default(), width, height, &mut rng);
		field
	}

	fn in_bounds(field: &ParticleField) -> bool {
		field
			.particles
			.iter()
			.all(|p| (0.0..field.width()).contains(&p.x) && (0.0..field.height()).contains(&p.y))
	}

	#[test]
	fn population_size_follows_area_formula() {
		let config = FieldConfig::default();
		// 1920x1080 = 2073600 px² -> 103 by area, capped at 50
		assert_eq!(ParticleField::population_size(&config, 1920.0, 1080.0), 50);
		// 800x600 = 480000 px² -> 24
		assert_eq!(ParticleField::population_size(&config, 800.0, 600.0), 24);
		// Below one particle's worth of area
		assert_eq!(ParticleField::population_size(&config, 100.0, 100.0), 0);
		assert_eq!(ParticleField::population_size(&config, 0.0, 1080.0), 0);
	}

	#[test]
	fn regenerate_places_particles_in_bounds() {
		let field = field_for(800.0, 600.0);
		assert_eq!(field.particles.len(), 24);
		assert!(in_bounds(&field));
	}

	#[test]
	fn generated_attributes_stay_in_configured_ranges() {
		let field = field_for(1920.0, 1080.0);
		for p in &field.particles {
			assert!((-0.15..0.15).contains(&p.vx));
			assert!((-0.15..0.15).contains(&p.vy));
			assert!((0.5..2.0).contains(&p.size));
			assert!((0.05..0.25).contains(&p.opacity));
		}
	}

	#[test]
	fn regenerate_replaces_the_whole_population() {
		let mut field = field_for(800.0, 600.0);
		let before: Vec<f64> = field.particles.iter().map(|p| p.x).collect();
		let mut rng = HashRandom::new(1234);
		field.regenerate(&FieldConfig::default(), 800.0, 600.0, &mut rng);
		let after: Vec<f64> = field.particles.iter().map(|p| p.x).collect();
		assert_eq!(before.len(), after.len());
		assert_ne!(before, after);
	}

	#[test]
	fn advance_keeps_positions_in_bounds() {
		let mut field = field_for(800.0, 600.0);
		for _ in 0..10_000 {
			field.advance();
			assert!(in_bounds(&field));
		}
	}

	#[test]
	fn advance_wraps_instead_of_clamping() {
		let mut field = field_for(800.0, 600.0);
		field.particles[0].x = field.width() - 0.01;
		field.particles[0].vx = 1.0;
		field.advance();
		let x = field.particles[0].x;
		assert!((0.0..1.0).contains(&x), "expected wrap near zero, got {x}");

		field.particles[0].x = 0.005;
		field.particles[0].vx = -1.0;
		field.advance();
		let x = field.particles[0].x;
		assert!(
			(field.width() - 1.0..field.width()).contains(&x),
			"expected wrap near far edge, got {x}"
		);
	}

	#[test]
	fn links_cap_truncates_in_population_order() {
		let config = FieldConfig::default();
		let mut field = ParticleField::empty();
		field.width = 500.0;
		field.height = 500.0;
		// 20 particles in a tight cluster: 190 qualifying pairs, well over the cap
		for i in 0..20 {
			field.particles.push(Particle {
				x: 100.0 + i as f64,
				y: 100.0,
				vx: 0.0,
				vy: 0.0,
				size: 1.0,
				opacity: 0.1,
			});
		}

		let links = field.links(&config);
		assert_eq!(links.len(), config.max_links);
		// Outer-then-inner order: the first links pair particle 0 with 1, 2, 3...
		assert_eq!((links[0].x1, links[0].x2), (100.0, 101.0));
		assert_eq!((links[1].x1, links[1].x2), (100.0, 102.0));
		assert_eq!((links[18].x1, links[18].x2), (100.0, 119.0));
		// Particle 0 has 19 partners, so link 19 starts the second outer pass
		assert_eq!((links[19].x1, links[19].x2), (101.0, 102.0));
	}

	#[test]
	fn link_alpha_decays_linearly_with_distance() {
		let config = FieldConfig::default();
		let mut field = ParticleField::empty();
		field.width = 500.0;
		field.height = 500.0;
		for x in [100.0, 150.0] {
			field.particles.push(Particle {
				x,
				y: 100.0,
				vx: 0.0,
				vy: 0.0,
				size: 1.0,
				opacity: 0.1,
			});
		}

		let links = field.links(&config);
		assert_eq!(links.len(), 1);
		// 50 px of a 100 px threshold: half the base alpha
		assert!((links[0].alpha - config.link_alpha * 0.5).abs() < 1e-12);
	}

	#[test]
	fn distant_pairs_produce_no_links() {
		let config = FieldConfig::default();
		let mut field = ParticleField::empty();
		field.width = 500.0;
		field.height = 500.0;
		for x in [0.0, 150.0, 350.0] {
			field.particles.push(Particle {
				x,
				y: 100.0,
				vx: 0.0,
				vy: 0.0,
				size: 1.0,
				opacity: 0.1,
			});
		}
		assert!(field.links(&config).is_empty());
	}

	#[test]
	fn empty_field_is_inert() {
		let mut field = field_for(100.0, 100.0);
		assert!(field.particles.is_empty());
		field.advance();
		assert!(field.links(&FieldConfig::default()).is_empty());
	}
}
