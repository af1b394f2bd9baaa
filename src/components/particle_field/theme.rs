//! Visual configuration for the particle field.
//!
//! All tunables live in [`FieldConfig`], which deserializes from the optional
//! `<script id="particle-config">` JSON blob with per-field defaults, so a
//! host page can override any single knob without restating the rest.

use serde::Deserialize;

/// RGB color rendered as CSS `rgba()` with a per-draw alpha.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// CSS `rgba()` string with the given alpha.
	pub fn to_css_alpha(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
	}
}

/// Complete particle field configuration.
///
/// Defaults reproduce the portfolio background: up to 50 slow blue particles,
/// one per 20000 px² of viewport, faintly linked under 100 px.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Shared color of particles and links.
	pub color: Color,
	/// Hard cap on the population size.
	pub max_particles: usize,
	/// Viewport area (px²) budgeted per particle.
	pub area_per_particle: f64,
	/// Full width of the per-axis velocity range, centered on zero.
	pub drift: f64,
	/// Minimum disc radius (px).
	pub size_min: f64,
	/// Maximum disc radius (px), exclusive.
	pub size_max: f64,
	/// Minimum disc alpha.
	pub opacity_min: f64,
	/// Maximum disc alpha, exclusive.
	pub opacity_max: f64,
	/// Pair distance (px) under which a link is drawn.
	pub link_distance: f64,
	/// Cap on link segments per frame.
	pub max_links: usize,
	/// Link alpha at zero distance, fading linearly to zero at `link_distance`.
	pub link_alpha: f64,
	/// Link stroke width (px).
	pub link_width: f64,
	/// Resize quiescence delay (ms) before the field regenerates.
	pub resize_debounce_ms: f64,
	/// Opacity applied to the whole canvas element.
	pub canvas_opacity: f64,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			color: Color::rgb(59, 130, 246),
			max_particles: 50,
			area_per_particle: 20000.0,
			drift: 0.3,
			size_min: 0.5,
			size_max: 2.0,
			opacity_min: 0.05,
			opacity_max: 0.25,
			link_distance: 100.0,
			max_links: 30,
			link_alpha: 0.05,
			link_width: 0.3,
			resize_debounce_ms: 250.0,
			canvas_opacity: 0.4,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn color_formats_css_rgba() {
		let c = Color::rgb(59, 130, 246);
		assert_eq!(c.to_css_alpha(0.25), "rgba(59, 130, 246, 0.25)");
	}

	#[test]
	fn empty_json_yields_defaults() {
		let config: FieldConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config.max_particles, 50);
		assert_eq!(config.link_distance, 100.0);
		assert_eq!(config.resize_debounce_ms, 250.0);
	}

	#[test]
	fn partial_json_overrides_single_field() {
		let config: FieldConfig =
			serde_json::from_str(r#"{"max_particles": 10, "color": {"r": 1, "g": 2, "b": 3}}"#)
				.unwrap();
		assert_eq!(config.max_particles, 10);
		assert_eq!(config.color.r, 1);
		// Untouched knobs keep their defaults
		assert_eq!(config.drift, 0.3);
	}
}
