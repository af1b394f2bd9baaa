//! Canvas drawing for the particle field.
//!
//! One pass per frame: clear, fill every disc, stroke the capped link set.
//! The canvas stays transparent so the field reads as page background.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::field::ParticleField;
use super::theme::FieldConfig;

/// Draws the field's current frame to the canvas.
pub fn draw(field: &ParticleField, ctx: &CanvasRenderingContext2d, config: &FieldConfig) {
	ctx.clear_rect(0.0, 0.0, field.width(), field.height());

	for p in &field.particles {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, p.size, 0.0, PI * 2.0);
		ctx.set_fill_style_str(&config.color.to_css_alpha(p.opacity));
		ctx.fill();
	}

	ctx.set_line_width(config.link_width);
	for link in field.links(config) {
		ctx.begin_path();
		ctx.move_to(link.x1, link.y1);
		ctx.line_to(link.x2, link.y2);
		ctx.set_stroke_style_str(&config.color.to_css_alpha(link.alpha));
		ctx.stroke();
	}
}
