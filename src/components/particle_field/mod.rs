//! Ambient particle field background component.
//!
//! Renders a bounded set of slowly drifting translucent discs on an HTML
//! canvas, with faint lines linking nearby pairs:
//! - One Euler step per display frame, toroidal wrap at the viewport edges
//! - Population regenerated after window resizes settle (debounced)
//! - Animation suspended while the tab is hidden, resumed in place
//!
//! # Example
//!
//! ```ignore
//! use particle_field::{ParticleFieldCanvas, FieldConfig};
//!
//! view! { <ParticleFieldCanvas config=FieldConfig::default() /> }
//! ```

mod component;
mod field;
mod render;
pub mod rng;
mod state;
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use field::{Link, Particle, ParticleField};
pub use state::{FieldRenderer, Phase};
pub use theme::{Color, FieldConfig};
