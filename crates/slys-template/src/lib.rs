//! # Slys Template
//!
//! Rendering of view and layout templates.
//!
//! The pipeline only needs one operation from a template engine: render the
//! file at a path with a set of bound variables. [`TemplateRenderer`] is that
//! seam, [`TeraRenderer`] the default implementation, and
//! [`TemplateLocator`] maps dispatch targets and layout names to files.

pub mod locator;
pub mod renderer;

pub use locator::TemplateLocator;
pub use renderer::{TemplateRenderer, TeraRenderer};
