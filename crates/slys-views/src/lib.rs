//! # Slys Views
//!
//! The presentation half of a request cycle.
//!
//! - [`View`]: assigns plus an optional template
//! - [`RenderContext`]: whether the cycle answers with HTML or JSON
//! - [`Layout`]: named placeholders resolved into views and composed into a
//!   page
//!
//! The layout never dispatches by itself. It drives a [`Dispatch`]
//! implementation provided by the application.

pub mod context;
pub mod layout;
pub mod view;

pub use context::{RenderContext, Rendered};
pub use layout::{CONTENT, Dispatch, Layout, LayoutState, Placeholder, PlaceholderSource};
pub use view::View;
