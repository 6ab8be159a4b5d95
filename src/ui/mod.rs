//! Plain-text presentation of the gallery.
//!
//! Rendering is a pure function of [`App`](crate::app::App) state; the binary
//! prints the result.

mod render;

pub use render::{format_pub_date, render_card, render_chips, render_gallery};
