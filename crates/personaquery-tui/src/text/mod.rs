//! Text layout helpers shared by the widgets.

mod width;
mod wrap;

pub use width::{truncate_to_width, visual_width};
pub use wrap::{clamp_lines, wrap_indented, wrap_text};
