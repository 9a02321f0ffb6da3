//! Command handlers for CLI subcommands

mod cast;
mod check;
mod completions;
mod render;
mod utils;

pub use cast::handle_cast;
pub use check::handle_check;
pub use completions::handle_completions;
pub use render::handle_render;
