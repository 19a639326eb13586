pub mod display;
pub mod pipeline;

pub use display::render_panels;
pub use pipeline::{PageSource, RunFlow, RunOutput};
