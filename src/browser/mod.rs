pub mod headless;

pub use headless::{active_sessions, BrowserSession};
