mod app;
pub use app::*;

pub mod input;
pub mod rng;
pub mod screen;

mod browser_resize;
