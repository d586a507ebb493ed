//! Text rendering for the inspector CLI

mod render;
mod utils;

pub use render::Renderer;
