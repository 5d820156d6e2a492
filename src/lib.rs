// Carousel Library
// Composes a horizontal strip of remote images with an optional "+N" counter

pub mod carousel;
pub mod compose;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;
pub mod source;
pub mod text;

pub use carousel::{Carousel, CarouselParams, Orchestrator};
pub use error::CarouselError;
