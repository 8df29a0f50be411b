pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod georef;
pub mod io;
pub mod math;
pub mod model;
pub mod navigation;
pub mod operations;
pub mod pipeline;

pub use error::{NavError, Result};
