mod common;
mod config;
mod decode;
mod export;
mod extract;
mod image;
mod orchestrator;
mod pack;
mod precision;
mod resample;

pub mod prelude;

pub use prelude::*;
