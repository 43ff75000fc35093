pub mod arena;
pub mod config;
pub mod constants;
pub mod engine;
pub mod rating;
pub mod selector;
pub mod structures;
