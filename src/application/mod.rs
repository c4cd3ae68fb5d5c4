// src/application/mod.rs
pub mod controller;
pub mod error;

pub use controller::{Skip, TagSetController, Transition};
