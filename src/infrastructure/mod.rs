// src/infrastructure/mod.rs
pub mod json;
pub mod terminal_view;

pub use terminal_view::TerminalView;
