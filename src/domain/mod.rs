pub mod error;
pub mod events;
pub mod identifier;
pub mod store;
pub mod tag_set;
pub mod view;
