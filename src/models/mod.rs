pub mod entity;
pub mod search;
pub mod settings;
