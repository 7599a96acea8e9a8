pub mod board;
pub mod config;
pub mod store;
pub mod tui;
