pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod github;
pub mod page;
pub mod settings;
pub mod utils;
