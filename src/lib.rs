#![forbid(unsafe_code)]

pub mod attach;
pub mod builders;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod naming;
pub mod project;
pub mod removal;
pub mod schema;
pub mod store;
pub mod toolkit;
pub mod utils;
