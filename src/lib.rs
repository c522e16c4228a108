pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod matcher;
pub mod scanner;
pub mod store;
