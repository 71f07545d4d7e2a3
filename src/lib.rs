pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod mapper;
pub mod model;
pub mod parser;
pub mod templates;
