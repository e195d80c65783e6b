pub mod api;
pub mod cli;
pub mod conf;
pub mod ctx;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
mod scan;
pub mod search;
pub mod server;
pub mod stats;
pub mod tokenize;
