//! HTTP surface: `POST /<prefix>/<endpoint>` with JSON bodies, served by pingora.

mod gateway;
mod handler;
mod reply;


pub use gateway::ApiGateway;
pub use handler::{ApiHandler, route};
