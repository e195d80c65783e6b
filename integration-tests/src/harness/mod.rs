pub mod fixtures;
pub mod server;
pub mod tracing;

pub use fixtures::LogFixture;
pub use server::TestServer;
pub use tracing::{CapturedEvent, init_test_tracing};
