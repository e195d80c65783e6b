mod columns;
mod endpoint;
mod request;
mod response;


pub use columns::LogColumnMap;
pub use endpoint::Endpoint;
pub use request::*;
pub use response::*;
