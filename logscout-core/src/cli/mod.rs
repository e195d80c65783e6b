pub mod query;

#[cfg(test)]
mod tests;

pub use query::{QueryCmd, run_query};
