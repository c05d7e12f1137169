pub mod aggregate;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod report;

#[cfg(test)]
mod unit_tests;

pub use engine::Engine;
pub use report::{ClientSummary, Summary};
