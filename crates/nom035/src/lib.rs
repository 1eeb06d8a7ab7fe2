pub mod assessment;
pub mod config;
pub mod error;
pub mod identity;
pub mod reporting;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
