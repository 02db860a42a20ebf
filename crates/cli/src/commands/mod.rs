//! CLI command implementations

pub mod check;
pub mod infer;
pub mod validate;
