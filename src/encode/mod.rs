//! Filter-graph compilation and the native encoder process.

/// Quality-tier to encoder argument tables.
pub mod args;
/// Typed filter graph and its compiler.
pub mod filter;
/// Output probing.
pub mod probe;
/// Encoder subprocess with timeout and cancellation.
pub mod runner;
