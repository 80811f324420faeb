//! Client implementations.

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "http")]
pub mod tpm;
