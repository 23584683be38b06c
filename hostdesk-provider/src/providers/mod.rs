//! Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "opensrs")]
mod opensrs;
#[cfg(feature = "opensrs-email")]
mod opensrs_email;

#[cfg(feature = "opensrs")]
pub use opensrs::OpensrsProvider;
#[cfg(feature = "opensrs-email")]
pub use opensrs_email::OpensrsEmailProvider;
