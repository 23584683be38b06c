//! Utility modules.

/// Log sanitization utilities to prevent credential and payload exposure.
pub mod log_sanitizer;
