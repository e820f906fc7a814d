//! Consolidated test modules.
//!
//! End-to-end login scenarios: configuration in, citizen out.
