//! Common component tests.
//!
//! This module contains unit tests for the shared error types.
