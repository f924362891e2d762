//! Integration tests for FreshTally.
//!
//! These drive the real router (controllers, error mapping, JSON shapes)
//! over an in-memory database, plus the rollover flow end to end.

mod cases_api_test;

pub mod support;
