//! Test suite for Courier
//!
//! This module organizes all integration and property tests

pub mod common;
pub mod property;
