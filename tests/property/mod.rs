//! Property-based tests

mod conversation_proptest;
