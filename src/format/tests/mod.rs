//! Unit tests for model file handling.
//!
//! These tests verify schema validation, file reading and writing, and
//! load/save round trips through a live model.

mod roundtrip_tests;
