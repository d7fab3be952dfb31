//! # Unit Components
//!
//! This module organizes tests for every building block of a system topology, from
//! unit parsing up to the plan handed to a simulator backend.


/// Tests for configuration defaults, JSON loading, and the build pipeline.
pub mod config;
