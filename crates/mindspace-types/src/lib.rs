//! Shared domain types for MindSpace.
//!
//! This crate contains the core domain types used across the MindSpace client:
//! Identity, ProfileRecord, conversation Turns, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies: only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
