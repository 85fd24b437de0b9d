//! Business logic and port trait definitions for MindSpace.
//!
//! This crate defines the "ports" (storage, identity provider, profile store,
//! completion service) that the infrastructure layer implements, plus the
//! session lifecycle, login sequencing, route guard and chat pipeline built on
//! top of them. It depends only on `mindspace-types` -- never on
//! `mindspace-infra` or any HTTP/IO crate.

pub mod auth;
pub mod chat;
pub mod repository;
pub mod route;
