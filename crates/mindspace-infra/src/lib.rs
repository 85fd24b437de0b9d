//! Infrastructure layer for MindSpace.
//!
//! Contains implementations of the port traits defined in `mindspace-core`:
//! Google OAuth2 identity provider, Firebase Realtime Database profile store,
//! HTTP completion client and file-backed session storage, plus the
//! configuration loader.

pub mod completion;
pub mod config;
pub mod filesystem;
pub mod firebase;
pub mod google;

#[cfg(test)]
mod test_support;
