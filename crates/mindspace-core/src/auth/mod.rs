//! Authentication: identity provider port, session lifecycle and the login
//! sequence that ties them to the profile store.

pub mod login;
pub mod provider;
pub mod session;
