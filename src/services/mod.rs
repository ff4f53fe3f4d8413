//! Domain services behind the HTTP shell.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session, persistence, and validation logic so route
//! handlers stay focused on protocol translation and redirect plumbing.

pub mod persist;
pub mod profile;
pub mod session;
pub mod token;
pub mod validate;
