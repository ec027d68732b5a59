//! azdo-vcs - Azure DevOps adapter for pull request automation
//!
//! Exposes the small set of pull request operations an automation engine
//! needs (changed files, comments, approval, mergeability, statuses, merge)
//! behind the provider-neutral [`platform::VcsClient`] trait.

pub mod auth;
pub mod comment;
pub mod error;
pub mod identity;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
