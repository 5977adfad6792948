//! Shared test utilities for repo-steward
//!
//! Integration tests run against real git repositories in temporary
//! directories, with a shell script standing in for the typesetter.

pub mod assertions;
#[cfg(unix)]
pub mod fixtures;
pub mod repository;
