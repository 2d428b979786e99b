//! Core types for Trailpost.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod campsite;
pub mod id;

pub use campsite::CampsiteId;
pub use id::UserId;
