//! Core use-case services.
//!
//! # Responsibility
//! - Expose the meeting operations the calendar panel consumes.
//! - Keep the panel decoupled from snapshot storage details.

pub mod meeting_service;
