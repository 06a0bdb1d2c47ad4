//! Calendar domain model.
//!
//! # Responsibility
//! - Define the value types shared by the store, codec and panel layers.
//!
//! # Invariants
//! - A `Date` always names a day that exists under the calendar rules in
//!   `crate::calendar`.
//! - Dates order lexicographically by (year, month, day).

pub mod date;
