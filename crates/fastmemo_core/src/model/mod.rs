//! Domain model for users and memos.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and callers.
//! - Own identifier generation and wall-clock helpers.
//!
//! # Invariants
//! - Every user and memo is identified by an opaque string id that is never
//!   reused.
//! - Memos carry their owner id from creation onward; it never changes.

pub mod id;
pub mod memo;
pub mod user;

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
