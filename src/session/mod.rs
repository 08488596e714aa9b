//! Session subsystem: the scope that groups messages written on behalf of
//! one user, carries the monotonic version counter ingests advance, and
//! supplies the knowledge graph's `group_id` partitioning.
//!
//! Follows the same domain/ports/adapters/services layering as
//! [`crate::message`]: domain types hold no infrastructure dependencies,
//! ports describe what the domain needs from storage, and adapters
//! implement those ports against Postgres or in-memory state for tests.
//!
//! ```
//! use eion::ids::{SessionId, UserId};
//! use eion::session::domain::Session;
//! use mockable::DefaultClock;
//!
//! let clock = DefaultClock;
//! let session = Session::new(UserId::new(), None, None, &clock);
//! assert_eq!(session.version(), 0);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
