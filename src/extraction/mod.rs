//! The out-of-process entity-extraction worker's contract (`spec.md` §2, §6).
//!
//! This crate implements only the client side: the wire types, the
//! subprocess transport, and a scripted mock for tests. The worker's own
//! implementation is explicitly a collaborator (`spec.md` §1 Out of scope).

pub mod adapters;
pub mod ports;
