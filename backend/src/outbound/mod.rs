//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **upstream**: reqwest-backed clients for the listing and user services
//! - **cache**: moka-backed in-process user cache
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod cache;
pub mod upstream;
