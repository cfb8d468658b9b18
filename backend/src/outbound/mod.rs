//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document storage backed by MongoDB or process memory.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
