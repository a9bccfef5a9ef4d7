//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: file-backed ledger snapshot and reminder log
//! - **broadcast**: fan-out hub feeding live WebSocket sessions
//! - **mail**: background reminder delivery
//!
//! Adapters are thin translators between domain types and their storage or
//! transport representation. They contain no business logic.

pub mod broadcast;
pub mod mail;
pub mod persistence;
