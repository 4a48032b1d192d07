//! In-process application layer over the ledger aggregate.
//!
//! The [`LedgerStore`] is the single boundary a UI consumes: it holds the
//! current snapshot, runs commands synchronously, and journals every applied
//! event.

pub mod store;

pub use store::{LedgerStore, LoggedPayment};
