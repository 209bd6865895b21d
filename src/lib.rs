#![doc(test(attr(deny(warnings))))]

//! Debt Ledger keeps track of informal personal debts (who owes you, how
//! much, why and by when) and derives collection statistics from them.

pub mod cli;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{LedgerStore, LoadReport};
pub use crate::errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Debt Ledger tracing initialized.");
    });
}
