pub mod config;
pub mod stats;
pub mod timer;

use std::rc::Rc;

use pamadorka_core::error::Result;
use pamadorka_core::{Database, DisabledStore, StateStore};

/// Open the on-disk store. When it cannot be opened the CLI keeps working
/// for this invocation only.
pub fn open_store() -> Rc<dyn StateStore> {
    match Database::open() {
        Ok(db) => Rc::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "storage unavailable, state will not persist");
            Rc::new(DisabledStore)
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
