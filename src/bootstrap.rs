//! Startup wiring between a [`Store`] and a host application.
//!
//! The host application is an opaque collaborator reached through two
//! channels: one inbound channel it reads its starting state from, and one
//! outbound channel it publishes its full state on whenever that state
//! changes. [`run`] seeds the inbound channel exactly once with whatever was
//! persisted, then performs one whole-object write per published state until
//! the application hangs up.
//!
//! There is no state here beyond the store itself; this is run-once glue.

use std::sync::mpsc::{Receiver, Sender};

use crate::error::StoreError;
use crate::store::{Fields, StorageBackend, Store};

/// Wire `store` to an application and block until the application's
/// outbound channel disconnects.
///
/// The seed message is best-effort: an application that has already dropped
/// its inbound channel simply starts from its own defaults. A persist
/// failure stops the loop and propagates, since the application believes
/// that state was saved.
pub fn run<B: StorageBackend>(
    store: &mut Store<B>,
    into_app: Sender<Fields>,
    out_of_app: Receiver<Fields>,
) -> Result<(), StoreError> {
    if into_app.send(store.fields().clone()).is_err() {
        tracing::debug!(
            "Application dropped its inbound channel before the seed message for {:?}",
            store.namespace()
        );
    }

    for state in out_of_app {
        store.replace_all(state)?;
    }
    Ok(())
}
