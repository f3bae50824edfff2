//! Listener registry: attach/detach bookkeeping for host event listeners.
//!
//! The registry is the only stateful subsystem in the crate. It maps opaque
//! generated identifiers to listener records so that everything registered
//! under an identifier can be detached again in one call. Registries are
//! constructor-injected values, not ambient singletons; independent
//! registries never share state.

mod callback;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::host::{DomHost, NativeListener};

pub use callback::{Callback, HandlerFn, HandlerObject};

/// Opaque identifier returned by attach.
///
/// Identifiers are unique for the lifetime of the process and are never
/// reused, so a stale clone of a detached id can only ever fail with
/// [`ListenerError::UnknownIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Event-name list accepted by attach: either a space-delimited string or a
/// pre-split list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTypes(Vec<String>);

impl EventTypes {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for EventTypes {
    fn from(names: &str) -> Self {
        Self(names.split_whitespace().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EventTypes {
    fn from(types: &[&str]) -> Self {
        Self(types.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for EventTypes {
    fn from(types: [&str; N]) -> Self {
        Self(types.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<String>> for EventTypes {
    fn from(types: Vec<String>) -> Self {
        Self(types)
    }
}

/// Deterministic misuse signals. Neither is transient; both surface
/// synchronously to the immediate caller and leave the registry unchanged.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("\"{method}\" is not a callable method of the supplied receiver")]
    InvalidReference { method: String },
    #[error("cannot remove non-existent listener id '{id}'")]
    UnknownIdentifier { id: ListenerId },
}

/// One attach call's worth of bookkeeping: the target, the event types the
/// normalized listener was bound to, and the capture flag actually used at
/// registration time (so removal is symmetric).
struct ListenerRecord<H: DomHost> {
    target: H::Node,
    event_types: Vec<String>,
    listener: NativeListener<H::Event>,
    capture: bool,
}

impl<H: DomHost> ListenerRecord<H> {
    fn unbind(&self, host: &H) {
        for event_type in &self.event_types {
            host.remove_native_listener(&self.target, event_type, &self.listener, self.capture);
        }
    }
}

/// Mapping from [`ListenerId`] to attached listener state.
///
/// Invariant: every id in the map corresponds to exactly one currently
/// attached native listener per event type in its record, and removing the
/// id detaches all of them.
pub struct ListenerRegistry<H: DomHost> {
    host: Rc<H>,
    entries: HashMap<ListenerId, ListenerRecord<H>>,
}

impl<H: DomHost> ListenerRegistry<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            entries: HashMap::new(),
        }
    }

    /// Bind `callback` to every event type in `event_types` on `target` and
    /// record the binding under a fresh identifier.
    ///
    /// The callback shape is resolved before any native registration, so an
    /// [`ListenerError::InvalidReference`] failure registers nothing. On
    /// hosts without capture support the capture flag is normalized to
    /// bubble phase.
    pub fn attach(
        &mut self,
        target: &H::Node,
        event_types: impl Into<EventTypes>,
        callback: Callback<H>,
        capture: bool,
    ) -> Result<ListenerId, ListenerError> {
        let id = ListenerId::generate();
        let event_types = event_types.into().0;
        let listener = callback.resolve(&self.host, target, &id)?;
        let capture = capture && self.host.supports_capture();

        for event_type in &event_types {
            self.host
                .add_native_listener(target, event_type, Rc::clone(&listener), capture);
        }

        debug!(
            target = "events",
            id = %id,
            types = ?event_types,
            capture,
            "attached listener"
        );

        self.entries.insert(
            id.clone(),
            ListenerRecord {
                target: target.clone(),
                event_types,
                listener,
                capture,
            },
        );

        Ok(id)
    }

    /// Detach the native listeners recorded under `id` and drop the entry.
    ///
    /// Fails with [`ListenerError::UnknownIdentifier`] when `id` is not
    /// live; detaching the same id twice always fails on the second call.
    pub fn detach(&mut self, id: &ListenerId) -> Result<(), ListenerError> {
        let record = self
            .entries
            .remove(id)
            .ok_or_else(|| ListenerError::UnknownIdentifier { id: id.clone() })?;
        record.unbind(&self.host);
        debug!(target = "events", id = %id, "detached listener");
        Ok(())
    }

    /// Detach each identifier in input order, consuming the collection.
    ///
    /// The first failure propagates immediately; identifiers processed
    /// before it stay detached (no rollback).
    pub fn detach_many<I>(&mut self, ids: I) -> Result<(), ListenerError>
    where
        I: IntoIterator<Item = ListenerId>,
    {
        for id in ids {
            self.detach(&id)?;
        }
        Ok(())
    }

    /// Detach every live entry. Iteration order is unspecified; a no-op on
    /// an empty registry.
    pub fn detach_all(&mut self) {
        for (id, record) in self.entries.drain() {
            record.unbind(&self.host);
            debug!(target = "events", id = %id, "detached listener");
        }
    }

    pub fn contains(&self, id: &ListenerId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
