//! Storage of live decomposition sessions.
//!
//! Sessions live in a slab and are addressed by an index tagged with a
//! generation number. A [`SessionHandle`] is move-only and consumed when its
//! session is freed; the raw `u64` form of a handle is only used by the flat
//! boundary, where a stale or forged value is detected through its generation
//! and rejected.

use crate::session::DecompositionSession;
use log::trace;
use slab::Slab;

/// A session handle as seen by the flat boundary.
pub type RawSessionHandle = u64;

/// The raw handle that never refers to a session.
pub const NULL_SESSION: RawSessionHandle = 0;

/// Exclusive handle to a live decomposition session.
///
/// Not `Clone` nor `Copy`: exactly one handle exists per session, and
/// freeing the session consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    key: u32,
    generation: u32,
}

impl SessionHandle {
    /// Encodes this handle for the flat boundary, consuming it.
    ///
    /// The result is never [`NULL_SESSION`].
    pub fn into_raw(self) -> RawSessionHandle {
        ((self.generation as u64) << 32) | (self.key as u64 + 1)
    }

    /// Decodes a raw handle.
    ///
    /// Returns `None` for [`NULL_SESSION`] and for values that cannot have
    /// been produced by [`Self::into_raw`]. A decoded handle may still refer
    /// to a session that was freed since: the registry checks that.
    pub fn from_raw(raw: RawSessionHandle) -> Option<Self> {
        let key = (raw & u32::MAX as u64).checked_sub(1)?;
        Some(Self {
            key: key as u32,
            generation: (raw >> 32) as u32,
        })
    }
}

#[derive(Debug)]
struct Entry<E> {
    generation: u32,
    session: DecompositionSession<E>,
}

/// The set of live sessions of a [`Decomposer`](crate::Decomposer).
#[derive(Debug)]
pub struct SessionRegistry<E> {
    entries: Slab<Entry<E>>,
    next_generation: u32,
}

impl<E> Default for SessionRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SessionRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Slab::new(),
            next_generation: 0,
        }
    }

    /// The number of live sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no live sessions?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores a session and returns the only handle to it.
    pub fn insert(&mut self, session: DecompositionSession<E>) -> SessionHandle {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        let key = self.entries.insert(Entry {
            generation,
            session,
        });
        trace!("registry: session {key} (generation {generation}) inserted");

        SessionHandle {
            key: key as u32,
            generation,
        }
    }

    /// The session referenced by `handle`, if it is still alive.
    pub fn get(&self, handle: &SessionHandle) -> Option<&DecompositionSession<E>> {
        self.entries
            .get(handle.key as usize)
            .filter(|entry| entry.generation == handle.generation)
            .map(|entry| &entry.session)
    }

    /// Removes the session referenced by `handle` and returns it.
    ///
    /// Returns `None` if the session was already removed.
    pub fn remove(&mut self, handle: SessionHandle) -> Option<DecompositionSession<E>> {
        let key = handle.key as usize;

        if self.entries.get(key)?.generation != handle.generation {
            return None;
        }

        trace!(
            "registry: session {key} (generation {}) removed",
            handle.generation
        );
        Some(self.entries.remove(key).session)
    }

    /// Removes every session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
