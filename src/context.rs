use std::cell::Cell;

use crate::actor::ActorId;

/// Per-request holder for the acting identity.
///
/// A host creates one `IdentityContext` per unit of work, records the
/// authenticated actor in it, and hands it to every dispatch that runs on
/// behalf of that actor. The context is an explicit value, never ambient
/// state: there is no process-wide or thread-wide "current user" to read,
/// so a dispatch can only see an identity the host deliberately passed in.
///
/// # Single-Threaded by Construction
///
/// The current actor lives in a [`Cell`], which makes `IdentityContext`
/// `!Sync`. Sharing one context between threads is a compile error, not a
/// runtime race. Concurrent hosts give each worker its own context.
///
/// # Construction
///
/// Contexts start empty. Prefer [`IdentityContext::enter`] over raw
/// [`set`](IdentityContext::set)/[`clear`](IdentityContext::clear) calls:
/// the returned guard clears the context on every exit path, including
/// panics, so a crashed request can never leak its actor into the next one.
///
/// # Examples
///
/// ```
/// use audit_stamp::{ActorId, IdentityContext};
///
/// let identity = IdentityContext::new();
/// assert_eq!(identity.get(), None);
///
/// {
///     let _scope = identity.enter(ActorId::new(42));
///     assert_eq!(identity.get(), Some(ActorId::new(42)));
/// }
///
/// // The scope guard cleared the context on exit.
/// assert_eq!(identity.get(), None);
/// ```
#[derive(Debug, Default)]
pub struct IdentityContext {
    current: Cell<Option<ActorId>>,
}

impl IdentityContext {
    /// Creates a context with no actor recorded.
    pub fn new() -> Self {
        Self {
            current: Cell::new(None),
        }
    }

    /// Records `actor` as the identity for subsequent dispatches.
    ///
    /// Setting while an actor is already recorded replaces it: the context
    /// holds exactly one identity at a time.
    pub fn set(&self, actor: ActorId) {
        self.current.set(Some(actor));
    }

    /// Returns the currently recorded actor, if any.
    pub fn get(&self) -> Option<ActorId> {
        self.current.get()
    }

    /// Removes the recorded actor.
    ///
    /// After clearing, dispatches observe no identity and stamp actor
    /// fields as absent.
    pub fn clear(&self) {
        self.current.set(None);
    }

    /// Records `actor` and returns a guard that clears the context when
    /// dropped.
    ///
    /// This is the intended way to bind an identity to a unit of work. The
    /// guard's `Drop` runs on normal return and during unwinding alike, so
    /// the actor cannot outlive its request even when the operation panics.
    ///
    /// Scopes do not nest: dropping any guard clears the context entirely
    /// rather than restoring an earlier actor. Hosts run one operation per
    /// context at a time.
    ///
    /// # Examples
    ///
    /// ```
    /// use audit_stamp::{ActorId, IdentityContext};
    ///
    /// let identity = IdentityContext::new();
    ///
    /// let scope = identity.enter(ActorId::new(7));
    /// assert_eq!(identity.get(), Some(ActorId::new(7)));
    ///
    /// drop(scope);
    /// assert_eq!(identity.get(), None);
    /// ```
    pub fn enter(&self, actor: ActorId) -> IdentityScope<'_> {
        self.set(actor);
        IdentityScope { context: self }
    }
}

/// Guard that clears an [`IdentityContext`] when dropped.
///
/// Returned by [`IdentityContext::enter`]. Holding the guard marks the
/// span of work performed as the entered actor; dropping it ends that span.
#[derive(Debug)]
pub struct IdentityScope<'a> {
    context: &'a IdentityContext,
}

impl Drop for IdentityScope<'_> {
    fn drop(&mut self) {
        self.context.clear();
    }
}
