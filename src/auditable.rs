//! Entity capability surface for audit stamping.
//!
//! The original problem: a dispatcher must set "who/when" fields on entities
//! whose concrete shape it does not know, and must not fail when an entity
//! lacks one of the fields. Instead of looking setters up by name at
//! runtime, entities opt in through the [`Auditable`] trait: each of the
//! four setters has a declining default body, and an entity overrides only
//! the ones backed by a real field. What an entity supports is then a
//! compile-time property of its impl, and "field not carried" is an ordinary
//! `false`, not a swallowed exception.

use std::fmt;

use crate::actor::ActorId;
use crate::clock::Timestamp;

/// One of the four logical audit fields a mutating operation may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditField {
    /// Instant the entity was created.
    CreatedAt,
    /// Actor who created the entity.
    CreatedBy,
    /// Instant the entity was last modified.
    UpdatedAt,
    /// Actor who last modified the entity.
    UpdatedBy,
}

impl AuditField {
    /// Builds the value a dispatch stamps into this field.
    ///
    /// Time fields take the dispatch instant; actor fields take the current
    /// actor, which may be absent when no identity was established.
    pub fn value_at(self, now: Timestamp, actor: Option<ActorId>) -> FieldValue {
        match self {
            Self::CreatedAt | Self::UpdatedAt => FieldValue::At(now),
            Self::CreatedBy | Self::UpdatedBy => FieldValue::By(actor),
        }
    }
}

impl fmt::Display for AuditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatedAt => write!(f, "created_at"),
            Self::CreatedBy => write!(f, "created_by"),
            Self::UpdatedAt => write!(f, "updated_at"),
            Self::UpdatedBy => write!(f, "updated_by"),
        }
    }
}

/// Value stamped into an audit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// A timestamp, for the time fields.
    At(Timestamp),
    /// An actor id, for the actor fields. `None` stamps the field empty
    /// when the dispatch ran without an authenticated actor.
    By(Option<ActorId>),
}

/// Optional capability interface for entities that carry audit fields.
///
/// An entity overrides exactly the setters backed by real fields; the
/// default bodies decline by returning `false` and leave the entity
/// untouched. Implementing none of the setters is valid and makes every
/// dispatch against the entity a pure no-op.
///
/// Each setter returns whether the field was applied. Setters must not
/// perform I/O or fail in any other way: an audit stamp is a plain
/// in-memory assignment.
///
/// # Examples
///
/// An entity that only tracks modification, not creation:
///
/// ```
/// use audit_stamp::{ActorId, Auditable, Timestamp};
///
/// #[derive(Default)]
/// struct Counter {
///     value: u64,
///     updated_at: Option<Timestamp>,
///     updated_by: Option<ActorId>,
/// }
///
/// impl Auditable for Counter {
///     fn set_updated_at(&mut self, at: Timestamp) -> bool {
///         self.updated_at = Some(at);
///         true
///     }
///
///     fn set_updated_by(&mut self, by: Option<ActorId>) -> bool {
///         self.updated_by = by;
///         true
///     }
/// }
///
/// let mut counter = Counter::default();
/// assert!(!counter.set_created_at(chrono::Utc::now())); // declined
/// assert!(counter.set_updated_by(Some(ActorId::new(7))));
/// ```
pub trait Auditable {
    /// Sets the creation instant. Declines unless overridden.
    fn set_created_at(&mut self, _at: Timestamp) -> bool {
        false
    }

    /// Sets the creating actor. Declines unless overridden.
    ///
    /// `None` means the dispatch ran without an authenticated actor; an
    /// entity that carries the field should store the emptiness rather than
    /// keep a stale value.
    fn set_created_by(&mut self, _by: Option<ActorId>) -> bool {
        false
    }

    /// Sets the last-modification instant. Declines unless overridden.
    fn set_updated_at(&mut self, _at: Timestamp) -> bool {
        false
    }

    /// Sets the last-modifying actor. Declines unless overridden.
    ///
    /// `None` carries the same meaning as for
    /// [`set_created_by`](Self::set_created_by).
    fn set_updated_by(&mut self, _by: Option<ActorId>) -> bool {
        false
    }
}

/// Attempts to stamp one audit field on a type-erased target.
///
/// This is the dynamic entry point for hosts that route heterogeneous
/// entities through one code path; statically typed callers can invoke the
/// [`Auditable`] setters directly. Returns whether the field was applied.
///
/// Declining is an expected, frequent outcome, never an error:
///
/// - no target (`None`) → `false`,
/// - value shape does not fit the field (an actor value offered to a time
///   field, or the reverse) → `false`,
/// - the entity does not carry the field → `false`.
///
/// # Examples
///
/// ```
/// use audit_stamp::{apply_field, AuditField, AuditStamp, FieldValue};
///
/// let mut stamp = AuditStamp::default();
/// let now = chrono::Utc::now();
///
/// assert!(apply_field(
///     Some(&mut stamp),
///     AuditField::CreatedAt,
///     FieldValue::At(now),
/// ));
/// assert_eq!(stamp.created_at, Some(now));
///
/// // Mismatched value shape is treated as unsupported.
/// assert!(!apply_field(
///     Some(&mut stamp),
///     AuditField::CreatedAt,
///     FieldValue::By(None),
/// ));
///
/// // So is the absence of a target.
/// assert!(!apply_field(None, AuditField::CreatedAt, FieldValue::At(now)));
/// ```
pub fn apply_field(
    target: Option<&mut dyn Auditable>,
    field: AuditField,
    value: FieldValue,
) -> bool {
    let target = match target {
        Some(target) => target,
        None => return false,
    };

    match (field, value) {
        (AuditField::CreatedAt, FieldValue::At(at)) => target.set_created_at(at),
        (AuditField::CreatedBy, FieldValue::By(by)) => target.set_created_by(by),
        (AuditField::UpdatedAt, FieldValue::At(at)) => target.set_updated_at(at),
        (AuditField::UpdatedBy, FieldValue::By(by)) => target.set_updated_by(by),
        // Value shape does not fit the field.
        _ => false,
    }
}
