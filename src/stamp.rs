use crate::actor::ActorId;
use crate::auditable::Auditable;
use crate::clock::Timestamp;

/// Embeddable carrier for the four audit fields.
///
/// Entities that track the full audit surface can embed an `AuditStamp`
/// instead of hand-writing four fields and four setters, and forward their
/// [`Auditable`] implementation to it. Every field is optional: a freshly
/// constructed entity has no audit history until a dispatch stamps it.
///
/// # Examples
///
/// Forwarding an entity's audit surface to an embedded stamp:
///
/// ```
/// use audit_stamp::{ActorId, AuditStamp, Auditable, Timestamp};
/// use chrono::{TimeZone, Utc};
///
/// struct Employee {
///     username: String,
///     audit: AuditStamp,
/// }
///
/// impl Auditable for Employee {
///     fn set_created_at(&mut self, at: Timestamp) -> bool {
///         self.audit.set_created_at(at)
///     }
///     fn set_created_by(&mut self, by: Option<ActorId>) -> bool {
///         self.audit.set_created_by(by)
///     }
///     fn set_updated_at(&mut self, at: Timestamp) -> bool {
///         self.audit.set_updated_at(at)
///     }
///     fn set_updated_by(&mut self, by: Option<ActorId>) -> bool {
///         self.audit.set_updated_by(by)
///     }
/// }
///
/// let mut employee = Employee {
///     username: "zhangsan".to_string(),
///     audit: AuditStamp::default(),
/// };
///
/// let noon = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// assert!(employee.set_updated_at(noon));
/// assert!(employee.set_updated_by(Some(ActorId::new(7))));
///
/// assert_eq!(employee.audit.updated_at, Some(noon));
/// assert_eq!(employee.audit.updated_by, Some(ActorId::new(7)));
/// assert_eq!(employee.audit.created_at, None);
/// assert_eq!(employee.username, "zhangsan");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditStamp {
    /// When the entity was created.
    pub created_at: Option<Timestamp>,
    /// Who created the entity.
    pub created_by: Option<ActorId>,
    /// When the entity was last modified.
    pub updated_at: Option<Timestamp>,
    /// Who last modified the entity.
    pub updated_by: Option<ActorId>,
}

impl AuditStamp {
    /// Creates a stamp with no audit history.
    pub const fn new() -> Self {
        Self {
            created_at: None,
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }

    /// Returns `true` if no field has been stamped yet.
    pub const fn is_empty(&self) -> bool {
        self.created_at.is_none()
            && self.created_by.is_none()
            && self.updated_at.is_none()
            && self.updated_by.is_none()
    }
}

impl Auditable for AuditStamp {
    fn set_created_at(&mut self, at: Timestamp) -> bool {
        self.created_at = Some(at);
        true
    }

    fn set_created_by(&mut self, by: Option<ActorId>) -> bool {
        self.created_by = by;
        true
    }

    fn set_updated_at(&mut self, at: Timestamp) -> bool {
        self.updated_at = Some(at);
        true
    }

    fn set_updated_by(&mut self, by: Option<ActorId>) -> bool {
        self.updated_by = by;
        true
    }
}
