//! Automatic audit-field population for data-mutating operations.
//!
//! This crate stamps creation/modification timestamps and actor identifiers
//! onto entities before tagged write operations execute, through:
//! - **Declared kinds**: Every audited operation is registered as a create
//!   or a modify at startup; undeclared operations fail at wiring time
//! - **Explicit identity**: The acting identity lives in a per-request
//!   context value, never in ambient thread-bound state
//! - **Opt-in entity surface**: Entities implement [`Auditable`] for exactly
//!   the fields they carry; missing fields decline instead of failing
//!
//! # Core Types
//!
//! - [`OperationRegistry`]: Startup table declaring each operation's kind
//! - [`AuditDispatcher`]: Intercepts tagged calls and stamps audit fields
//! - [`IdentityContext`]: Request-scoped holder of the acting identity
//! - [`Auditable`]: Capability trait for the four audit fields
//! - [`AuditStamp`]: Embeddable carrier implementing all four
//!
//! # Examples
//!
//! ```
//! use audit_stamp::{
//!     ActorId, AuditDispatcher, AuditStamp, IdentityContext, OperationKind,
//!     OperationMetadata, OperationRegistry,
//! };
//!
//! // Declare every audited operation once, at startup.
//! let mut registry = OperationRegistry::new();
//! registry
//!     .declare(OperationMetadata::new("employee.insert", OperationKind::Create))
//!     .expect("fresh declaration");
//!
//! // Wiring resolves the declared kind; unknown names fail here, not per call.
//! let dispatcher = AuditDispatcher::new(registry);
//! let insert = dispatcher.wire("employee.insert").expect("declared above");
//!
//! // Each request binds its authenticated actor to its own context.
//! let identity = IdentityContext::new();
//! let _scope = identity.enter(ActorId::new(7));
//!
//! let mut employee = AuditStamp::new();
//! let report = dispatcher.dispatch(&insert, &identity, Some(&mut employee));
//!
//! assert!(report.fully_stamped());
//! assert_eq!(employee.created_by, Some(ActorId::new(7)));
//! assert_eq!(employee.created_at, employee.updated_at);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actor;
mod auditable;
mod clock;
mod context;
mod dispatch;
mod error;
mod operation;
mod stamp;

pub use actor::ActorId;
pub use auditable::{apply_field, AuditField, Auditable, FieldValue};
pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use context::{IdentityContext, IdentityScope};
pub use dispatch::{AuditDispatcher, AuditedOperation, DispatchReport};
pub use error::{ConfigError, ConfigErrorKind};
pub use operation::{OperationKind, OperationMetadata, OperationRegistry};
pub use stamp::AuditStamp;
