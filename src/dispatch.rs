//! Interception and enrichment of tagged mutating operations.
//!
//! The dispatcher sits between a host's request handling and its persistence
//! calls. A mutating operation is wired once at startup, which resolves its
//! declared kind into an [`AuditedOperation`] handle; each call through the
//! handle stamps the target entity's audit fields before the operation runs.
//! Stamping is best-effort per field and never fails the wrapped call.

use std::fmt;

use crate::actor::ActorId;
use crate::auditable::{apply_field, AuditField, Auditable};
use crate::clock::{Clock, SystemClock, Timestamp};
use crate::context::IdentityContext;
use crate::error::{ConfigError, ConfigErrorKind};
use crate::operation::{OperationKind, OperationMetadata, OperationRegistry};

/// Stamps audit fields onto entities before tagged operations execute.
///
/// The dispatcher owns the [`OperationRegistry`] a host populated at startup
/// and a [`Clock`]. Wiring an operation name resolves its declared kind into
/// an [`AuditedOperation`] handle; an undeclared name is a configuration
/// error at wiring time, never a per-request failure.
///
/// A dispatch reads the clock exactly once and the identity context exactly
/// once, then applies the kind's field subset to the target. Fields the
/// entity does not carry are declined and recorded in the
/// [`DispatchReport`]; the wrapped operation proceeds regardless.
///
/// # Examples
///
/// ```
/// use audit_stamp::{
///     ActorId, AuditDispatcher, AuditStamp, IdentityContext, OperationKind,
///     OperationMetadata, OperationRegistry,
/// };
///
/// let mut registry = OperationRegistry::new();
/// registry
///     .declare(OperationMetadata::new("employee.insert", OperationKind::Create))
///     .expect("fresh declaration");
///
/// let dispatcher = AuditDispatcher::new(registry);
/// let insert = dispatcher.wire("employee.insert").expect("declared above");
///
/// let identity = IdentityContext::new();
/// let _scope = identity.enter(ActorId::new(7));
///
/// let mut employee = AuditStamp::new();
/// let report = dispatcher.dispatch(&insert, &identity, Some(&mut employee));
///
/// assert!(report.fully_stamped());
/// assert_eq!(employee.created_by, Some(ActorId::new(7)));
/// assert_eq!(employee.created_at, employee.updated_at);
/// ```
#[derive(Debug)]
pub struct AuditDispatcher<C = SystemClock> {
    registry: OperationRegistry,
    clock: C,
}

impl AuditDispatcher<SystemClock> {
    /// Creates a dispatcher over the given registry, reading system time.
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> AuditDispatcher<C> {
    /// Creates a dispatcher with an explicit clock.
    ///
    /// Hosts use this seam to pin time in tests; production dispatchers are
    /// built with [`AuditDispatcher::new`].
    pub fn with_clock(registry: OperationRegistry, clock: C) -> Self {
        Self { registry, clock }
    }

    /// Returns the registry of declared operations.
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Resolves a declared operation into a dispatchable handle.
    ///
    /// This is the only way to mint an [`AuditedOperation`]. Hosts wire each
    /// interception point once while assembling their routes; the kind is
    /// resolved here and travels with the handle, so per-call dispatch never
    /// consults the registry again.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownOperation` error when `name` was never declared.
    /// A host receiving one must refuse the affected route (or refuse to
    /// start) rather than accept calls it cannot audit.
    ///
    /// # Examples
    ///
    /// ```
    /// use audit_stamp::{AuditDispatcher, ConfigErrorKind, OperationRegistry};
    ///
    /// let dispatcher = AuditDispatcher::new(OperationRegistry::new());
    ///
    /// let err = dispatcher.wire("never.declared").unwrap_err();
    /// assert_eq!(err.kind(), ConfigErrorKind::UnknownOperation);
    /// ```
    pub fn wire(&self, name: &str) -> Result<AuditedOperation, ConfigError> {
        let meta = self.registry.lookup(name).ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::UnknownOperation,
                format!("cannot wire operation '{}': no declared kind", name),
            )
        })?;
        Ok(AuditedOperation { meta })
    }

    /// Runs one enrichment pass against `target`.
    ///
    /// With no target there is nothing to enrich: the dispatch passes
    /// through without reading the clock or the identity. Otherwise the
    /// instant and actor are captured once and the handle's kind decides the
    /// field subset: a create initializes all four audit fields, a modify
    /// touches only the modification pair.
    ///
    /// Every field application is independently best-effort. An entity that
    /// declines a field (it does not carry it) is an expected outcome,
    /// recorded in the report and logged as a debug diagnostic. Declines
    /// never abort the dispatch.
    ///
    /// The target is mutated in place; partially stamped entities are final,
    /// not rolled back.
    pub fn dispatch(
        &self,
        op: &AuditedOperation,
        identity: &IdentityContext,
        target: Option<&mut dyn Auditable>,
    ) -> DispatchReport {
        let kind = op.kind();

        let target = match target {
            Some(target) => target,
            None => {
                tracing::debug!(
                    target: "audit_stamp",
                    operation = %op.name(),
                    kind = %kind,
                    "no target entity, dispatch passes through"
                );
                return DispatchReport::pass_through(op.name(), kind);
            }
        };

        // One clock read per dispatch: a create stamps creation and
        // modification with the same instant.
        let now = self.clock.now();
        let actor = identity.get();

        if actor.is_none() {
            tracing::debug!(
                target: "audit_stamp",
                operation = %op.name(),
                "no actor recorded for this scope, actor fields stamp empty"
            );
        }

        let mut stamped = Vec::new();
        let mut declined = Vec::new();

        for &field in kind.fields() {
            if apply_field(Some(&mut *target), field, field.value_at(now, actor)) {
                stamped.push(field);
            } else {
                declined.push(field);
                tracing::debug!(
                    target: "audit_stamp",
                    operation = %op.name(),
                    field = %field,
                    "entity declined audit field"
                );
            }
        }

        tracing::debug!(
            target: "audit_stamp",
            operation = %op.name(),
            kind = %kind,
            stamped = stamped.len(),
            declined = declined.len(),
            actor = ?actor,
            "audit dispatch complete"
        );

        DispatchReport {
            operation: op.name(),
            kind,
            stamped,
            declined,
            instant: Some(now),
            actor,
        }
    }

    /// Stamps `entity`, then runs the wrapped operation with it.
    ///
    /// This is the decorator form of [`dispatch`](Self::dispatch): compose
    /// it around the real mutating call so the entity is already enriched
    /// when the call executes. Only the operation's own result is visible to
    /// the caller; the enrichment report is emitted as diagnostics and
    /// discarded. Tagged calls that carry no entity go through
    /// `dispatch(op, identity, None)` instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use audit_stamp::{
    ///     ActorId, AuditDispatcher, AuditStamp, IdentityContext, OperationKind,
    ///     OperationMetadata, OperationRegistry,
    /// };
    ///
    /// let mut registry = OperationRegistry::new();
    /// registry
    ///     .declare(OperationMetadata::new("dish.update", OperationKind::Modify))
    ///     .expect("fresh declaration");
    /// let dispatcher = AuditDispatcher::new(registry);
    /// let update = dispatcher.wire("dish.update").expect("declared above");
    ///
    /// let identity = IdentityContext::new();
    /// let _scope = identity.enter(ActorId::new(3));
    ///
    /// let mut dish = AuditStamp::new();
    /// let rows = dispatcher.intercept(&update, &identity, &mut dish, |dish| {
    ///     // The entity is already stamped when the operation runs.
    ///     assert!(dish.updated_at.is_some());
    ///     1 // rows affected
    /// });
    ///
    /// assert_eq!(rows, 1);
    /// assert_eq!(dish.updated_by, Some(ActorId::new(3)));
    /// assert_eq!(dish.created_at, None); // modify never touches creation
    /// ```
    pub fn intercept<E, R>(
        &self,
        op: &AuditedOperation,
        identity: &IdentityContext,
        entity: &mut E,
        proceed: impl FnOnce(&mut E) -> R,
    ) -> R
    where
        E: Auditable,
    {
        self.dispatch(op, identity, Some(&mut *entity));
        proceed(entity)
    }
}

/// Handle proving an operation was wired through a dispatcher.
///
/// The handle carries the operation's declared metadata by value. It has no
/// public constructor: the only mint is [`AuditDispatcher::wire`], which
/// fails for undeclared names. Holding a handle therefore proves the
/// "exactly one declared kind" check already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditedOperation {
    meta: OperationMetadata,
}

impl AuditedOperation {
    /// Returns the operation identifier.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the kind resolved at wiring time.
    pub fn kind(&self) -> OperationKind {
        self.meta.kind()
    }
}

/// Outcome of one dispatch, for diagnostics and tests.
///
/// A report records which fields were stamped and which the entity
/// declined, plus the instant and actor captured for the dispatch. Reports
/// carry no control flow: a dispatch with declines still lets the wrapped
/// operation proceed.
///
/// # Examples
///
/// ```
/// use audit_stamp::{
///     AuditDispatcher, IdentityContext, OperationKind, OperationMetadata,
///     OperationRegistry,
/// };
///
/// let mut registry = OperationRegistry::new();
/// registry
///     .declare(OperationMetadata::new("category.insert", OperationKind::Create))
///     .expect("fresh declaration");
/// let dispatcher = AuditDispatcher::new(registry);
/// let insert = dispatcher.wire("category.insert").expect("declared above");
///
/// // A tagged call with no entity passes through untouched.
/// let identity = IdentityContext::new();
/// let report = dispatcher.dispatch(&insert, &identity, None);
///
/// assert!(report.passed_through());
/// assert!(report.stamped().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    operation: &'static str,
    kind: OperationKind,
    stamped: Vec<AuditField>,
    declined: Vec<AuditField>,
    instant: Option<Timestamp>,
    actor: Option<ActorId>,
}

impl DispatchReport {
    fn pass_through(operation: &'static str, kind: OperationKind) -> Self {
        Self {
            operation,
            kind,
            stamped: Vec::new(),
            declined: Vec::new(),
            instant: None,
            actor: None,
        }
    }

    /// Returns the dispatched operation's identifier.
    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Returns the dispatched operation's kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the fields the entity accepted, in stamping order.
    pub fn stamped(&self) -> &[AuditField] {
        &self.stamped
    }

    /// Returns the fields the entity declined, in stamping order.
    pub fn declined(&self) -> &[AuditField] {
        &self.declined
    }

    /// Returns the instant captured for this dispatch.
    ///
    /// `None` for a pass-through: the clock is not read when there is no
    /// target to enrich.
    pub fn instant(&self) -> Option<Timestamp> {
        self.instant
    }

    /// Returns the actor captured for this dispatch.
    ///
    /// `None` either for a pass-through or when no identity was recorded in
    /// the scope.
    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    /// Returns `true` if the dispatch had no target and touched nothing.
    pub fn passed_through(&self) -> bool {
        self.instant.is_none()
    }

    /// Returns `true` if the entity accepted every field the kind asked for.
    pub fn fully_stamped(&self) -> bool {
        !self.stamped.is_empty() && self.declined.is_empty()
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DispatchReport[operation={}, kind={}",
            self.operation, self.kind
        )?;

        if self.passed_through() {
            return write!(f, ", passed_through]");
        }

        write!(
            f,
            ", stamped={}, declined={}",
            self.stamped.len(),
            self.declined.len()
        )?;
        match self.actor {
            Some(actor) => write!(f, ", actor={}", actor)?,
            None => write!(f, ", actor=<none>")?,
        }

        write!(f, "]")
    }
}
