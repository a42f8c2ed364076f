use std::collections::HashMap;
use std::fmt;

use crate::auditable::AuditField;
use crate::error::{ConfigError, ConfigErrorKind};

/// Declared classification of a mutating operation.
///
/// The kind is attached to an operation at definition time and never
/// inferred from arguments or runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// The operation inserts a new entity.
    Create,
    /// The operation changes an existing entity.
    Modify,
}

impl OperationKind {
    /// Returns the audit fields a dispatch of this kind populates, in
    /// stamping order.
    ///
    /// A create initializes all four fields; a modify touches only the
    /// modification pair and leaves creation fields exactly as they are.
    pub fn fields(self) -> &'static [AuditField] {
        const CREATE: [AuditField; 4] = [
            AuditField::CreatedAt,
            AuditField::CreatedBy,
            AuditField::UpdatedAt,
            AuditField::UpdatedBy,
        ];
        const MODIFY: [AuditField; 2] = [AuditField::UpdatedAt, AuditField::UpdatedBy];

        match self {
            Self::Create => &CREATE,
            Self::Modify => &MODIFY,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Modify => write!(f, "modify"),
        }
    }
}

/// Static declaration tying an operation identifier to its kind.
///
/// Metadata is immutable once declared and `const`-constructible, so hosts
/// can declare operations next to the code that implements them and collect
/// the declarations into an [`OperationRegistry`] at startup.
///
/// # Examples
///
/// ```
/// use audit_stamp::{OperationKind, OperationMetadata};
///
/// static EMPLOYEE_INSERT: OperationMetadata =
///     OperationMetadata::new("employee.insert", OperationKind::Create);
///
/// assert_eq!(EMPLOYEE_INSERT.name(), "employee.insert");
/// assert_eq!(EMPLOYEE_INSERT.kind(), OperationKind::Create);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMetadata {
    name: &'static str,
    kind: OperationKind,
}

impl OperationMetadata {
    /// Declares an operation with the given identifier and kind.
    pub const fn new(name: &'static str, kind: OperationKind) -> Self {
        Self { name, kind }
    }

    /// Returns the operation identifier.
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the declared kind.
    pub const fn kind(self) -> OperationKind {
        self.kind
    }
}

/// Startup-built table mapping operation identifiers to their declarations.
///
/// The registry makes "which calls get audited, and as what" a visible,
/// checkable table instead of a runtime matching rule. Hosts populate it
/// once while wiring their routes; every failure mode here is a
/// configuration error meant to stop startup, not a per-request condition.
///
/// # Examples
///
/// ```
/// use audit_stamp::{OperationKind, OperationMetadata, OperationRegistry};
///
/// let mut registry = OperationRegistry::new();
/// registry
///     .declare(OperationMetadata::new("employee.insert", OperationKind::Create))
///     .expect("fresh declaration");
///
/// assert_eq!(
///     registry.kind_of("employee.insert").unwrap(),
///     OperationKind::Create,
/// );
/// assert!(registry.kind_of("employee.delete").is_err());
/// ```
#[derive(Debug, Default)]
pub struct OperationRegistry {
    entries: HashMap<&'static str, OperationMetadata>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Declares an operation, deduplicating identical re-declarations.
    ///
    /// Re-declaring a name with the same kind is accepted and has no
    /// effect. Re-declaring it with a different kind is rejected: an
    /// operation has exactly one kind.
    ///
    /// # Errors
    ///
    /// Returns a `ConflictingDeclaration` error when `meta.name()` is
    /// already declared with a different kind.
    pub fn declare(&mut self, meta: OperationMetadata) -> Result<(), ConfigError> {
        match self.entries.get(meta.name()) {
            Some(existing) if existing.kind() == meta.kind() => Ok(()),
            Some(existing) => Err(ConfigError::new(
                ConfigErrorKind::ConflictingDeclaration,
                format!(
                    "operation '{}' is declared as {}, cannot re-declare as {}",
                    meta.name(),
                    existing.kind(),
                    meta.kind(),
                ),
            )),
            None => {
                self.entries.insert(meta.name(), meta);
                Ok(())
            }
        }
    }

    /// Returns the declaration for the named operation, if any.
    pub fn lookup(&self, name: &str) -> Option<OperationMetadata> {
        self.entries.get(name).copied()
    }

    /// Resolves the declared kind of the named operation.
    ///
    /// Resolution is pure table lookup; for a fixed registry the result is
    /// the same on every call.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownOperation` error when the name was never
    /// declared. Callers wiring an interception point must treat this as
    /// fatal rather than retry per request.
    pub fn kind_of(&self, name: &str) -> Result<OperationKind, ConfigError> {
        self.lookup(name).map(OperationMetadata::kind).ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::UnknownOperation,
                format!("operation '{}' has no declared kind", name),
            )
        })
    }

    /// Returns the number of declared operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operations are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BATCH_INSERT: OperationMetadata =
        OperationMetadata::new("batch.insert", OperationKind::Create);

    #[test]
    fn operation_kind_display() {
        assert_eq!(OperationKind::Create.to_string(), "create");
        assert_eq!(OperationKind::Modify.to_string(), "modify");
    }

    #[test]
    fn create_populates_all_four_fields_in_order() {
        assert_eq!(
            OperationKind::Create.fields(),
            &[
                AuditField::CreatedAt,
                AuditField::CreatedBy,
                AuditField::UpdatedAt,
                AuditField::UpdatedBy,
            ],
        );
    }

    #[test]
    fn modify_populates_only_the_modification_pair() {
        assert_eq!(
            OperationKind::Modify.fields(),
            &[AuditField::UpdatedAt, AuditField::UpdatedBy],
        );
    }

    #[test]
    fn metadata_is_const_declarable() {
        assert_eq!(BATCH_INSERT.name(), "batch.insert");
        assert_eq!(BATCH_INSERT.kind(), OperationKind::Create);
    }

    #[test]
    fn registry_starts_empty() {
        let registry = OperationRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn declare_then_lookup() {
        let mut registry = OperationRegistry::new();
        registry
            .declare(OperationMetadata::new("dish.update", OperationKind::Modify))
            .unwrap();

        let meta = registry.lookup("dish.update").expect("declared");
        assert_eq!(meta.kind(), OperationKind::Modify);
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("dish.insert").is_none());
    }

    #[test]
    fn identical_redeclaration_is_deduplicated() {
        let mut registry = OperationRegistry::new();
        registry.declare(BATCH_INSERT).unwrap();
        registry.declare(BATCH_INSERT).unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn conflicting_redeclaration_is_a_config_error() {
        let mut registry = OperationRegistry::new();
        registry.declare(BATCH_INSERT).unwrap();

        let err = registry
            .declare(OperationMetadata::new("batch.insert", OperationKind::Modify))
            .unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::ConflictingDeclaration);
        // The original declaration survives.
        assert_eq!(
            registry.kind_of("batch.insert").unwrap(),
            OperationKind::Create,
        );
    }

    #[test]
    fn kind_of_unknown_operation_is_a_config_error() {
        let registry = OperationRegistry::new();
        let err = registry.kind_of("never.declared").unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::UnknownOperation);
        assert!(err.message().contains("never.declared"));
    }

    #[test]
    fn kind_of_is_idempotent() {
        let mut registry = OperationRegistry::new();
        registry.declare(BATCH_INSERT).unwrap();

        let first = registry.kind_of("batch.insert").unwrap();
        let second = registry.kind_of("batch.insert").unwrap();
        assert_eq!(first, second);
    }
}
