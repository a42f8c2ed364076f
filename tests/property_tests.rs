//! Property tests for the audit stamping subsystem.
//!
//! These tests validate cross-module invariants over generated inputs:
//! single-instant creation stamps, creation immutability under modify,
//! field partitioning, and identity-scope isolation.

use audit_stamp::{
    apply_field, ActorId, AuditDispatcher, AuditField, AuditStamp, Auditable, ConfigErrorKind,
    FieldValue, FixedClock, IdentityContext, OperationKind, OperationMetadata,
    OperationRegistry, Timestamp,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

const ALL_FIELDS: [AuditField; 4] = [
    AuditField::CreatedAt,
    AuditField::CreatedBy,
    AuditField::UpdatedAt,
    AuditField::UpdatedBy,
];

// Strategy: Generate arbitrary actor ids across the full key space
fn arb_actor() -> impl Strategy<Value = ActorId> {
    any::<i64>().prop_map(ActorId::new)
}

// Strategy: Generate arbitrary instants between 1970 and 2100
fn arb_instant() -> impl Strategy<Value = Timestamp> {
    (0i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

// Strategy: Generate either operation kind
fn arb_kind() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::Create), Just(OperationKind::Modify)]
}

/// Entity whose audit surface is chosen per test case: each setter forwards
/// to the embedded stamp only when enabled for that case.
struct SurfaceEntity {
    accepts: [bool; 4],
    stamp: AuditStamp,
}

impl SurfaceEntity {
    fn new(accepts: [bool; 4]) -> Self {
        Self {
            accepts,
            stamp: AuditStamp::new(),
        }
    }
}

impl Auditable for SurfaceEntity {
    fn set_created_at(&mut self, at: Timestamp) -> bool {
        self.accepts[0] && self.stamp.set_created_at(at)
    }

    fn set_created_by(&mut self, by: Option<ActorId>) -> bool {
        self.accepts[1] && self.stamp.set_created_by(by)
    }

    fn set_updated_at(&mut self, at: Timestamp) -> bool {
        self.accepts[2] && self.stamp.set_updated_at(at)
    }

    fn set_updated_by(&mut self, by: Option<ActorId>) -> bool {
        self.accepts[3] && self.stamp.set_updated_by(by)
    }
}

fn field_index(field: AuditField) -> usize {
    match field {
        AuditField::CreatedAt => 0,
        AuditField::CreatedBy => 1,
        AuditField::UpdatedAt => 2,
        AuditField::UpdatedBy => 3,
    }
}

fn dispatcher_at(at: Timestamp) -> AuditDispatcher<FixedClock> {
    let mut registry = OperationRegistry::new();
    registry
        .declare(OperationMetadata::new("entity.insert", OperationKind::Create))
        .expect("fresh declaration");
    registry
        .declare(OperationMetadata::new("entity.update", OperationKind::Modify))
        .expect("fresh declaration");
    AuditDispatcher::with_clock(registry, FixedClock::new(at))
}

proptest! {
    /// Property: A create dispatch stamps one instant and one actor
    ///
    /// For every actor and every instant, creation and modification fields of
    /// a full-surface entity end up identical after a create dispatch: the
    /// clock is read once and the identity once.
    #[test]
    fn proptest_create_stamps_one_instant_and_one_actor(
        actor in arb_actor(),
        at in arb_instant(),
    ) {
        let dispatcher = dispatcher_at(at);
        let insert = dispatcher.wire("entity.insert").expect("declared");

        let identity = IdentityContext::new();
        let _scope = identity.enter(actor);

        let mut entity = AuditStamp::new();
        let report = dispatcher.dispatch(&insert, &identity, Some(&mut entity));

        prop_assert!(report.fully_stamped());
        prop_assert_eq!(entity.created_at, Some(at));
        prop_assert_eq!(entity.updated_at, Some(at));
        prop_assert_eq!(entity.created_by, Some(actor));
        prop_assert_eq!(entity.updated_by, Some(actor));
    }

    /// Property: Modify never touches creation fields
    ///
    /// Whatever creation values an entity already carries survive any modify
    /// dispatch byte for byte, while the modification pair is overwritten
    /// with the dispatch instant and actor.
    #[test]
    fn proptest_modify_preserves_creation_fields(
        prior_actor in arb_actor(),
        prior_at in arb_instant(),
        actor in arb_actor(),
        at in arb_instant(),
    ) {
        let dispatcher = dispatcher_at(at);
        let update = dispatcher.wire("entity.update").expect("declared");

        let mut entity = AuditStamp {
            created_at: Some(prior_at),
            created_by: Some(prior_actor),
            updated_at: Some(prior_at),
            updated_by: Some(prior_actor),
        };

        let identity = IdentityContext::new();
        let _scope = identity.enter(actor);
        dispatcher.dispatch(&update, &identity, Some(&mut entity));

        prop_assert_eq!(entity.created_at, Some(prior_at));
        prop_assert_eq!(entity.created_by, Some(prior_actor));
        prop_assert_eq!(entity.updated_at, Some(at));
        prop_assert_eq!(entity.updated_by, Some(actor));
    }

    /// Property: A report partitions the kind's fields exactly
    ///
    /// For every audit surface an entity might expose, every field of the
    /// dispatched kind lands in exactly one of stamped/declined according to
    /// the surface, fields outside the kind are never attempted, and the
    /// dispatch never panics.
    #[test]
    fn proptest_report_partitions_the_kinds_fields(
        accepts in any::<[bool; 4]>(),
        kind in arb_kind(),
        actor in arb_actor(),
        at in arb_instant(),
    ) {
        let dispatcher = dispatcher_at(at);
        let name = match kind {
            OperationKind::Create => "entity.insert",
            OperationKind::Modify => "entity.update",
        };
        let op = dispatcher.wire(name).expect("declared");

        let identity = IdentityContext::new();
        let _scope = identity.enter(actor);

        let mut entity = SurfaceEntity::new(accepts);
        let report = dispatcher.dispatch(&op, &identity, Some(&mut entity));

        prop_assert_eq!(
            report.stamped().len() + report.declined().len(),
            kind.fields().len(),
        );

        for field in ALL_FIELDS {
            let attempted = kind.fields().contains(&field);
            let accepted = accepts[field_index(field)];

            prop_assert_eq!(
                report.stamped().contains(&field),
                attempted && accepted,
                "field {} stamped-membership mismatch", field,
            );
            prop_assert_eq!(
                report.declined().contains(&field),
                attempted && !accepted,
                "field {} declined-membership mismatch", field,
            );
        }

        // Fields the kind never asks for stay untouched regardless of surface.
        if kind == OperationKind::Modify {
            prop_assert_eq!(entity.stamp.created_at, None);
            prop_assert_eq!(entity.stamp.created_by, None);
        }
    }

    /// Property: Identity scopes never leak across requests
    ///
    /// After a scope ends, whatever actor it carried, the context observes
    /// no identity until the next scope enters, and the next scope observes
    /// only its own actor.
    #[test]
    fn proptest_identity_scopes_are_isolated(
        first in arb_actor(),
        second in arb_actor(),
    ) {
        let identity = IdentityContext::new();

        {
            let _scope = identity.enter(first);
            prop_assert_eq!(identity.get(), Some(first));
        }
        prop_assert_eq!(identity.get(), None);

        {
            let _scope = identity.enter(second);
            prop_assert_eq!(identity.get(), Some(second));
        }
        prop_assert_eq!(identity.get(), None);
    }

    /// Property: The first declaration of an operation wins
    ///
    /// Re-declaring an operation with the same kind is always accepted and
    /// changes nothing; re-declaring it with the other kind is always a
    /// conflict, and the registry keeps answering with the original kind.
    #[test]
    fn proptest_first_declaration_wins(kind in arb_kind()) {
        let mut registry = OperationRegistry::new();
        let meta = OperationMetadata::new("entity.write", kind);

        registry.declare(meta).expect("fresh declaration");
        prop_assert_eq!(registry.kind_of("entity.write").unwrap(), kind);

        // Identical re-declaration is deduplicated.
        registry.declare(meta).expect("identical re-declaration");
        prop_assert_eq!(registry.len(), 1);

        // Conflicting re-declaration is rejected; the original survives.
        let other = match kind {
            OperationKind::Create => OperationKind::Modify,
            OperationKind::Modify => OperationKind::Create,
        };
        let err = registry
            .declare(OperationMetadata::new("entity.write", other))
            .unwrap_err();
        prop_assert_eq!(err.kind(), ConfigErrorKind::ConflictingDeclaration);
        prop_assert_eq!(registry.kind_of("entity.write").unwrap(), kind);
    }

    /// Property: Mismatched value shapes never stamp anything
    ///
    /// Offering a time value to an actor field (or the reverse) returns
    /// `false` and leaves even a full-surface entity untouched, for every
    /// field and every value.
    #[test]
    fn proptest_value_shape_mismatch_never_stamps(
        actor in arb_actor(),
        at in arb_instant(),
    ) {
        let mut entity = AuditStamp::new();

        for field in ALL_FIELDS {
            // Build the value of the SHAPE the field does not take.
            let mismatched = match field {
                AuditField::CreatedAt | AuditField::UpdatedAt => FieldValue::By(Some(actor)),
                AuditField::CreatedBy | AuditField::UpdatedBy => FieldValue::At(at),
            };

            prop_assert!(!apply_field(Some(&mut entity), field, mismatched));
        }

        prop_assert!(entity.is_empty());
    }
}
