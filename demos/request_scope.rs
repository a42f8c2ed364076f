//! Identity scope lifecycle demonstration.
//!
//! This example shows how a host binds the authenticated actor to a unit of
//! work and why the scope guard matters:
//! 1. Enter a scope after authentication; dispatches see that actor
//! 2. The guard clears the context on every exit path, including panics
//! 3. Requests that never authenticate stamp empty actor fields
//! 4. Sequential requests on one worker never observe each other's actor
//!
//! Run with: `cargo run --example request_scope`

use std::panic::{catch_unwind, AssertUnwindSafe};

use audit_stamp::{
    ActorId, AuditDispatcher, AuditStamp, IdentityContext, OperationKind, OperationMetadata,
    OperationRegistry,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Identity Scope Example ===\n");

    let mut registry = OperationRegistry::new();
    registry
        .declare(OperationMetadata::new(
            "employee.insert",
            OperationKind::Create,
        ))
        .expect("fresh declaration");
    let dispatcher = AuditDispatcher::new(registry);
    let insert = dispatcher.wire("employee.insert").expect("declared above");

    // One context per worker; one scope per request.
    let identity = IdentityContext::new();

    // Scenario 1: A normal authenticated request
    println!("--- Scenario 1: Authenticated Request ---");
    {
        let _scope = identity.enter(ActorId::new(7));

        let mut employee = AuditStamp::new();
        dispatcher.dispatch(&insert, &identity, Some(&mut employee));
        println!("✓ Dispatch saw actor {:?}", employee.created_by);
    }
    println!("✓ Scope ended; context now holds {:?}", identity.get());

    // Scenario 2: A request that panics mid-flight
    println!("\n--- Scenario 2: Crashed Request Cannot Leak Its Actor ---");

    // Silence the default hook so the expected panic doesn't clutter output.
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let crashed = catch_unwind(AssertUnwindSafe(|| {
        let _scope = identity.enter(ActorId::new(13));
        panic!("row lock timeout");
    }));
    std::panic::set_hook(hook);

    println!("✓ Request panicked: {}", crashed.is_err());
    println!(
        "✓ Guard still cleared the context on unwind: {:?}",
        identity.get()
    );

    // Scenario 3: An anonymous request
    println!("\n--- Scenario 3: Anonymous Request Stamps Empty Actors ---");

    let mut employee = AuditStamp::new();
    let report = dispatcher.dispatch(&insert, &identity, Some(&mut employee));

    println!("✓ {}", report);
    println!(
        "  created_by = {:?} (empty, not a stale value)",
        employee.created_by
    );
    println!("  created_at = {:?} (time still stamps)", employee.created_at);

    // Scenario 4: Sequential requests on the same worker
    println!("\n--- Scenario 4: Sequential Requests Stay Isolated ---");

    for (request, actor) in [("req-101", ActorId::new(1)), ("req-102", ActorId::new(2))] {
        let _scope = identity.enter(actor);

        let mut employee = AuditStamp::new();
        dispatcher.dispatch(&insert, &identity, Some(&mut employee));
        println!("✓ {} stamped created_by = {:?}", request, employee.created_by);
    }
    println!("✓ After both requests: context holds {:?}", identity.get());

    println!("\n=== Key Takeaways ===");
    println!("1. The context is an explicit per-worker value, not thread-global state");
    println!("2. enter() returns a guard; Drop clears on success, error, and panic");
    println!("3. Anonymous dispatches stamp actor fields empty instead of leaking");
    println!("4. Sharing a context across threads is a compile error (!Sync)");
    println!("\nIn production:");
    println!("  - Enter the scope right after authentication middleware runs");
    println!("  - Keep the guard alive for the whole request handler");
    println!("  - Create one context per worker, never a shared global");
}
