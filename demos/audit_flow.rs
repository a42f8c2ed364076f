//! Full audit stamping flow demonstration.
//!
//! This example walks the path a host application takes:
//! 1. Declare every mutating operation's kind in a registry at startup
//! 2. Wire a dispatcher and mint operation handles
//! 3. Dispatch create and modify calls against real entities
//! 4. Watch declined fields on entities with a partial audit surface
//!
//! Run with: `cargo run --example audit_flow`

use audit_stamp::{
    ActorId, AuditDispatcher, AuditStamp, Auditable, IdentityContext, OperationKind,
    OperationMetadata, OperationRegistry, Timestamp,
};

/// Menu entity carrying the full audit surface through an embedded stamp.
#[derive(Debug, Default)]
struct Dish {
    name: String,
    price_cents: u32,
    audit: AuditStamp,
}

impl Auditable for Dish {
    fn set_created_at(&mut self, at: Timestamp) -> bool {
        self.audit.set_created_at(at)
    }

    fn set_created_by(&mut self, by: Option<ActorId>) -> bool {
        self.audit.set_created_by(by)
    }

    fn set_updated_at(&mut self, at: Timestamp) -> bool {
        self.audit.set_updated_at(at)
    }

    fn set_updated_by(&mut self, by: Option<ActorId>) -> bool {
        self.audit.set_updated_by(by)
    }
}

/// Child entity that carries no audit columns: every stamp declines.
#[derive(Debug)]
struct DishFlavor {
    dish: String,
    flavor: String,
}

impl Auditable for DishFlavor {}

fn main() {
    // Surface the crate's debug diagnostics (declined fields, dispatch
    // summaries) on stdout for the demo.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Audit Stamping Flow Example ===\n");

    // Scenario 1: Startup declaration and wiring
    println!("--- Scenario 1: Declare Operations at Startup ---");

    let mut registry = OperationRegistry::new();
    registry
        .declare(OperationMetadata::new("dish.insert", OperationKind::Create))
        .expect("fresh declaration");
    registry
        .declare(OperationMetadata::new("dish.update", OperationKind::Modify))
        .expect("fresh declaration");
    registry
        .declare(OperationMetadata::new(
            "dish_flavor.insert",
            OperationKind::Create,
        ))
        .expect("fresh declaration");
    println!("✓ Declared {} operations", registry.len());

    // A conflicting re-declaration is refused before any request runs.
    let conflict = registry.declare(OperationMetadata::new(
        "dish.insert",
        OperationKind::Modify,
    ));
    println!("✓ Conflicting re-declaration rejected: {}", conflict.unwrap_err());

    let dispatcher = AuditDispatcher::new(registry);
    let insert_dish = dispatcher.wire("dish.insert").expect("declared above");
    let update_dish = dispatcher.wire("dish.update").expect("declared above");
    let insert_flavor = dispatcher.wire("dish_flavor.insert").expect("declared above");

    // Wiring a name nobody declared fails here, not per request.
    match dispatcher.wire("dish.delete") {
        Ok(_) => unreachable!("never declared"),
        Err(e) => println!("✓ Undeclared operation refused at wiring: {}", e),
    }

    // Scenario 2: Create dispatch
    println!("\n--- Scenario 2: Create Stamps All Four Fields ---");

    let identity = IdentityContext::new();
    let scope = identity.enter(ActorId::new(7));

    let mut dish = Dish {
        name: "Mapo Tofu".to_string(),
        price_cents: 1650,
        ..Dish::default()
    };
    let report = dispatcher.dispatch(&insert_dish, &identity, Some(&mut dish));

    println!("✓ {}", report);
    println!("  created_at == updated_at: {}", dish.audit.created_at == dish.audit.updated_at);
    println!("  created_by = {:?}", dish.audit.created_by);

    // Scenario 3: Modify dispatch
    println!("\n--- Scenario 3: Modify Leaves Creation Fields Alone ---");

    drop(scope);
    let scope = identity.enter(ActorId::new(9));

    let created_at_before = dish.audit.created_at;
    dish.price_cents = 1750;
    let report = dispatcher.dispatch(&update_dish, &identity, Some(&mut dish));

    println!("✓ {}", report);
    println!(
        "  creation fields preserved: {}",
        dish.audit.created_at == created_at_before && dish.audit.created_by == Some(ActorId::new(7))
    );
    println!(
        "  price now {} cents, updated_by = {:?}",
        dish.price_cents, dish.audit.updated_by
    );

    // Scenario 4: Entity without audit fields
    println!("\n--- Scenario 4: Entities Without Audit Fields Decline ---");

    let mut flavor = DishFlavor {
        dish: "Mapo Tofu".to_string(),
        flavor: "extra numbing".to_string(),
    };
    let report = dispatcher.dispatch(&insert_flavor, &identity, Some(&mut flavor));

    println!("✓ {}", report);
    println!(
        "  declined fields: {:?} (dispatch still succeeded)",
        report.declined()
    );
    println!("  entity untouched: {} / {}", flavor.dish, flavor.flavor);

    // Scenario 5: The decorator form
    println!("\n--- Scenario 5: Intercept Wraps the Real Operation ---");

    let mut saved_rows: Vec<String> = Vec::new();
    let mut dish = Dish {
        name: "Kung Pao Chicken".to_string(),
        price_cents: 1890,
        ..Dish::default()
    };

    let row_count = dispatcher.intercept(&insert_dish, &identity, &mut dish, |dish| {
        // The "real" repository call observes the already-stamped entity.
        saved_rows.push(format!("{} (by {:?})", dish.name, dish.audit.created_by));
        1
    });

    drop(scope);
    println!("✓ Repository inserted {} row(s): {:?}", row_count, saved_rows);

    println!("\n=== Key Takeaways ===");
    println!("1. Operation kinds are declared once, at startup, in a visible table");
    println!("2. Wiring resolves kinds eagerly; unknown names never reach requests");
    println!("3. Create stamps four fields with one instant; modify stamps two");
    println!("4. Entities opt in per field; declines are diagnostics, not errors");
    println!("5. The wrapped operation's result is all the caller ever sees");
    println!("\nIn production:");
    println!("  - Declare operations next to the repository code that runs them");
    println!("  - Wire handles while assembling routes and fail startup on errors");
    println!("  - Give each request its own IdentityContext (see request_scope)");
}
