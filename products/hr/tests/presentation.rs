mod common;

use common::{hire, setup};
use entity::employee;
use products_hr::changes::{self, TransferTarget};
use products_hr::{catalog, employees, presentation, seed};

#[tokio::test]
async fn views_resolve_names() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let carol = hire(&env, "Carol").await;
    let request = changes::submit_transfer(
        &env.db,
        bob.id,
        TransferTarget {
            company_id: 1,
            project_id: 1,
            effective_date: "2024-02-01",
        },
        env.user_id,
    )
    .await
    .expect("submit");
    changes::approve(&env.db, request.id, env.user_id)
        .await
        .expect("approve");
    let resign = changes::submit_resignation(&env.db, bob.id, "2024-12-31", env.user_id)
        .await
        .expect("resign");

    let rows = employees::list_active_employees(&env.db).await.expect("list");
    let views = presentation::employee_views(&env.db, rows).await.expect("views");
    let bob_view = views.iter().find(|v| v.id == bob.id).expect("bob");
    assert_eq!(bob_view.status, employee::Status::Active);
    assert_eq!(bob_view.company_name.as_deref(), Some("Northwind Engineering"));
    assert_eq!(bob_view.project_name.as_deref(), Some("Harbor Bridge Retrofit"));
    let carol_view = views.iter().find(|v| v.id == carol.id).expect("carol");
    assert_eq!(carol_view.status, employee::Status::PendingAssignment);
    assert_eq!(carol_view.company_name, None);

    let change = presentation::change_view(&env.db, resign)
        .await
        .expect("change view");
    assert_eq!(change.employee_name.as_deref(), Some("Bob"));
    assert_eq!(change.from_company_name.as_deref(), Some("Northwind Engineering"));
    assert_eq!(change.to_company_name, None);

    let json = serde_json::to_value(&change).expect("json");
    assert_eq!(json["type"], "resignation");
    assert_eq!(json["employee_id"], bob.id);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["effective_date"], "2024-12-31");
}

#[tokio::test]
async fn catalog_lists_projects_per_company() {
    let env = setup().await;
    let companies = catalog::list_companies(&env.db).await.expect("companies");
    assert_eq!(companies.len(), seed::DEMO_CATALOG.len());

    let projects = catalog::list_projects_for_company(&env.db, companies[0].id)
        .await
        .expect("projects");
    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|p| p.company_id == companies[0].id));

    assert!(catalog::list_projects_for_company(&env.db, 999).await.is_err());
}

#[tokio::test]
async fn seeding_twice_is_harmless() {
    let env = setup().await;
    let report = seed::seed_demo_catalog(&env.db).await.expect("reseed");
    assert_eq!(report, seed::SeedReport::default());
}
