mod common;

use common::{date, hire, setup};
use entity::change_request::{self, Kind, Status};
use entity::employee;
use products_hr::changes::{self, ChangeEffect, TransferTarget};
use products_hr::{HrError, employees};
use sea_orm::{EntityTrait, PaginatorTrait};

fn target(company_id: i32, project_id: i32, effective_date: &str) -> TransferTarget<'_> {
    TransferTarget {
        company_id,
        project_id,
        effective_date,
    }
}

#[tokio::test]
async fn transfer_submit_then_approve_places_employee() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;

    let request = changes::submit_transfer(&env.db, bob.id, target(1, 1, "2024-02-01"), env.user_id)
        .await
        .expect("submit");
    assert_eq!(request.kind, Kind::Transfer);
    assert_eq!(request.status, Status::Pending);
    assert_eq!(request.from_company_id, None);
    assert_eq!(request.to_company_id, Some(1));
    assert_eq!(request.to_project_id, Some(1));

    // Submission alone does not touch the employee.
    let unchanged = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(unchanged, bob);

    let approved = changes::approve(&env.db, request.id, env.user_id)
        .await
        .expect("approve");
    assert_eq!(approved.status, Status::Approved);
    assert_eq!(approved.resolved_by, Some(env.user_id));
    assert!(approved.resolved_at.is_some());

    let placed = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(placed.company_id, Some(1));
    assert_eq!(placed.project_id, Some(1));
    assert_eq!(placed.status, employee::Status::Active);
    assert_eq!(placed.hire_date, date("2024-02-01"));
}

#[tokio::test]
async fn from_fields_are_a_snapshot() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    employees::apply_transfer(&env.db, bob.id, 1, 2, date("2024-02-01"))
        .await
        .expect("place");

    let first = changes::submit_transfer(&env.db, bob.id, target(2, 3, "2024-03-01"), env.user_id)
        .await
        .expect("first");
    let second = changes::submit_resignation(&env.db, bob.id, "2024-09-01", env.user_id)
        .await
        .expect("second");
    changes::approve(&env.db, first.id, env.user_id)
        .await
        .expect("approve first");

    let stored = changes::get_change(&env.db, second.id).await.expect("second");
    assert_eq!(stored.from_company_id, Some(1));
    assert_eq!(stored.from_project_id, Some(2));
    assert_eq!(stored.to_company_id, None);
    assert_eq!(stored.to_project_id, None);
}

#[tokio::test]
async fn resignation_approval_removes_from_active_list() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let request = changes::submit_resignation(&env.db, bob.id, "2024-06-30", env.user_id)
        .await
        .expect("submit");
    assert_eq!(request.kind, Kind::Resignation);

    changes::approve(&env.db, request.id, env.user_id)
        .await
        .expect("approve");

    let resigned = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(resigned.status, employee::Status::Resigned);
    assert_eq!(resigned.hire_date, date("2024-06-30"));
    let active = employees::list_active_employees(&env.db).await.expect("list");
    assert!(active.iter().all(|e| e.id != bob.id));

    let err = changes::submit_transfer(&env.db, bob.id, target(1, 1, "2024-07-01"), env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::InvalidState(_)));
}

#[tokio::test]
async fn rejection_leaves_employee_untouched() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let request = changes::submit_resignation(&env.db, bob.id, "2024-06-30", env.user_id)
        .await
        .expect("submit");

    let rejected = changes::reject(&env.db, request.id, env.user_id)
        .await
        .expect("reject");
    assert_eq!(rejected.status, Status::Rejected);

    let after = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(after, bob);
}

#[tokio::test]
async fn resolved_requests_cannot_be_resolved_again() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let request = changes::submit_transfer(&env.db, bob.id, target(1, 1, "2024-02-01"), env.user_id)
        .await
        .expect("submit");
    changes::approve(&env.db, request.id, env.user_id)
        .await
        .expect("approve");
    let placed = employees::get_employee(&env.db, bob.id).await.expect("employee");

    let again = changes::approve(&env.db, request.id, env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(again, HrError::InvalidState(_)));
    let flip = changes::reject(&env.db, request.id, env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(flip, HrError::InvalidState(_)));

    let stored = changes::get_change(&env.db, request.id).await.expect("change");
    assert_eq!(stored.status, Status::Approved);
    let after = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(after, placed);
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let env = setup().await;
    let err = changes::approve(&env.db, 999, env.user_id).await.unwrap_err();
    assert!(matches!(
        err,
        HrError::NotFound {
            entity: "change request",
            ..
        }
    ));
    let err = changes::reject(&env.db, 999, env.user_id).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound { .. }));
}

#[tokio::test]
async fn submissions_for_unknown_employee_create_nothing() {
    let env = setup().await;
    let err = changes::submit_transfer(&env.db, 42, target(1, 1, "2024-02-01"), env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::NotFound {
            entity: "employee",
            id: 42
        }
    ));
    let err = changes::submit_resignation(&env.db, 42, "2024-02-01", env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::NotFound { .. }));

    let count = change_request::Entity::find().count(&env.db).await.expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn transfer_targets_are_validated() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;

    let err = changes::submit_transfer(&env.db, bob.id, target(1, 1, "02/01/2024"), env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::Validation {
            field: "effective_date",
            ..
        }
    ));

    let err = changes::submit_transfer(&env.db, bob.id, target(77, 1, "2024-02-01"), env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::NotFound {
            entity: "company",
            ..
        }
    ));

    // Project 3 belongs to the second demo company.
    let err = changes::submit_transfer(&env.db, bob.id, target(1, 3, "2024-02-01"), env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::Validation {
            field: "new_project",
            ..
        }
    ));

    assert!(changes::list_pending(&env.db).await.expect("pending").is_empty());
}

#[tokio::test]
async fn pending_list_only_shows_open_requests() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let carol = hire(&env, "Carol").await;
    let a = changes::submit_transfer(&env.db, bob.id, target(1, 1, "2024-02-01"), env.user_id)
        .await
        .expect("a");
    let b = changes::submit_resignation(&env.db, carol.id, "2024-02-01", env.user_id)
        .await
        .expect("b");
    let c = changes::submit_transfer(&env.db, carol.id, target(2, 4, "2024-03-01"), env.user_id)
        .await
        .expect("c");
    changes::reject(&env.db, b.id, env.user_id).await.expect("reject");

    let pending: Vec<i32> = changes::list_pending(&env.db)
        .await
        .expect("pending")
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(pending.len(), 2);
    assert!(pending.contains(&a.id));
    assert!(pending.contains(&c.id));
}

#[tokio::test]
async fn failed_effect_rolls_back_the_approval() {
    let env = setup().await;
    let bob = hire(&env, "Bob").await;
    let transfer = changes::submit_transfer(&env.db, bob.id, target(1, 1, "2024-02-01"), env.user_id)
        .await
        .expect("transfer");
    let resign = changes::submit_resignation(&env.db, bob.id, "2024-01-15", env.user_id)
        .await
        .expect("resign");
    changes::approve(&env.db, resign.id, env.user_id)
        .await
        .expect("approve resignation");

    let err = changes::approve(&env.db, transfer.id, env.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::InvalidState(_)));

    let stored = changes::get_change(&env.db, transfer.id).await.expect("change");
    assert_eq!(stored.status, Status::Pending);
    assert_eq!(stored.resolved_at, None);
    let employee = employees::get_employee(&env.db, bob.id).await.expect("employee");
    assert_eq!(employee.company_id, None);
}

#[test]
fn effects_dispatch_on_kind() {
    let base = change_request::Model {
        id: 1,
        kind: Kind::Transfer,
        employee_id: 1,
        from_company_id: None,
        to_company_id: Some(2),
        from_project_id: None,
        to_project_id: Some(3),
        effective_date: date("2024-02-01"),
        status: Status::Pending,
        creator_id: 1,
        created_at: chrono::Utc::now().into(),
        resolved_at: None,
        resolved_by: None,
    };
    assert_eq!(
        ChangeEffect::from_request(&base).expect("transfer"),
        ChangeEffect::Transfer {
            company_id: 2,
            project_id: 3,
            effective_date: date("2024-02-01"),
        }
    );

    let resignation = change_request::Model {
        kind: Kind::Resignation,
        to_company_id: None,
        to_project_id: None,
        ..base.clone()
    };
    assert_eq!(
        ChangeEffect::from_request(&resignation).expect("resignation"),
        ChangeEffect::Resignation {
            effective_date: date("2024-02-01"),
        }
    );

    let broken = change_request::Model {
        to_project_id: None,
        ..base
    };
    assert!(ChangeEffect::from_request(&broken).is_err());
}
