use anyhow::{Result, anyhow};
use chrono::Utc;
use entity::{app_user, change_request, employee};
use hr_tests::PgTestContext;
use products_hr::changes::{self, TransferTarget};
use products_hr::employees::{self, NewEmployee};
use products_hr::{HrError, seed};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

#[tokio::test]
async fn concurrent_approvals_resolve_once() -> Result<()> {
    let Some(ctx) = PgTestContext::new().await else {
        return Ok(());
    };
    let result = race(&ctx).await;
    ctx.cleanup().await;
    result
}

#[tokio::test]
async fn transfer_approval_cannot_undo_a_concurrent_resignation() -> Result<()> {
    let Some(ctx) = PgTestContext::new().await else {
        return Ok(());
    };
    let result = transfer_vs_resignation(&ctx).await;
    ctx.cleanup().await;
    result
}

async fn prepare(pool: &DatabaseConnection) -> Result<app_user::Model> {
    seed::seed_demo_catalog(pool).await?;
    let approver = app_user::ActiveModel {
        username: Set("approver".into()),
        password_hash: Set("unused".into()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(pool)
    .await?;
    Ok(approver)
}

async fn hire(pool: &DatabaseConnection, name: String, creator_id: i32) -> Result<employee::Model> {
    Ok(employees::add_employee(
        pool,
        NewEmployee {
            name: Some(name),
            position: Some("Engineer".into()),
            hire_date: Some("2024-01-01".into()),
        },
        creator_id,
    )
    .await?)
}

async fn race(ctx: &PgTestContext) -> Result<()> {
    let pool = &ctx.pool;
    let approver = prepare(pool).await?;

    for round in 0..10 {
        let hired = hire(pool, format!("Racer {round}"), approver.id).await?;
        let request = changes::submit_transfer(
            pool,
            hired.id,
            TransferTarget {
                company_id: 1,
                project_id: 1,
                effective_date: "2024-02-01",
            },
            approver.id,
        )
        .await?;

        let (first, second) = tokio::join!(
            changes::approve(pool, request.id, approver.id),
            changes::reject(pool, request.id, approver.id),
        );
        let outcomes = [first, second];
        let winners: Vec<&change_request::Model> =
            outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
        if winners.len() != 1 {
            return Err(anyhow!("round {round}: {} resolutions succeeded", winners.len()));
        }
        let loser_state = outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, HrError::InvalidState(_)));
        if !loser_state {
            return Err(anyhow!("round {round}: losing resolution did not report InvalidState"));
        }

        let stored = changes::get_change(pool, request.id).await?;
        let placed = employees::get_employee(pool, hired.id).await?;
        let expected_company = match stored.status {
            change_request::Status::Approved => Some(1),
            change_request::Status::Rejected => None,
            change_request::Status::Pending => {
                return Err(anyhow!("round {round}: request left pending"));
            }
        };
        assert_eq!(stored.status, winners[0].status);
        assert_eq!(placed.company_id, expected_company);
        if expected_company.is_none() {
            assert_eq!(placed.status, employee::Status::PendingAssignment);
        }
    }
    Ok(())
}

async fn transfer_vs_resignation(ctx: &PgTestContext) -> Result<()> {
    let pool = &ctx.pool;
    let approver = prepare(pool).await?;

    for round in 0..20 {
        let hired = hire(pool, format!("Leaver {round}"), approver.id).await?;
        let transfer = changes::submit_transfer(
            pool,
            hired.id,
            TransferTarget {
                company_id: 1,
                project_id: 1,
                effective_date: "2024-02-01",
            },
            approver.id,
        )
        .await?;
        let resignation =
            changes::submit_resignation(pool, hired.id, "2024-03-01", approver.id).await?;

        let (approver_id, transfer_id, resignation_id) = (approver.id, transfer.id, resignation.id);
        let moved = tokio::spawn({
            let pool = pool.clone();
            async move { changes::approve(&pool, transfer_id, approver_id).await }
        });
        let left = tokio::spawn({
            let pool = pool.clone();
            async move { changes::approve(&pool, resignation_id, approver_id).await }
        });
        let (moved, left) = (moved.await?, left.await?);

        if let Err(err) = &left {
            return Err(anyhow!("round {round}: resignation approval failed: {err}"));
        }
        let stored = employees::get_employee(pool, hired.id).await?;
        if stored.status != employee::Status::Resigned {
            return Err(anyhow!(
                "round {round}: approved resignation left employee {:?}",
                stored.status
            ));
        }

        let transfer_state = changes::get_change(pool, transfer_id).await?.status;
        match moved {
            Ok(_) => assert_eq!(transfer_state, change_request::Status::Approved),
            Err(HrError::InvalidState(_)) => {
                assert_eq!(transfer_state, change_request::Status::Pending);
            }
            Err(err) => return Err(anyhow!("round {round}: transfer approval failed: {err}")),
        }
    }
    Ok(())
}
