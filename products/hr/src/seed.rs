use entity::{company, project};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use crate::HrResult;

/// Companies and their projects created by [`seed_demo_catalog`].
pub const DEMO_CATALOG: &[(&str, &[&str])] = &[
    ("Northwind Engineering", &["Harbor Bridge Retrofit", "Metro Line 4"]),
    ("Bluepeak Construction", &["Riverside Towers", "Airport Terminal B"]),
    ("Greenfield Energy", &["Solar Farm West"]),
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SeedReport {
    pub companies_created: usize,
    pub projects_created: usize,
}

/// Insert the demo catalog. Rows that already exist by name are left alone,
/// so running it twice is harmless.
pub async fn seed_demo_catalog<C>(db: &C) -> HrResult<SeedReport>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for (company_name, projects) in DEMO_CATALOG {
        let existing = company::Entity::find()
            .filter(company::Column::Name.eq(*company_name))
            .one(&txn)
            .await?;
        let company = match existing {
            Some(model) => model,
            None => {
                report.companies_created += 1;
                company::ActiveModel {
                    name: Set((*company_name).to_string()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        for project_name in *projects {
            let present = project::Entity::find()
                .filter(project::Column::Name.eq(*project_name))
                .one(&txn)
                .await?
                .is_some();
            if present {
                continue;
            }
            project::ActiveModel {
                name: Set((*project_name).to_string()),
                company_id: Set(company.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            report.projects_created += 1;
        }
    }

    txn.commit().await?;
    info!(
        companies = report.companies_created,
        projects = report.projects_created,
        "demo catalog seeded"
    );
    Ok(report)
}
