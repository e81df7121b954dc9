use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Company {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    Name,
    CompanyId,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    Name,
    Position,
    HireDate,
    Status,
    CompanyId,
    ProjectId,
    CreatorId,
}

#[derive(DeriveIden)]
enum ChangeRequest {
    Table,
    Id,
    #[sea_orm(iden = "type")]
    Kind,
    EmployeeId,
    FromCompanyId,
    ToCompanyId,
    FromProjectId,
    ToProjectId,
    EffectiveDate,
    Status,
    CreatorId,
    CreatedAt,
    ResolvedAt,
    ResolvedBy,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Company::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Company::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Project::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Project::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Project::CompanyId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_company")
                            .from(Project::Table, Project::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_company")
                    .table(Project::Table)
                    .col(Project::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Employee::Position).string_len(64).not_null())
                    .col(ColumnDef::new(Employee::HireDate).date().not_null())
                    .col(
                        ColumnDef::new(Employee::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending-assignment"),
                    )
                    .col(ColumnDef::new(Employee::CompanyId).integer())
                    .col(ColumnDef::new(Employee::ProjectId).integer())
                    .col(ColumnDef::new(Employee::CreatorId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_company")
                            .from(Employee::Table, Employee::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_project")
                            .from(Employee::Table, Employee::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_creator")
                            .from(Employee::Table, Employee::CreatorId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_status")
                    .table(Employee::Table)
                    .col(Employee::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChangeRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChangeRequest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChangeRequest::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(ChangeRequest::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(ChangeRequest::FromCompanyId).integer())
                    .col(ColumnDef::new(ChangeRequest::ToCompanyId).integer())
                    .col(ColumnDef::new(ChangeRequest::FromProjectId).integer())
                    .col(ColumnDef::new(ChangeRequest::ToProjectId).integer())
                    .col(ColumnDef::new(ChangeRequest::EffectiveDate).date().not_null())
                    .col(
                        ColumnDef::new(ChangeRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ChangeRequest::CreatorId).integer().not_null())
                    .col(
                        ColumnDef::new(ChangeRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChangeRequest::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ChangeRequest::ResolvedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_change_request_employee")
                            .from(ChangeRequest::Table, ChangeRequest::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_change_request_creator")
                            .from(ChangeRequest::Table, ChangeRequest::CreatorId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_request_status")
                    .table(ChangeRequest::Table)
                    .col(ChangeRequest::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_change_request_employee")
                    .table(ChangeRequest::Table)
                    .col(ChangeRequest::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChangeRequest::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await?;
        Ok(())
    }
}
