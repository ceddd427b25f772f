// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::CatalogRepository, models::catalog::NotaryService};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    pub async fn create_service<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        slug: &str,
        name: &str,
        description: Option<&str>,
        base_price: Decimal,
        per_document_price: Decimal,
    ) -> Result<NotaryService, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .create_service(executor, tenant_id, slug, name, description, base_price, per_document_price)
            .await
    }

    /// `only_active = true` para o formulário público; o back-office vê tudo.
    pub async fn list_services<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<NotaryService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_services(executor, tenant_id, only_active).await
    }
}
