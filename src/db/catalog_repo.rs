// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::NotaryService};

const SERVICE_COLUMNS: &str = "id, tenant_id, slug, name, description, base_price, \
                               per_document_price, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria um serviço do catálogo; slug duplicado no tenant é recusado.
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
        let sql = format!(
            "INSERT INTO notary_services
                 (tenant_id, slug, name, description, base_price, per_document_price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SERVICE_COLUMNS}"
        );

        sqlx::query_as::<_, NotaryService>(&sql)
            .bind(tenant_id)
            .bind(slug)
            .bind(name)
            .bind(description)
            .bind(base_price)
            .bind(per_document_price)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(format!(
                            "O serviço '{}' já existe.",
                            slug
                        ));
                    }
                }
                e.into()
            })
    }

    /// Lista o catálogo; o formulário público só enxerga os ativos.
    pub async fn list_services<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<NotaryService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS}
             FROM notary_services
             WHERE tenant_id = $1 AND (NOT $2 OR is_active)
             ORDER BY name ASC"
        );

        let services = sqlx::query_as::<_, NotaryService>(&sql)
            .bind(tenant_id)
            .bind(only_active)
            .fetch_all(executor)
            .await?;

        Ok(services)
    }

    /// Busca os serviços correspondentes aos slugs selecionados no formulário.
    pub async fn find_by_slugs<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        slugs: &[String],
    ) -> Result<Vec<NotaryService>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS}
             FROM notary_services
             WHERE tenant_id = $1 AND slug = ANY($2) AND is_active"
        );

        let services = sqlx::query_as::<_, NotaryService>(&sql)
            .bind(tenant_id)
            .bind(slugs)
            .fetch_all(executor)
            .await?;

        Ok(services)
    }
}
