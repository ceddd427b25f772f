// src/db/crm_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::crm::Client};

const CLIENT_COLUMNS: &str =
    "id, tenant_id, user_id, full_name, email, phone, document_number, notes, created_at, updated_at";

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        document_number: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO clients (tenant_id, full_name, email, phone, document_number, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CLIENT_COLUMNS}"
        );

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(tenant_id)
            .bind(full_name)
            .bind(email)
            .bind(phone)
            .bind(document_number)
            .bind(notes)
            .fetch_one(executor)
            .await?;

        Ok(client)
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS}
             FROM clients
             WHERE tenant_id = $1
             ORDER BY full_name ASC"
        );

        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;

        Ok(clients)
    }

    /// Busca por nome, e-mail ou documento (para a tela do back-office).
    pub async fn search_clients<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        query: &str,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let search_term = format!("%{}%", query);

        let sql = format!(
            "SELECT {CLIENT_COLUMNS}
             FROM clients
             WHERE tenant_id = $1
               AND (full_name ILIKE $2 OR email ILIKE $2 OR document_number ILIKE $2)
             ORDER BY full_name ASC
             LIMIT 50"
        );

        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(tenant_id)
            .bind(search_term)
            .fetch_all(executor)
            .await?;

        Ok(clients)
    }

    /// Reaproveita o cliente pelo e-mail ao finalizar uma submissão.
    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS}
             FROM clients
             WHERE tenant_id = $1 AND email = $2
             LIMIT 1"
        );

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(tenant_id)
            .bind(email)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    /// O LINK: vincula clientes órfãos ao usuário recém-registrado
    /// que compartilha o mesmo e-mail.
    pub async fn link_user_to_existing_clients<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        email: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE clients
             SET user_id = $1, updated_at = NOW()
             WHERE email = $2 AND user_id IS NULL",
        )
        .bind(user_id)
        .bind(email)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
