// src/services/crm_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::CrmRepository, models::crm::Client};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
}

impl CrmService {
    pub fn new(repo: CrmRepository) -> Self {
        Self { repo }
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
        self.repo
            .create_client(executor, tenant_id, full_name, email, phone, document_number, notes)
            .await
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_clients(executor, tenant_id).await
    }

    /// Busca por nome, e-mail ou documento; termo vazio lista tudo.
    pub async fn search_clients<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        query: &str,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if query.trim().is_empty() {
            return self.repo.list_clients(executor, tenant_id).await;
        }
        self.repo.search_clients(executor, tenant_id, query.trim()).await
    }
}
