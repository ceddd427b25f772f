// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::TenantRepository, models::tenancy::Tenant};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, pool: PgPool) -> Self {
        Self { tenant_repo, pool }
    }

    /// Cria um novo Estabelecimento e, atomicamente, atribui o utilizador
    /// que o criou como o seu primeiro membro.
    pub async fn create_tenant_with_owner(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: Uuid,
    ) -> Result<Tenant, AppError> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o Estabelecimento (Tenant)
        let new_tenant = self.tenant_repo.create_tenant(&mut *tx, name, description).await?;

        // 3. Atribui o criador como membro
        self.tenant_repo
            .assign_user_to_tenant(&mut *tx, owner_id, new_tenant.id)
            .await?;

        // 4. Se chegou aqui, deu tudo certo
        tx.commit().await?;

        tracing::info!(tenant_id = %new_tenant.id, "🏛️ Estabelecimento criado");
        Ok(new_tenant)
    }

    pub async fn list_my_tenants(&self, user_id: Uuid) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_tenants_by_user(user_id).await
    }

    pub async fn check_access(&self, user_id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        if self.tenant_repo.check_user_tenancy(user_id, tenant_id).await? {
            Ok(())
        } else {
            Err(AppError::TenantAccessDenied)
        }
    }
}
