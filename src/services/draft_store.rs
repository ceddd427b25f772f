// src/services/draft_store.rs

// Persistência durável do rascunho do formulário, com sinalização de quota.
//
// A cópia em memória é a autoridade: falha de persistência vira sinal no
// barramento injetado, nunca erro para quem chama. Gravações vindas de outra
// "aba" (outra instância do cliente) no mesmo rascunho são observadas pelo
// canal de eventos e ignoradas dentro da janela de proteção configurável.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{StorageSignal, StorageSignalSink},
    },
    models::form::FormData,
};

// Limite brando: avisa mas grava. Limite rígido: recusa a gravação no backend.
pub const SOFT_QUOTA_BYTES: usize = 4 * 1024 * 1024;
pub const HARD_QUOTA_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DraftStoreConfig {
    pub soft_quota_bytes: usize,
    pub hard_quota_bytes: usize,

    // Janela em que gravações de OUTRO escritor na mesma chave são ignoradas,
    // contada a partir da última gravação local. `None` desliga a proteção.
    pub protection_window: Option<Duration>,
}

impl Default for DraftStoreConfig {
    fn default() -> Self {
        Self {
            soft_quota_bytes: SOFT_QUOTA_BYTES,
            hard_quota_bytes: HARD_QUOTA_BYTES,
            protection_window: Some(Duration::from_secs(2)),
        }
    }
}

// O backend de persistência fica atrás de uma interface única:
// em produção é o repositório SQL, nos testes um mapa em memória.
#[async_trait]
pub trait DraftBackend: Send + Sync {
    async fn load(&self, tenant_id: Uuid, key: &str) -> Result<Option<String>, AppError>;
    async fn store(
        &self,
        tenant_id: Uuid,
        key: &str,
        payload: &str,
        byte_size: i64,
    ) -> Result<(), AppError>;
    async fn remove(&self, tenant_id: Uuid, key: &str) -> Result<(), AppError>;
}

// Notificação de mudança em um rascunho, para quem assina o canal.
#[derive(Debug, Clone)]
pub struct DraftEvent {
    pub tenant_id: Uuid,
    pub key: String,
    pub writer: String,
}

// Resultado de uma gravação. Nunca é um erro: o formulário continua.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftWriteOutcome {
    pub persisted: bool,

    // quota_warning | quota_exceeded | save_error | protected
    #[schema(example = "quota_warning")]
    pub signal: Option<String>,
}

impl DraftWriteOutcome {
    fn persisted_with(signal: Option<&str>) -> Self {
        Self { persisted: true, signal: signal.map(str::to_string) }
    }

    fn rejected(signal: &str) -> Self {
        Self { persisted: false, signal: Some(signal.to_string()) }
    }
}

struct CachedDraft {
    form: FormData,
    last_writer: String,
    last_write: Option<Instant>,
}

pub struct DraftStore {
    backend: Arc<dyn DraftBackend>,
    signals: Arc<dyn StorageSignalSink>,
    config: DraftStoreConfig,
    cache: RwLock<HashMap<(Uuid, String), CachedDraft>>,
    events: broadcast::Sender<DraftEvent>,
}

impl DraftStore {
    pub fn new(
        backend: Arc<dyn DraftBackend>,
        signals: Arc<dyn StorageSignalSink>,
        config: DraftStoreConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self { backend, signals, config, cache: RwLock::new(HashMap::new()), events }
    }

    /// Assina o canal de mudanças de rascunho.
    pub fn subscribe(&self) -> broadcast::Receiver<DraftEvent> {
        self.events.subscribe()
    }

    /// Lê o rascunho; chave ausente ou JSON corrompido degradam para o
    /// fallback fornecido. Leitura nunca falha.
    pub async fn read(&self, tenant_id: Uuid, key: &str, fallback: FormData) -> FormData {
        let map_key = (tenant_id, key.to_string());

        if let Some(entry) = self.cache.read().await.get(&map_key) {
            return entry.form.clone();
        }

        let payload = match self.backend.load(tenant_id, key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!(key, error = %e, "Falha ao carregar rascunho; usando fallback");
                return fallback;
            }
        };

        let form: FormData = match serde_json::from_str(&payload) {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!(key, error = %e, "Rascunho corrompido; usando fallback");
                fallback
            }
        };

        // Popula o cache sem marcar gravação local: leitura não abre janela
        // de proteção.
        self.cache.write().await.insert(
            map_key,
            CachedDraft { form: form.clone(), last_writer: String::new(), last_write: None },
        );

        form
    }

    /// Grava o rascunho. Sempre retorna um resultado, nunca erro: problemas de
    /// quota ou de backend viram sinais e a cópia em memória segue valendo.
    pub async fn write(
        &self,
        tenant_id: Uuid,
        key: &str,
        form: FormData,
        writer: &str,
    ) -> DraftWriteOutcome {
        let map_key = (tenant_id, key.to_string());

        // Janela de proteção: uma gravação de outro escritor logo após a
        // gravação local é descartada (evita que um snapshot atrasado de outra
        // aba atropele uploads em andamento).
        if let Some(window) = self.config.protection_window {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&map_key) {
                let foreign = !entry.last_writer.is_empty() && entry.last_writer != writer;
                if foreign && entry.last_write.is_some_and(|at| at.elapsed() < window) {
                    return DraftWriteOutcome::rejected("protected");
                }
            }
        }

        let payload = match serde_json::to_string(&form) {
            Ok(payload) => payload,
            Err(e) => {
                let signal =
                    StorageSignal::SaveError { key: key.to_string(), message: e.to_string() };
                self.signals.publish(signal).await;
                self.update_cache(map_key, form, writer).await;
                return DraftWriteOutcome::rejected("save_error");
            }
        };

        let bytes = payload.len();

        if bytes > self.config.hard_quota_bytes {
            self.signals
                .publish(StorageSignal::QuotaExceeded { key: key.to_string(), bytes })
                .await;
            self.update_cache(map_key, form, writer).await;
            return DraftWriteOutcome::rejected("quota_exceeded");
        }

        let mut warning = None;
        if bytes > self.config.soft_quota_bytes {
            self.signals
                .publish(StorageSignal::QuotaWarning { key: key.to_string(), bytes })
                .await;
            warning = Some("quota_warning");
        }

        if let Err(e) = self.backend.store(tenant_id, key, &payload, bytes as i64).await {
            self.signals
                .publish(StorageSignal::SaveError {
                    key: key.to_string(),
                    message: e.to_string(),
                })
                .await;
            self.update_cache(map_key, form, writer).await;
            return DraftWriteOutcome::rejected("save_error");
        }

        self.update_cache(map_key, form, writer).await;

        // Sem assinantes não é erro; o canal só existe para quem quiser ouvir.
        let _ = self.events.send(DraftEvent {
            tenant_id,
            key: key.to_string(),
            writer: writer.to_string(),
        });

        DraftWriteOutcome::persisted_with(warning)
    }

    /// Remove o rascunho (pagamento concluído). Melhor esforço: falha só loga.
    pub async fn clear(&self, tenant_id: Uuid, key: &str) {
        self.cache.write().await.remove(&(tenant_id, key.to_string()));
        if let Err(e) = self.backend.remove(tenant_id, key).await {
            tracing::warn!(key, error = %e, "Falha ao remover rascunho finalizado");
        }
    }

    async fn update_cache(&self, map_key: (Uuid, String), form: FormData, writer: &str) {
        self.cache.write().await.insert(
            map_key,
            CachedDraft {
                form,
                last_writer: writer.to_string(),
                last_write: Some(Instant::now()),
            },
        );
    }
}

/// Gera o identificador de sessão do formulário: `session_<timestamp>_<random>`.
pub fn new_session_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", Utc::now().timestamp_millis(), &random[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::events::test_support::RecordingSink;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // Backend em memória com injeção de falha.
    #[derive(Default)]
    struct MemoryBackend {
        rows: Mutex<HashMap<(Uuid, String), String>>,
        fail_store: AtomicBool,
    }

    #[async_trait]
    impl DraftBackend for MemoryBackend {
        async fn load(&self, tenant_id: Uuid, key: &str) -> Result<Option<String>, AppError> {
            Ok(self.rows.lock().unwrap().get(&(tenant_id, key.to_string())).cloned())
        }

        async fn store(
            &self,
            tenant_id: Uuid,
            key: &str,
            payload: &str,
            _byte_size: i64,
        ) -> Result<(), AppError> {
            if self.fail_store.load(Ordering::SeqCst) {
                return Err(AppError::InternalServerError(anyhow::anyhow!("backend indisponível")));
            }
            self.rows
                .lock()
                .unwrap()
                .insert((tenant_id, key.to_string()), payload.to_string());
            Ok(())
        }

        async fn remove(&self, tenant_id: Uuid, key: &str) -> Result<(), AppError> {
            self.rows.lock().unwrap().remove(&(tenant_id, key.to_string()));
            Ok(())
        }
    }

    fn store_with(
        config: DraftStoreConfig,
    ) -> (DraftStore, Arc<MemoryBackend>, Arc<RecordingSink>) {
        let backend = Arc::new(MemoryBackend::default());
        let sink = Arc::new(RecordingSink::default());
        let store = DraftStore::new(backend.clone(), sink.clone(), config);
        (store, backend, sink)
    }

    fn form_nomeada(nome: &str) -> FormData {
        FormData { first_name: nome.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn grava_e_le_de_volta() {
        let (store, backend, sink) = store_with(DraftStoreConfig::default());
        let tenant = Uuid::new_v4();

        let outcome = store.write(tenant, "session_1_abc", form_nomeada("Ana"), "tab-a").await;
        assert!(outcome.persisted);
        assert!(outcome.signal.is_none());
        assert!(backend.rows.lock().unwrap().len() == 1);
        assert!(sink.signals.lock().unwrap().is_empty());

        let form = store.read(tenant, "session_1_abc", FormData::default()).await;
        assert_eq!(form.first_name, "Ana");
    }

    #[tokio::test]
    async fn chave_ausente_retorna_fallback() {
        let (store, _backend, _sink) = store_with(DraftStoreConfig::default());
        let fallback = form_nomeada("Padrão");
        let form = store.read(Uuid::new_v4(), "nada", fallback).await;
        assert_eq!(form.first_name, "Padrão");
    }

    #[tokio::test]
    async fn rascunho_corrompido_degrada_para_fallback() {
        let (store, backend, _sink) = store_with(DraftStoreConfig::default());
        let tenant = Uuid::new_v4();
        backend
            .rows
            .lock()
            .unwrap()
            .insert((tenant, "session_x".to_string()), "{isso nao é json".to_string());

        let form = store.read(tenant, "session_x", FormData::default()).await;
        assert_eq!(form.first_name, "");
        assert_eq!(form.currency, "BRL");
    }

    #[tokio::test]
    async fn acima_do_limite_brando_avisa_mas_grava() {
        let config = DraftStoreConfig { soft_quota_bytes: 10, ..Default::default() };
        let (store, backend, sink) = store_with(config);
        let tenant = Uuid::new_v4();

        let outcome = store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        assert!(outcome.persisted);
        assert_eq!(outcome.signal.as_deref(), Some("quota_warning"));
        assert_eq!(backend.rows.lock().unwrap().len(), 1);

        let signals = sink.signals.lock().unwrap();
        assert!(matches!(signals[0], StorageSignal::QuotaWarning { .. }));
    }

    #[tokio::test]
    async fn acima_do_limite_rigido_recusa_mas_memoria_segue_valendo() {
        let config =
            DraftStoreConfig { soft_quota_bytes: 5, hard_quota_bytes: 10, ..Default::default() };
        let (store, backend, sink) = store_with(config);
        let tenant = Uuid::new_v4();

        let outcome = store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        assert!(!outcome.persisted);
        assert_eq!(outcome.signal.as_deref(), Some("quota_exceeded"));
        assert!(backend.rows.lock().unwrap().is_empty());

        // A cópia em memória continua sendo a autoridade
        let form = store.read(tenant, "s", FormData::default()).await;
        assert_eq!(form.first_name, "Ana");

        let signals = sink.signals.lock().unwrap();
        assert!(matches!(signals[0], StorageSignal::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn falha_do_backend_vira_sinal_nao_fatal() {
        let (store, backend, sink) = store_with(DraftStoreConfig::default());
        backend.fail_store.store(true, Ordering::SeqCst);
        let tenant = Uuid::new_v4();

        let outcome = store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        assert!(!outcome.persisted);
        assert_eq!(outcome.signal.as_deref(), Some("save_error"));

        let form = store.read(tenant, "s", FormData::default()).await;
        assert_eq!(form.first_name, "Ana");

        let signals = sink.signals.lock().unwrap();
        assert!(matches!(signals[0], StorageSignal::SaveError { .. }));
    }

    #[tokio::test]
    async fn janela_de_protecao_descarta_gravacao_externa() {
        let config = DraftStoreConfig {
            protection_window: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let (store, _backend, _sink) = store_with(config);
        let tenant = Uuid::new_v4();

        store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        let outcome = store.write(tenant, "s", form_nomeada("Beto"), "tab-b").await;

        assert!(!outcome.persisted);
        assert_eq!(outcome.signal.as_deref(), Some("protected"));

        let form = store.read(tenant, "s", FormData::default()).await;
        assert_eq!(form.first_name, "Ana");
    }

    #[tokio::test]
    async fn sem_janela_a_gravacao_externa_e_mesclada() {
        let config = DraftStoreConfig { protection_window: None, ..Default::default() };
        let (store, _backend, _sink) = store_with(config);
        let tenant = Uuid::new_v4();

        store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        let outcome = store.write(tenant, "s", form_nomeada("Beto"), "tab-b").await;
        assert!(outcome.persisted);

        let form = store.read(tenant, "s", FormData::default()).await;
        assert_eq!(form.first_name, "Beto");
    }

    #[tokio::test]
    async fn o_mesmo_escritor_nunca_e_bloqueado_pela_janela() {
        let config = DraftStoreConfig {
            protection_window: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let (store, _backend, _sink) = store_with(config);
        let tenant = Uuid::new_v4();

        store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;
        let outcome = store.write(tenant, "s", form_nomeada("Ana Maria"), "tab-a").await;
        assert!(outcome.persisted);
    }

    #[tokio::test]
    async fn gravacao_bem_sucedida_notifica_assinantes() {
        let (store, _backend, _sink) = store_with(DraftStoreConfig::default());
        let mut rx = store.subscribe();
        let tenant = Uuid::new_v4();

        store.write(tenant, "s", form_nomeada("Ana"), "tab-a").await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, "s");
        assert_eq!(event.writer, "tab-a");
    }

    #[test]
    fn identificador_de_sessao_tem_o_formato_esperado() {
        let id = new_session_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }
}
