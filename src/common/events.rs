// src/common/events.rs

// Barramento explícito para os sinais não-fatais de persistência de rascunho.
// O destino é injetado no DraftStore (nada de listas globais de listeners).

use async_trait::async_trait;
use serde::Serialize;

// Sinais emitidos durante uma gravação de rascunho.
// Nenhum deles interrompe o preenchimento do formulário.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageSignal {
    // Acima do limite brando: ainda grava, mas avisa
    QuotaWarning { key: String, bytes: usize },
    // Acima do limite rígido: a gravação no backend é recusada
    QuotaExceeded { key: String, bytes: usize },
    // O backend rejeitou a gravação por qualquer outro motivo
    SaveError { key: String, message: String },
}

impl StorageSignal {
    /// Código curto exposto na resposta HTTP do PUT de rascunho.
    pub fn code(&self) -> &'static str {
        match self {
            StorageSignal::QuotaWarning { .. } => "quota_warning",
            StorageSignal::QuotaExceeded { .. } => "quota_exceeded",
            StorageSignal::SaveError { .. } => "save_error",
        }
    }
}

#[async_trait]
pub trait StorageSignalSink: Send + Sync {
    async fn publish(&self, signal: StorageSignal);
}

// Destino padrão em produção: registra o sinal no log estruturado.
pub struct TracingSignalSink;

#[async_trait]
impl StorageSignalSink for TracingSignalSink {
    async fn publish(&self, signal: StorageSignal) {
        match &signal {
            StorageSignal::QuotaWarning { key, bytes } => {
                tracing::warn!(key, bytes, "⚠️ Rascunho acima do limite brando de tamanho");
            }
            StorageSignal::QuotaExceeded { key, bytes } => {
                tracing::warn!(key, bytes, "⚠️ Rascunho recusado: limite rígido de tamanho");
            }
            StorageSignal::SaveError { key, message } => {
                tracing::error!(key, %message, "🔥 Falha ao persistir rascunho");
            }
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    // Sink de teste que apenas acumula os sinais recebidos.
    #[derive(Default)]
    pub struct RecordingSink {
        pub signals: Mutex<Vec<StorageSignal>>,
    }

    #[async_trait]
    impl StorageSignalSink for RecordingSink {
        async fn publish(&self, signal: StorageSignal) {
            self.signals.lock().unwrap().push(signal);
        }
    }
}
