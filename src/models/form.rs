// src/models/form.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

// --- ENUMS ---

// Método de entrega escolhido no passo "delivery" do formulário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Digital,
    Courier,
    Pickup,
}

impl DeliveryMethod {
    /// Taxa fixa cobrada por método de entrega.
    pub fn fee(&self) -> Decimal {
        match self {
            DeliveryMethod::Digital => Decimal::ZERO,
            // Entrega por portador/correio tem custo fixo
            DeliveryMethod::Courier => Decimal::new(4500, 2),
            DeliveryMethod::Pickup => Decimal::ZERO,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Digital => "digital",
            DeliveryMethod::Courier => "courier",
            DeliveryMethod::Pickup => "pickup",
        }
    }
}

// --- DOCUMENTOS E ASSINANTES ---

// Referência a um arquivo já enviado para o storage.
// O upload em si acontece fora deste backend; aqui só guardamos a referência.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadedDocument {
    #[schema(example = "doc_8f3a2b")]
    pub id: String,

    #[schema(example = "procuracao.pdf")]
    pub file_name: String,

    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Signatory {
    #[schema(example = "João Pereira")]
    pub full_name: String,

    pub email: Option<String>,

    #[schema(example = "12345678900")]
    pub document_number: Option<String>,
}

// --- O RASCUNHO DO FORMULÁRIO ---

// O snapshot completo do formulário em andamento.
// Todos os campos têm default: um rascunho corrompido ou de uma versão
// antiga do cliente degrada para os valores vazios em vez de falhar o parse.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    #[schema(example = "Maria")]
    pub first_name: String,

    #[schema(example = "da Silva")]
    pub last_name: String,

    #[schema(example = "maria@email.com")]
    pub email: String,

    pub phone: String,
    pub address: String,

    // Slugs dos serviços do catálogo selecionados no passo 2
    #[schema(example = json!(["apostille", "sworn-translation"]))]
    pub selected_services: Vec<String>,

    // Documentos enviados, agrupados por serviço selecionado
    pub service_documents: HashMap<String, Vec<UploadedDocument>>,

    pub delivery_method: Option<DeliveryMethod>,

    pub signatories: Vec<Signatory>,

    #[schema(example = "BRL")]
    pub currency: String,

    pub notes: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            selected_services: Vec::new(),
            service_documents: HashMap::new(),
            delivery_method: None,
            signatories: Vec::new(),
            currency: "BRL".to_string(),
            notes: String::new(),
        }
    }
}

impl FormData {
    /// Identidade mínima preenchida (nome, sobrenome e e-mail não vazios após trim).
    pub fn has_identity(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
    }

    /// Total de documentos enviados, contando apenas os serviços selecionados.
    pub fn total_documents(&self) -> usize {
        self.selected_services
            .iter()
            .filter_map(|slug| self.service_documents.get(slug))
            .map(|docs| docs.len())
            .sum()
    }

    /// Quantidade de documentos de um serviço específico.
    pub fn documents_for(&self, service_slug: &str) -> usize {
        self.service_documents
            .get(service_slug)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_degrada_para_default_em_json_parcial() {
        // Rascunho antigo sem metade dos campos: o parse não pode falhar.
        let form: FormData = serde_json::from_str(r#"{"firstName":"Ana"}"#).unwrap();
        assert_eq!(form.first_name, "Ana");
        assert_eq!(form.currency, "BRL");
        assert!(form.selected_services.is_empty());
        assert!(form.delivery_method.is_none());
    }

    #[test]
    fn total_documents_ignora_servicos_nao_selecionados() {
        let mut form = FormData::default();
        form.selected_services = vec!["apostille".into()];
        form.service_documents.insert(
            "apostille".into(),
            vec![UploadedDocument { id: "d1".into(), ..Default::default() }],
        );
        // Documentos órfãos de um serviço desmarcado não contam
        form.service_documents.insert(
            "sworn-translation".into(),
            vec![UploadedDocument { id: "d2".into(), ..Default::default() }],
        );

        assert_eq!(form.total_documents(), 1);
    }
}
