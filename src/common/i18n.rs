// src/common/i18n.rs

// Tradução dos códigos de erro para a mensagem final.
// Os handlers trabalham com códigos ("session_required"); a frase que o
// cliente vê sai daqui, no idioma do Accept-Language.

use std::collections::HashMap;

const DEFAULT_LOCALE: &str = "en";

pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();

        messages.insert(
            "pt",
            HashMap::from([
                ("validation", "Um ou mais campos são inválidos."),
                ("session_required", "O identificador de sessão é obrigatório."),
                ("email_exists", "Este e-mail já está em uso."),
                ("invalid_credentials", "E-mail ou senha inválidos."),
                ("invalid_token", "Token de autenticação inválido ou ausente."),
                ("user_not_found", "Usuário não encontrado."),
                ("tenant_access_denied", "Sem acesso a este estabelecimento."),
                ("submission_not_found", "Solicitação não encontrada."),
                ("submission_conflict", "A solicitação foi alterada por outra gravação. Tente novamente."),
                ("service_not_found", "Serviço não encontrado no catálogo."),
                ("client_not_found", "Cliente não encontrado."),
                ("invalid_transition", "Mudança de status não permitida."),
                ("unique_violation", "Registro duplicado."),
                ("internal_error", "Ocorreu um erro inesperado."),
            ]),
        );

        messages.insert(
            "en",
            HashMap::from([
                ("validation", "One or more fields are invalid."),
                ("session_required", "The session identifier is required."),
                ("email_exists", "This e-mail is already in use."),
                ("invalid_credentials", "Invalid e-mail or password."),
                ("invalid_token", "Missing or invalid authentication token."),
                ("user_not_found", "User not found."),
                ("tenant_access_denied", "No access to this tenant."),
                ("submission_not_found", "Submission not found."),
                ("submission_conflict", "The submission was changed by another write. Please retry."),
                ("service_not_found", "Service not found in the catalog."),
                ("client_not_found", "Client not found."),
                ("invalid_transition", "Status change not allowed."),
                ("unique_violation", "Duplicate record."),
                ("internal_error", "An unexpected error occurred."),
            ]),
        );

        Self { messages }
    }

    /// Busca a mensagem do código no idioma pedido; cai para o inglês e,
    /// em último caso, devolve o próprio código.
    pub fn translate(&self, locale: &str, code: &str) -> String {
        self.messages
            .get(locale)
            .and_then(|table| table.get(code))
            .or_else(|| self.messages.get(DEFAULT_LOCALE).and_then(|table| table.get(code)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traduz_no_idioma_pedido() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "email_exists"), "Este e-mail já está em uso.");
        assert_eq!(store.translate("en", "email_exists"), "This e-mail is already in use.");
    }

    #[test]
    fn idioma_desconhecido_cai_para_o_ingles() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "validation"), "One or more fields are invalid.");
    }

    #[test]
    fn codigo_desconhecido_volta_o_proprio_codigo() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "algo_que_nao_existe"), "algo_que_nao_existe");
    }
}
