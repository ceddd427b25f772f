// src/services/resume.rs

// Decide em qual passo do formulário o cliente deve retomar o preenchimento.
// Função pura sobre o snapshot do rascunho; a camada de rotas chama uma vez
// na entrada de /form, não a cada tecla.

use crate::models::form::FormData;

// Os cinco passos lineares do formulário, na ordem de navegação.
pub const WIZARD_STEP_PATHS: [&str; 5] = [
    "/form/personal-info",
    "/form/choose-services",
    "/form/documents",
    "/form/delivery",
    "/form/summary",
];

/// Cascata ordenada de checagens de necessidade: a primeira que falhar vence.
pub fn resume_step_index(form: &FormData) -> usize {
    if !form.has_identity() {
        return 0;
    }
    if form.selected_services.is_empty() {
        return 1;
    }
    if form.total_documents() == 0 {
        return 2;
    }
    if form.delivery_method.is_none() {
        return 3;
    }
    4
}

/// Caminho fixo do passo de retomada, preservando a query string existente.
pub fn resume_path(form: &FormData, query: Option<&str>) -> String {
    let path = WIZARD_STEP_PATHS[resume_step_index(form)];
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", path, q),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::{DeliveryMethod, UploadedDocument};

    fn form_com_identidade() -> FormData {
        FormData {
            first_name: "Maria".into(),
            last_name: "da Silva".into(),
            email: "maria@email.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn identidade_incompleta_volta_para_o_passo_zero() {
        let mut form = FormData::default();
        assert_eq!(resume_step_index(&form), 0);

        // Só espaços também conta como vazio
        form.first_name = "  ".into();
        form.last_name = "da Silva".into();
        form.email = "maria@email.com".into();
        assert_eq!(resume_step_index(&form), 0);
    }

    #[test]
    fn sem_servicos_selecionados_vai_para_o_passo_um() {
        let form = form_com_identidade();
        assert_eq!(resume_step_index(&form), 1);
    }

    #[test]
    fn sem_documentos_vai_para_o_passo_dois() {
        let mut form = form_com_identidade();
        form.selected_services = vec!["apostille".into()];
        assert_eq!(resume_step_index(&form), 2);
    }

    #[test]
    fn sem_metodo_de_entrega_vai_para_o_passo_tres() {
        let mut form = form_com_identidade();
        form.selected_services = vec!["apostille".into()];
        form.service_documents.insert(
            "apostille".into(),
            vec![UploadedDocument { id: "d1".into(), ..Default::default() }],
        );
        assert_eq!(resume_step_index(&form), 3);
    }

    #[test]
    fn tudo_preenchido_cai_no_resumo() {
        let mut form = form_com_identidade();
        form.selected_services = vec!["apostille".into()];
        form.service_documents.insert(
            "apostille".into(),
            vec![UploadedDocument { id: "d1".into(), ..Default::default() }],
        );
        form.delivery_method = Some(DeliveryMethod::Digital);
        assert_eq!(resume_step_index(&form), 4);
    }

    #[test]
    fn resume_e_idempotente() {
        let mut form = form_com_identidade();
        form.selected_services = vec!["apostille".into()];
        let first = resume_step_index(&form);
        let second = resume_step_index(&form);
        assert_eq!(first, second);
    }

    #[test]
    fn resume_path_preserva_a_query_string() {
        let form = FormData::default();
        assert_eq!(resume_path(&form, None), "/form/personal-info");
        assert_eq!(
            resume_path(&form, Some("utm_source=ads&lang=pt")),
            "/form/personal-info?utm_source=ads&lang=pt"
        );
        assert_eq!(resume_path(&form, Some("")), "/form/personal-info");
    }
}
