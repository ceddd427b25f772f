// src/services/receipt_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, PaymentRepository, SettingsRepository, SubmissionRepository},
    models::form::FormData,
};

#[derive(Clone)]
pub struct ReceiptService {
    submission_repo: SubmissionRepository,
    catalog_repo: CatalogRepository,
    settings_repo: SettingsRepository,
    payment_repo: PaymentRepository,
    pool: PgPool,
}

impl ReceiptService {
    pub fn new(
        submission_repo: SubmissionRepository,
        catalog_repo: CatalogRepository,
        settings_repo: SettingsRepository,
        payment_repo: PaymentRepository,
        pool: PgPool,
    ) -> Self {
        Self { submission_repo, catalog_repo, settings_repo, payment_repo, pool }
    }

    /// Gera o recibo da solicitação em PDF, com o bloco Pix quando o
    /// estabelecimento tem chave configurada.
    pub async fn generate_submission_receipt(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Busca os dados
        let submission = self
            .submission_repo
            .find_by_id(&mut *tx, tenant_id, submission_id)
            .await?
            .ok_or(AppError::SubmissionNotFound)?;

        let settings = self.settings_repo.get_settings(&mut *tx, tenant_id).await?;
        let payments = self.payment_repo.list_for_submission(&mut *tx, submission_id).await?;

        // O snapshot do formulário diz quais serviços e quantos documentos
        let form: FormData = serde_json::from_value(
            submission.raw_data.get("formData").cloned().unwrap_or_default(),
        )
        .unwrap_or_default();

        let services = self
            .catalog_repo
            .find_by_slugs(&mut *tx, tenant_id, &form.selected_services)
            .await?;

        tx.commit().await?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        let display_id = submission.id.simple().to_string()[..8].to_uppercase();
        doc.set_title(format!("Solicitação #{}", display_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let title_text = settings.company_name.unwrap_or("CARTÓRIO".to_string());
        doc.push(
            elements::Paragraph::new(title_text)
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        if let Some(doc_num) = settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("RECIBO / SOLICITAÇÃO #{}", display_id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            submission.created_at.format("%d/%m/%Y")
        )));

        let client_name = format!("{} {}", submission.first_name, submission.last_name);
        if client_name.trim().is_empty() {
            doc.push(elements::Paragraph::new("Cliente: Consumidor Final"));
        } else {
            doc.push(elements::Paragraph::new(format!("Cliente: {}", client_name.trim())));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE SERVIÇOS ---
        // Pesos das colunas: Serviço (4), Docs (1), Base (2), Subtotal (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Docs").styled(style_bold))
            .element(elements::Paragraph::new("Base").styled(style_bold))
            .element(elements::Paragraph::new("Subtotal").styled(style_bold))
            .push()
            .expect("Table error");

        for service in &services {
            let docs = form.documents_for(&service.slug);
            let subtotal = service.base_price
                + service.per_document_price * rust_decimal::Decimal::from(docs as i64);

            table
                .row()
                .element(elements::Paragraph::new(service.name.clone()))
                .element(elements::Paragraph::new(format!("{}", docs)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", service.base_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", subtotal)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut total_paragraph = elements::Paragraph::new(format!(
            "TOTAL GERAL: R$ {:.2}",
            submission.total_amount
        ));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        if !payments.is_empty() {
            let paid: rust_decimal::Decimal = payments.iter().map(|p| p.amount).sum();
            let mut paid_paragraph =
                elements::Paragraph::new(format!("PAGO: R$ {:.2}", paid));
            paid_paragraph.set_alignment(genpdf::Alignment::Right);
            doc.push(paid_paragraph.styled(style::Style::new().with_font_size(10)));
        }

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        if let Some(key) = settings.pix_key {
            doc.push(
                elements::Paragraph::new("PAGAMENTO VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );

            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            // QR Code simples da chave; o payload EMV oficial fica a cargo
            // do provedor de pagamento.
            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        if let Some(addr) = settings.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr)
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
