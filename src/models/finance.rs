// src/models/finance.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::settings::BankingInfo;

// Avisos: o cálculo não rejeita nem corrige valores, só sinaliza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementWarning {
    DiscountOutOfRange(Decimal),
    NegativeFinalPrice(Decimal),
    // Montante fora da faixa do Decimal; valores zerados
    ArithmeticOverflow,
}

/// Termos monetários de uma reserva.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub list_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub deposit_required: Decimal,
    pub balance_due_on_site: Decimal, // final_price - deposit_required
    pub is_new_client: bool,
    pub warnings: Vec<SettlementWarning>,
}

/// Tudo que o formatador externo (WhatsApp / e-mail) precisa para a
/// mensagem de pagamento. O motor não gera texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotice {
    pub appointment_id: Uuid,
    pub patient_name: String,
    pub phone: String,
    pub email: String,
    pub client_code: String,
    pub payment_reference: String, // "Abono <clientCode>"
    pub service: String,
    pub settlement: Settlement,
    pub banking_info: Option<BankingInfo>,
    // Só para cliente novo: o sinal precisa cair 1h antes do horário
    pub payment_deadline: Option<NaiveDateTime>,
}
