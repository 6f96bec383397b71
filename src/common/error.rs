// src/common/error.rs

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::appointment::AppointmentStatus;

// Um único tipo de erro para todo o motor, com `thiserror` para a ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Horário inválido: '{0}' (esperado HH:MM)")]
    InvalidTimeFormat(String),

    #[error("Bloqueio de horário inválido: '{0}' (esperado AAAA-MM-DD HH:MM)")]
    InvalidSlotKey(String),

    #[error("O horário {date} {hour} não está disponível", hour = .time.format("%H:%M"))]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },

    #[error("A data {0} já passou")]
    DateInPast(NaiveDate),

    #[error("A data {0} está bloqueada")]
    DateBlocked(NaiveDate),

    #[error("O estabelecimento não abre em {0}")]
    DayClosed(NaiveDate),

    #[error("Item de catálogo não encontrado: {0}")]
    ItemNotFound(String),

    #[error("O item '{0}' não está disponível para reserva")]
    ItemNotOffered(String),

    #[error("Paciente não encontrado: {0}")]
    PatientNotFound(Uuid),

    #[error("Agendamento não encontrado: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Agendamento já existe: {0}")]
    DuplicateAppointment(Uuid),

    // Cancelado é terminal: só leitura a partir daqui.
    #[error("O agendamento {0} está cancelado")]
    AppointmentCancelled(Uuid),

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("O agendamento {0} não pertence a este cliente")]
    NotAppointmentOwner(Uuid),
}

impl AppError {
    /// Monta um `ValidationErrors` de um único campo, para regras que o
    /// derive do `validator` não expressa (ex: telefone com 10 dígitos).
    pub fn field(field: &'static str, code: &'static str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.to_string().into());
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}
