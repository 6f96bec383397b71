// src/models/appointment.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{error::AppError, time_utils};
use crate::models::catalog::CatalogKey;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// De onde veio a reserva. Define o status inicial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingOrigin {
    Public, // Visitante ou cliente logado no portal
    Staff,  // Agenda administrativa
}

impl BookingOrigin {
    pub fn initial_status(self) -> AppointmentStatus {
        match self {
            BookingOrigin::Public => AppointmentStatus::Pending,
            BookingOrigin::Staff => AppointmentStatus::Confirmed,
        }
    }
}

/// Quem está agindo sobre o agendamento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Client { patient_id: Uuid },
    Staff { name: String },
}

impl Actor {
    pub fn staff(name: &str) -> Self {
        Actor::Staff { name: name.to_string() }
    }

    pub fn client(patient_id: Uuid) -> Self {
        Actor::Client { patient_id }
    }

    fn is_staff(&self) -> bool {
        matches!(self, Actor::Staff { .. })
    }
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        self == AppointmentStatus::Cancelled
    }

    /// Ocupa capacidade da agenda (tudo menos cancelado).
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Tabela de transições permitidas por ator.
    ///
    /// `Completed` só entra por ação explícita da equipe, nunca automaticamente.
    /// `Confirmed -> Cancelled` pela equipe é extensão deliberada: o portal do
    /// cliente só cancela pendentes, e sem ela um confirmado nunca libera o
    /// horário.
    pub fn check_transition(self, next: AppointmentStatus, actor: &Actor) -> Result<(), AppError> {
        use AppointmentStatus::*;

        let allowed = match (self, next) {
            (Pending, Cancelled) => true,
            (Confirmed, Cancelled) => actor.is_staff(),
            (Pending, Confirmed) => actor.is_staff(),
            (Confirmed, Completed) => actor.is_staff(),
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition { from: self, to: next })
        }
    }
}

// --- Agendamento ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "time_utils::hhmm")]
    pub time: NaiveTime,
    // Nome de exibição do item (o que vai na mensagem ao cliente)
    pub service: String,
    pub item: Option<CatalogKey>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>, // 0-100
    pub discount_applied_by: Option<String>,
    pub status: AppointmentStatus,
    pub origin: BookingOrigin,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn occupies(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.status.is_active() && self.date == date && self.time == time
    }

    /// Falha se o agendamento já foi cancelado (estado terminal).
    pub fn ensure_mutable(&self) -> Result<(), AppError> {
        if self.status.is_terminal() {
            return Err(AppError::AppointmentCancelled(self.id));
        }
        Ok(())
    }
}

// --- Payloads da equipe ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffBookingPayload {
    pub patient_id: Uuid,
    pub item: CatalogKey,
    pub date: NaiveDate,
    #[serde(with = "time_utils::hhmm")]
    pub time: NaiveTime,
    pub assigned_to: Option<String>,
    // Sobrescreve o preço do catálogo
    pub price: Option<Decimal>,
}

/// Reclassificação feita pela equipe no modal de pagamento.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPayload {
    pub item: Option<CatalogKey>,
    pub price: Option<Decimal>,
    pub discount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn test_initial_status_by_origin() {
        assert_eq!(BookingOrigin::Public.initial_status(), Pending);
        assert_eq!(BookingOrigin::Staff.initial_status(), Confirmed);
    }

    #[test]
    fn test_client_can_only_cancel_pending() {
        let client = Actor::client(Uuid::new_v4());
        assert!(Pending.check_transition(Cancelled, &client).is_ok());
        assert!(Confirmed.check_transition(Cancelled, &client).is_err());
        assert!(Pending.check_transition(Confirmed, &client).is_err());
    }

    #[test]
    fn test_staff_transitions() {
        let staff = Actor::staff("Lucía");
        assert!(Pending.check_transition(Confirmed, &staff).is_ok());
        assert!(Pending.check_transition(Cancelled, &staff).is_ok());
        assert!(Confirmed.check_transition(Completed, &staff).is_ok());
        assert!(Confirmed.check_transition(Cancelled, &staff).is_ok());
        assert!(Completed.check_transition(Cancelled, &staff).is_err());
        assert!(Pending.check_transition(Completed, &staff).is_err());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let staff = Actor::staff("Lucía");
        for next in [Pending, Confirmed, Completed, Cancelled] {
            let err = Cancelled.check_transition(next, &staff).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition { from: Cancelled, .. }));
        }
        assert!(Cancelled.is_terminal());
        assert!(!Completed.is_terminal());
    }

    #[test]
    fn test_status_json_is_lowercase() {
        assert_eq!(serde_json::to_value(Cancelled).unwrap(), "cancelled");
        let parsed: AppointmentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, Pending);
    }
}
