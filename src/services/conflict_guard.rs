// src/services/conflict_guard.rs

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::models::{
    appointment::Appointment,
    settings::{BusinessConfig, SlotKey},
};

// Diz se um (data, hora) está livre. Só responde booleano: quem grava a
// reserva decide o que fazer, e deve perguntar de novo no momento do envio.
#[derive(Debug, Clone, Copy)]
pub struct ConflictGuard<'a> {
    config: &'a BusinessConfig,
    appointments: &'a [Appointment],
}

impl<'a> ConflictGuard<'a> {
    pub fn new(config: &'a BusinessConfig, appointments: &'a [Appointment]) -> Self {
        Self { config, appointments }
    }

    pub fn is_slot_available(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.check(date, time, None)
    }

    /// Igual a `is_slot_available`, mas desconsidera o próprio agendamento
    /// (remarcação para o mesmo horário).
    pub fn is_slot_available_for(&self, date: NaiveDate, time: NaiveTime, appointment_id: Uuid) -> bool {
        self.check(date, time, Some(appointment_id))
    }

    fn check(&self, date: NaiveDate, time: NaiveTime, ignore: Option<Uuid>) -> bool {
        // 1. Horário bloqueado nas configurações
        if self.config.blocked_slots.contains(&SlotKey::new(date, time)) {
            return false;
        }

        // 2. Ocupado por agendamento não cancelado
        !self
            .appointments
            .iter()
            .filter(|a| Some(a.id) != ignore)
            .any(|a| a.occupies(date, time))
    }
}
