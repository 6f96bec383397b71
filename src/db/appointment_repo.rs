// src/db/appointment_repo.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{common::error::AppError, models::appointment::Appointment};

/// Único ponto de acesso aos agendamentos. Quem chama nunca segura
/// uma referência mutável à coleção.
pub trait AppointmentRepository {
    fn add(&mut self, appointment: Appointment) -> Result<Appointment, AppError>;

    /// Substitui o registro com o mesmo `id`.
    fn update(&mut self, appointment: Appointment) -> Result<Appointment, AppError>;

    fn get(&self, id: Uuid) -> Option<Appointment>;

    fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment>;

    fn list_by_date(&self, date: NaiveDate) -> Vec<Appointment>;

    fn list_all(&self) -> Vec<Appointment>;
}

// O repositório em memória, dono da lista de agendamentos
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: Vec<Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == id)
    }
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    fn add(&mut self, appointment: Appointment) -> Result<Appointment, AppError> {
        if self.position(appointment.id).is_some() {
            return Err(AppError::DuplicateAppointment(appointment.id));
        }
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn update(&mut self, appointment: Appointment) -> Result<Appointment, AppError> {
        let index = self
            .position(appointment.id)
            .ok_or(AppError::AppointmentNotFound(appointment.id))?;
        self.appointments[index] = appointment.clone();
        Ok(appointment)
    }

    fn get(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.iter().find(|a| a.id == id).cloned()
    }

    fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect()
    }

    fn list_by_date(&self, date: NaiveDate) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect()
    }

    fn list_all(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::{AppointmentStatus, BookingOrigin};
    use chrono::{NaiveTime, Utc};

    fn appointment(patient_id: Uuid, day: u32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id,
            patient_name: "Sofia Rodriguez".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            service: "Masaje Relajante".into(),
            item: None,
            price: None,
            discount: None,
            discount_applied_by: None,
            status: AppointmentStatus::Pending,
            origin: BookingOrigin::Public,
            assigned_to: None,
            payment_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut repo = InMemoryAppointmentRepository::new();
        let apt = appointment(Uuid::new_v4(), 10);
        repo.add(apt.clone()).unwrap();
        assert!(matches!(repo.add(apt), Err(AppError::DuplicateAppointment(_))));
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut repo = InMemoryAppointmentRepository::new();
        let apt = appointment(Uuid::new_v4(), 10);
        assert!(matches!(repo.update(apt), Err(AppError::AppointmentNotFound(_))));
    }

    #[test]
    fn test_list_filters() {
        let patient = Uuid::new_v4();
        let mut repo = InMemoryAppointmentRepository::new();
        repo.add(appointment(patient, 10)).unwrap();
        repo.add(appointment(patient, 11)).unwrap();
        repo.add(appointment(Uuid::new_v4(), 10)).unwrap();

        assert_eq!(repo.list_by_patient(patient).len(), 2);
        assert_eq!(repo.list_by_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()).len(), 2);
        assert_eq!(repo.list_all().len(), 3);
    }
}
