// src/db/patient_repo.rs

use uuid::Uuid;

use crate::models::crm::Patient;

pub trait PatientRepository {
    fn add(&mut self, patient: Patient) -> Patient;

    fn get(&self, id: Uuid) -> Option<Patient>;

    fn list_all(&self) -> Vec<Patient>;

    fn count(&self) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPatientRepository {
    patients: Vec<Patient>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self { patients }
    }
}

impl PatientRepository for InMemoryPatientRepository {
    fn add(&mut self, patient: Patient) -> Patient {
        self.patients.push(patient.clone());
        patient
    }

    fn get(&self, id: Uuid) -> Option<Patient> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }

    fn list_all(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    fn count(&self) -> usize {
        self.patients.len()
    }
}
