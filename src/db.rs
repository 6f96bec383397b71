pub mod appointment_repo;
pub use appointment_repo::{AppointmentRepository, InMemoryAppointmentRepository};
pub mod patient_repo;
pub use patient_repo::{InMemoryPatientRepository, PatientRepository};
