// src/services/crm_service.rs

use chrono::{NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::crm::{EmergencyContact, Patient, PatientContact, clean_phone},
};

// Número da ficha começa em 0100
const FILE_NUMBER_OFFSET: usize = 100;
const PHONE_DIGITS: usize = 10;

/// Validação do formulário público: derive do `validator` + telefones com
/// exatamente 10 dígitos depois de limpar a máscara.
pub fn validate_contact(contact: &PatientContact) -> Result<(), AppError> {
    contact.validate()?;

    if clean_phone(&contact.phone).len() != PHONE_DIGITS {
        return Err(AppError::field("phone", "invalid_phone", "O telefone deve ter 10 dígitos."));
    }
    if clean_phone(&contact.emergency_phone).len() != PHONE_DIGITS {
        return Err(AppError::field(
            "emergency_phone",
            "invalid_phone",
            "O telefone de emergência deve ter 10 dígitos.",
        ));
    }
    Ok(())
}

/// Busca o paciente pelo e-mail, sem diferenciar maiúsculas.
pub fn resolve<'a>(email: &str, candidates: &'a [Patient]) -> Option<&'a Patient> {
    let email = email.trim().to_lowercase();
    candidates.iter().find(|p| p.email.trim().to_lowercase() == email)
}

/// Até 3 iniciais do nome + 5 dígitos aleatórios ("Sofia Rodriguez" -> "SR48213").
pub fn generate_client_code<R: Rng + ?Sized>(full_name: &str, rng: &mut R) -> String {
    let initials: String = full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect();
    let digits: u32 = rng.gen_range(10_000..=99_999);
    format!("{initials}{digits}")
}

/// Ficha sequencial com 4 dígitos a partir da quantidade atual de pacientes.
pub fn next_file_number(patient_count: usize) -> String {
    format!("{:04}", FILE_NUMBER_OFFSET + patient_count)
}

/// Cria o paciente de quem reservou sem cadastro prévio.
pub fn synthesize_patient<R: Rng + ?Sized>(
    contact: &PatientContact,
    patient_count: usize,
    today: NaiveDate,
    rng: &mut R,
) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        client_code: generate_client_code(&contact.full_name, rng),
        file_number: next_file_number(patient_count),
        full_name: contact.full_name.trim().to_string(),
        email: contact.email.trim().to_string(),
        phone: contact.phone.clone(),
        birth_date: Some(contact.birth_date),
        skin_type: "Por definir".to_string(),
        allergies: contact
            .allergies
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "Ninguna".to_string()),
        emergency_contact: EmergencyContact {
            name: contact.emergency_name.clone(),
            phone: contact.emergency_phone.clone(),
        },
        history: Vec::new(),
        registered_by: Some("Portal Web".to_string()),
        registration_date: Some(today),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn contact(name: &str, email: &str) -> PatientContact {
        PatientContact {
            full_name: name.into(),
            email: email.into(),
            phone: "5550101000".into(),
            birth_date: NaiveDate::from_ymd_opt(1995, 5, 15).unwrap(),
            allergies: None,
            emergency_name: "Juan Perez".into(),
            emergency_phone: "5559999000".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(7);
        let existing = vec![synthesize_patient(&contact("Sofia Rodriguez", "sofia.rod@example.com"), 0, today(), &mut rng)];

        let found = resolve("Sofia.Rod@Example.COM", &existing).unwrap();
        assert_eq!(found.id, existing[0].id);
        assert!(resolve("sofia@example.com", &existing).is_none());
    }

    #[test]
    fn test_client_code_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let code = generate_client_code("maría elena garcía lópez", &mut rng);
        assert!(code.starts_with("MEG"));
        assert_eq!(code.chars().count(), 8);
        let digits: u32 = code[code.len() - 5..].parse().unwrap();
        assert!((10_000..=99_999).contains(&digits));
    }

    #[test]
    fn test_client_code_tolerates_extra_spaces() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_client_code("  Ana   Estética ", &mut rng).starts_with("AE"));
    }

    #[test]
    fn test_validate_contact_phone_digits() {
        assert!(validate_contact(&contact("Sofia Rodriguez", "sofia.rod@example.com")).is_ok());

        let mut bad = contact("Sofia Rodriguez", "sofia.rod@example.com");
        bad.phone = "555-0101".into();
        let err = validate_contact(&bad).unwrap_err();
        match err {
            AppError::ValidationError(errors) => assert!(errors.field_errors().contains_key("phone")),
            other => panic!("erro inesperado: {other:?}"),
        }

        let mut masked = contact("Sofia Rodriguez", "sofia.rod@example.com");
        masked.emergency_phone = "(55) 5999-9000".into();
        assert!(validate_contact(&masked).is_ok());
    }

    #[test]
    fn test_file_number_is_padded() {
        assert_eq!(next_file_number(0), "0100");
        assert_eq!(next_file_number(3), "0103");
        assert_eq!(next_file_number(9950), "10050");
    }

    #[test]
    fn test_synthesized_patient_is_new_client() {
        let mut rng = StdRng::seed_from_u64(3);
        let patient = synthesize_patient(&contact("Elena Garcia", "elena.g@example.com"), 2, today(), &mut rng);
        assert!(patient.is_new_client());
        assert_eq!(patient.file_number, "0102");
        assert_eq!(patient.allergies, "Ninguna");
        assert_eq!(patient.registration_date, Some(today()));
    }
}
