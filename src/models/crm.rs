// src/models/crm.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- HISTÓRICO CLÍNICO ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalNote {
    pub id: String,
    pub date: NaiveDate,
    pub treatment: String,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

// --- PACIENTE ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,

    // Gerados uma única vez na criação; imutáveis depois
    pub client_code: String, // Ex: "SR12345"
    pub file_number: String, // Ex: "0100"

    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,

    #[serde(default)]
    pub skin_type: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,

    #[serde(default)]
    pub history: Vec<ClinicalNote>,

    pub registered_by: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Cliente novo = sem histórico clínico no momento da reserva.
    pub fn is_new_client(&self) -> bool {
        self.history.is_empty()
    }
}

// --- DADOS ENVIADOS NO FLUXO PÚBLICO ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientContact {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    // 10 dígitos depois de limpar; checado no serviço
    pub phone: String,

    pub birth_date: NaiveDate,

    pub allergies: Option<String>,

    #[validate(length(min = 1, message = "O contato de emergência é obrigatório."))]
    pub emergency_name: String,

    pub emergency_phone: String,
}

/// Remove tudo que não for dígito ("55 3222-9490" -> "5532229490").
pub fn clean_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_phone() {
        assert_eq!(clean_phone("(55) 3222-9490"), "5532229490");
        assert_eq!(clean_phone(""), "");
    }

    #[test]
    fn test_contact_validation() {
        let contact = PatientContact {
            full_name: String::new(),
            email: "not-an-email".into(),
            phone: "5550101000".into(),
            birth_date: NaiveDate::from_ymd_opt(1995, 5, 15).unwrap(),
            allergies: None,
            emergency_name: "Juan".into(),
            emergency_phone: "5559999000".into(),
        };
        let errors = contact.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("emergency_name"));
    }
}
