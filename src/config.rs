// src/config.rs

use std::{env, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    db::{InMemoryAppointmentRepository, InMemoryPatientRepository},
    models::{
        appointment::Appointment,
        catalog::{Catalog, CatalogData},
        crm::Patient,
        settings::BusinessConfig,
    },
    services::{booking_service::BookingService, settings_service::SettingsService},
};

const DEFAULT_DATA_PATH: &str = "data/spa.json";

pub type Bookings = BookingService<InMemoryAppointmentRepository, InMemoryPatientRepository>;

// O estado da aplicação: configuração, catálogo e agenda
pub struct AppState {
    pub settings: SettingsService,
    pub catalog: Catalog,
    pub bookings: Bookings,
}

/// Arquivo de carga inicial. Todas as seções são opcionais.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub config: BusinessConfig,
    #[serde(default)]
    pub catalog: CatalogData,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl SeedData {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "arquivo de dados não encontrado, usando padrões");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler {}", path.display()))?;
        let seed: SeedData = serde_json::from_str(&raw)
            .with_context(|| format!("JSON inválido em {}", path.display()))?;

        tracing::info!(
            patients = seed.patients.len(),
            appointments = seed.appointments.len(),
            "✅ Dados carregados de {}",
            path.display()
        );
        Ok(seed)
    }
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let data_path = env::var("SPA_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
        let seed = SeedData::load(Path::new(&data_path))?;

        Ok(Self::from_seed(seed))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_seed(seed: SeedData) -> Self {
        let bookings = BookingService::new(
            InMemoryAppointmentRepository::with_appointments(seed.appointments),
            InMemoryPatientRepository::with_patients(seed.patients),
        );

        Self {
            settings: SettingsService::new(seed.config),
            catalog: Catalog::from(seed.catalog),
            bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AppointmentRepository, PatientRepository};

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let seed = SeedData::load(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(seed.config, BusinessConfig::default());
        assert!(seed.patients.is_empty());
    }

    #[test]
    fn test_partial_seed_keeps_default_schedule() {
        let seed: SeedData = serde_json::from_str(
            r#"{
                "catalog": {
                    "services": [
                        { "id": "s1", "name": "Masaje Relajante", "price": 900, "duration": 60, "active": true, "description": null }
                    ]
                }
            }"#,
        )
        .unwrap();

        let state = AppState::from_seed(seed);
        assert_eq!(state.catalog.len(), 1);
        assert_eq!(state.settings.config().schedule.len(), 7);
        assert_eq!(state.bookings.patients().count(), 0);
        assert!(state.bookings.appointments().list_all().is_empty());
    }
}
