// src/models/settings.rs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::{
    error::AppError,
    time_utils::{self, DATE_FORMAT},
};

// --- Horário de funcionamento ---

// Uma entrada por dia da semana (0 = domingo ... 6 = sábado).
// Nunca é removida, apenas aberta/fechada pelas configurações.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day_of_week: u8,
    #[serde(default)]
    pub label: String,
    pub is_open: bool,
    #[serde(with = "time_utils::hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "time_utils::hhmm")]
    pub close_time: NaiveTime,
}

impl DaySchedule {
    pub fn new(day_of_week: u8, label: &str, is_open: bool, open: (u32, u32), close: (u32, u32)) -> Self {
        Self {
            day_of_week,
            label: label.to_string(),
            is_open,
            open_time: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap_or(NaiveTime::MIN),
            close_time: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

// --- Bloqueio de um horário específico ---

/// Chave composta "<AAAA-MM-DD> <HH:MM>" de um horário bloqueado.
/// A ordenação (data, hora) coincide com a ordenação textual da chave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SlotKey {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(DATE_FORMAT), time_utils::format_hhmm(self.time))
    }
}

impl FromStr for SlotKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidSlotKey(s.to_string());

        let (date, time) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;
        let time = time_utils::parse_hhmm(time).map_err(|_| invalid())?;

        Ok(Self { date, time })
    }
}

impl TryFrom<String> for SlotKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

// --- Dados de contato e bancários (repassados ao formatador de mensagens) ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingInfo {
    pub bank_name: String,
    pub account_number: String,
    pub clabe: String,
    pub account_holder: String,
}

// --- Configuração do negócio ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfig {
    #[serde(default = "default_schedule")]
    pub schedule: Vec<DaySchedule>,
    // BTreeSet: sem duplicatas e já ordenado para exibição
    #[serde(default)]
    pub blocked_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub blocked_slots: BTreeSet<SlotKey>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub banking_info: Option<BankingInfo>,
}

// Seg-sex 09-19, sáb 10-14, domingo fechado
fn default_schedule() -> Vec<DaySchedule> {
    vec![
        DaySchedule::new(1, "Lunes", true, (9, 0), (19, 0)),
        DaySchedule::new(2, "Martes", true, (9, 0), (19, 0)),
        DaySchedule::new(3, "Miércoles", true, (9, 0), (19, 0)),
        DaySchedule::new(4, "Jueves", true, (9, 0), (19, 0)),
        DaySchedule::new(5, "Viernes", true, (9, 0), (19, 0)),
        DaySchedule::new(6, "Sábado", true, (10, 0), (14, 0)),
        DaySchedule::new(0, "Domingo", false, (0, 0), (0, 0)),
    ]
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            blocked_dates: BTreeSet::new(),
            blocked_slots: BTreeSet::new(),
            contact: ContactInfo::default(),
            banking_info: None,
        }
    }
}

// --- Payloads de alteração ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDaySchedulePayload {
    #[validate(range(max = 6, message = "O dia da semana deve estar entre 0 e 6."))]
    pub day_of_week: u8,
    pub is_open: bool,
    #[serde(with = "time_utils::hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "time_utils::hhmm")]
    pub close_time: NaiveTime,
}
