// src/services/settings_service.rs

use chrono::{NaiveDate, NaiveTime};
use validator::Validate;

use crate::{
    common::error::AppError,
    models::settings::{BankingInfo, BusinessConfig, DaySchedule, SlotKey, UpdateDaySchedulePayload},
};

/// Dono da configuração do negócio. Todas as alterações passam por aqui.
#[derive(Debug, Clone, Default)]
pub struct SettingsService {
    config: BusinessConfig,
}

impl SettingsService {
    pub fn new(config: BusinessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    // --- DATAS BLOQUEADAS ---

    /// Retorna `false` se a data já estava bloqueada.
    pub fn block_date(&mut self, date: NaiveDate) -> bool {
        let inserted = self.config.blocked_dates.insert(date);
        if inserted {
            tracing::info!(%date, "data bloqueada");
        }
        inserted
    }

    pub fn unblock_date(&mut self, date: NaiveDate) -> bool {
        self.config.blocked_dates.remove(&date)
    }

    // --- HORÁRIOS BLOQUEADOS ---

    pub fn block_slot(&mut self, date: NaiveDate, time: NaiveTime) -> bool {
        let key = SlotKey::new(date, time);
        let inserted = self.config.blocked_slots.insert(key);
        if inserted {
            tracing::info!(slot = %key, "horário bloqueado");
        }
        inserted
    }

    pub fn unblock_slot(&mut self, date: NaiveDate, time: NaiveTime) -> bool {
        self.config.blocked_slots.remove(&SlotKey::new(date, time))
    }

    // --- EXPEDIENTE ---

    /// Atualiza o expediente de um dia da semana. Se o dia ainda não existir
    /// no cadastro, ele é criado (entradas nunca são removidas).
    pub fn update_day(&mut self, payload: UpdateDaySchedulePayload) -> Result<&DaySchedule, AppError> {
        payload.validate()?;

        let index = match self
            .config
            .schedule
            .iter()
            .position(|d| d.day_of_week == payload.day_of_week)
        {
            Some(index) => index,
            None => {
                self.config.schedule.push(DaySchedule {
                    day_of_week: payload.day_of_week,
                    label: String::new(),
                    is_open: false,
                    open_time: NaiveTime::MIN,
                    close_time: NaiveTime::MIN,
                });
                self.config.schedule.len() - 1
            }
        };

        let day = &mut self.config.schedule[index];
        day.is_open = payload.is_open;
        day.open_time = payload.open_time;
        day.close_time = payload.close_time;

        tracing::info!(day_of_week = day.day_of_week, is_open = day.is_open, "expediente atualizado");
        Ok(&self.config.schedule[index])
    }

    pub fn update_banking_info(&mut self, banking_info: Option<BankingInfo>) {
        self.config.banking_info = banking_info;
    }
}
