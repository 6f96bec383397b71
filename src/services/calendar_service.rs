// src/services/calendar_service.rs

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::models::{
    appointment::Appointment,
    settings::{BusinessConfig, DaySchedule},
};
use crate::services::conflict_guard::ConflictGuard;

/// Resolve o horário de funcionamento + bloqueios em horários ofertáveis.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar<'a> {
    config: &'a BusinessConfig,
}

impl<'a> BusinessCalendar<'a> {
    pub fn new(config: &'a BusinessConfig) -> Self {
        Self { config }
    }

    /// Entrada do dia da semana (0 = domingo, como no cadastro).
    pub fn resolve_day_config(&self, date: NaiveDate) -> Option<&'a DaySchedule> {
        let weekday = date.weekday().num_days_from_sunday();
        self.config
            .schedule
            .iter()
            .find(|d| u32::from(d.day_of_week) == weekday)
    }

    // Um bloco por hora cheia, da hora de abertura (inclusive) até a hora de
    // fechamento (exclusive). Os minutos são ignorados: 09:30-18:30 gera
    // 09:00..17:00. A duração do serviço não bloqueia as horas seguintes.
    pub fn generate_slots(&self, date: NaiveDate) -> Vec<NaiveTime> {
        let Some(day) = self.resolve_day_config(date) else {
            return Vec::new();
        };
        if !day.is_open {
            return Vec::new();
        }

        let slots: Vec<NaiveTime> = (day.open_time.hour()..day.close_time.hour())
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .collect();

        tracing::debug!(%date, count = slots.len(), "horários gerados");
        slots
    }

    pub fn is_date_blocked(&self, date: NaiveDate) -> bool {
        self.config.blocked_dates.contains(&date)
    }

    /// Horários que podem ser oferecidos: dia aberto, data não bloqueada,
    /// horário não bloqueado e sem agendamento ativo.
    pub fn offerable_slots(&self, date: NaiveDate, appointments: &[Appointment]) -> Vec<NaiveTime> {
        if self.is_date_blocked(date) {
            return Vec::new();
        }

        let guard = ConflictGuard::new(self.config, appointments);
        self.generate_slots(date)
            .into_iter()
            .filter(|&time| guard.is_slot_available(date, time))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{DaySchedule, SlotKey};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hhmm(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn monday_only(open: (u32, u32), close: (u32, u32)) -> BusinessConfig {
        BusinessConfig {
            schedule: vec![DaySchedule::new(1, "Lunes", true, open, close)],
            ..BusinessConfig::default()
        }
    }

    #[test]
    fn test_monday_nine_to_six_yields_nine_slots() {
        let config = monday_only((9, 0), (18, 0));
        let calendar = BusinessCalendar::new(&config);

        // 2024-06-10 é segunda-feira
        let slots = calendar.generate_slots(date(2024, 6, 10));
        let labels: Vec<String> = slots.iter().map(|t| t.format("%H:%M").to_string()).collect();
        assert_eq!(
            labels,
            vec!["09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00"]
        );
    }

    #[test]
    fn test_slot_count_is_close_minus_open_hour() {
        for (open, close) in [(8, 20), (10, 14), (0, 23), (12, 13)] {
            let config = monday_only((open, 0), (close, 0));
            let slots = BusinessCalendar::new(&config).generate_slots(date(2024, 6, 10));
            assert_eq!(slots.len() as u32, close - open);
            assert!(slots.iter().all(|t| t.minute() == 0));
        }
    }

    #[test]
    fn test_minutes_are_truncated() {
        let config = monday_only((9, 30), (11, 45));
        let slots = BusinessCalendar::new(&config).generate_slots(date(2024, 6, 10));
        assert_eq!(slots, vec![hhmm(9), hhmm(10)]);
    }

    #[test]
    fn test_closed_or_missing_day_is_empty() {
        let config = BusinessConfig::default();
        let calendar = BusinessCalendar::new(&config);
        // domingo fechado
        assert!(calendar.generate_slots(date(2024, 6, 9)).is_empty());

        // terça sem entrada no cadastro
        let config = monday_only((9, 0), (18, 0));
        assert!(BusinessCalendar::new(&config).generate_slots(date(2024, 6, 11)).is_empty());
    }

    #[test]
    fn test_inverted_hours_are_empty() {
        let config = monday_only((18, 0), (9, 0));
        assert!(BusinessCalendar::new(&config).generate_slots(date(2024, 6, 10)).is_empty());
    }

    #[test]
    fn test_generation_is_restartable() {
        let config = monday_only((9, 0), (12, 0));
        let calendar = BusinessCalendar::new(&config);
        assert_eq!(calendar.generate_slots(date(2024, 6, 10)), calendar.generate_slots(date(2024, 6, 10)));
    }

    #[test]
    fn test_blocked_date_and_slot_are_not_offered() {
        let mut config = monday_only((9, 0), (12, 0));
        config.blocked_slots.insert(SlotKey::new(date(2024, 6, 10), hhmm(10)));
        config.blocked_dates.insert(date(2024, 6, 17));
        let calendar = BusinessCalendar::new(&config);

        assert_eq!(calendar.offerable_slots(date(2024, 6, 10), &[]), vec![hhmm(9), hhmm(11)]);
        assert!(calendar.is_date_blocked(date(2024, 6, 17)));
        assert!(calendar.offerable_slots(date(2024, 6, 17), &[]).is_empty());
        // o dia em si continua aberto; só a oferta some
        assert_eq!(calendar.generate_slots(date(2024, 6, 17)).len(), 3);
    }
}
