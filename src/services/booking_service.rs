// src/services/booking_service.rs

use chrono::{NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{error::AppError, time_utils},
    db::{AppointmentRepository, PatientRepository},
    models::{
        appointment::{
            Actor, AdjustmentPayload, Appointment, AppointmentStatus, BookingOrigin, StaffBookingPayload,
        },
        catalog::{Catalog, CatalogItem, CatalogKey},
        crm::{Patient, PatientContact},
        finance::{PaymentNotice, Settlement},
        settings::BusinessConfig,
    },
    services::{
        calendar_service::BusinessCalendar,
        conflict_guard::ConflictGuard,
        crm_service,
        finance_service,
    },
};

// --- Payloads ---

/// Reserva enviada pelo portal público.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBookingRequest {
    pub item: CatalogKey,
    pub date: NaiveDate,
    #[serde(with = "time_utils::hhmm")]
    pub time: NaiveTime,
    pub contact: PatientContact,
    // Cliente logado: a reserva vai direto para a ficha dele
    pub patient_id: Option<Uuid>,
}

/// Resultado do fluxo público: o agendamento, a ficha usada e os valores
/// que seguem para a mensagem de pagamento.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub appointment: Appointment,
    pub patient: Patient,
    pub patient_created: bool,
    pub settlement: Settlement,
}

// ====================================================================================
// SERVIÇO
// ====================================================================================

pub struct BookingService<A, P> {
    appointments: A,
    patients: P,
}

impl<A, P> BookingService<A, P>
where
    A: AppointmentRepository,
    P: PatientRepository,
{
    pub fn new(appointments: A, patients: P) -> Self {
        Self { appointments, patients }
    }

    pub fn appointments(&self) -> &A {
        &self.appointments
    }

    pub fn patients(&self) -> &P {
        &self.patients
    }

    // --- DISPONIBILIDADE ---

    pub fn available_slots(&self, config: &BusinessConfig, date: NaiveDate) -> Vec<NaiveTime> {
        let day = self.appointments.list_by_date(date);
        BusinessCalendar::new(config).offerable_slots(date, &day)
    }

    pub fn is_slot_available(&self, config: &BusinessConfig, date: NaiveDate, time: NaiveTime) -> bool {
        let day = self.appointments.list_by_date(date);
        ConflictGuard::new(config, &day).is_slot_available(date, time)
    }

    // --- FLUXO PÚBLICO ---

    /// Reserva feita pelo visitante ou cliente logado. Entra como `pending`.
    ///
    /// A disponibilidade é conferida de novo aqui, no momento do envio, e não
    /// apenas quando os horários foram exibidos.
    pub fn book_public<R: Rng + ?Sized>(
        &mut self,
        config: &BusinessConfig,
        catalog: &Catalog,
        request: PublicBookingRequest,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<BookingReceipt, AppError> {
        crm_service::validate_contact(&request.contact)?;

        let item = offerable_item(catalog, &request.item, BookingOrigin::Public)?;

        // 1. Data futura, expediente e bloqueios
        if request.date < today {
            return Err(AppError::DateInPast(request.date));
        }
        let calendar = BusinessCalendar::new(config);
        if calendar.is_date_blocked(request.date) {
            return Err(AppError::DateBlocked(request.date));
        }
        let slots = calendar.generate_slots(request.date);
        if slots.is_empty() {
            return Err(AppError::DayClosed(request.date));
        }
        if !slots.contains(&request.time) {
            return Err(AppError::SlotUnavailable { date: request.date, time: request.time });
        }

        // 2. Conflito com agendamentos existentes
        self.ensure_slot_free(config, request.date, request.time, None)?;

        // 3. Identidade: ficha do cliente logado > e-mail conhecido > ficha nova
        let (patient, patient_created) = match request.patient_id {
            Some(id) => (self.patients.get(id).ok_or(AppError::PatientNotFound(id))?, false),
            None => {
                let existing = self.patients.list_all();
                match crm_service::resolve(&request.contact.email, &existing) {
                    Some(found) => (found.clone(), false),
                    None => {
                        let count = self.patients.count();
                        (crm_service::synthesize_patient(&request.contact, count, today, rng), true)
                    }
                }
            }
        };

        let appointment = self
            .appointments
            .add(new_appointment(&patient, item, request.date, request.time, BookingOrigin::Public))?;

        // Só grava a ficha nova depois que o agendamento entrou
        let patient = if patient_created {
            tracing::info!(patient_id = %patient.id, client_code = %patient.client_code, "nova ficha criada pelo portal");
            self.patients.add(patient)
        } else {
            patient
        };

        let settlement = finance_service::calculate_settlement(item.price(), Decimal::ZERO, patient.is_new_client());

        tracing::info!(
            appointment_id = %appointment.id,
            slot = %format!("{} {}", appointment.date, time_utils::format_hhmm(appointment.time)),
            item = %appointment.service,
            "reserva pública registrada"
        );

        Ok(BookingReceipt { appointment, patient, patient_created, settlement })
    }

    // --- FLUXO DA EQUIPE ---

    /// Agendamento criado pela agenda administrativa. Entra `confirmed`, com
    /// pagamento ainda não verificado. A equipe pode agendar fora do expediente;
    /// só o conflito de horário é conferido.
    pub fn book_staff(
        &mut self,
        config: &BusinessConfig,
        catalog: &Catalog,
        payload: StaffBookingPayload,
        staff_name: &str,
    ) -> Result<Appointment, AppError> {
        let patient = self
            .patients
            .get(payload.patient_id)
            .ok_or(AppError::PatientNotFound(payload.patient_id))?;

        let item = offerable_item(catalog, &payload.item, BookingOrigin::Staff)?;

        self.ensure_slot_free(config, payload.date, payload.time, None)?;

        let mut appointment = new_appointment(&patient, item, payload.date, payload.time, BookingOrigin::Staff);
        appointment.assigned_to = payload.assigned_to;
        appointment.discount = Some(Decimal::ZERO);
        if let Some(price) = payload.price {
            appointment.price = Some(price);
        }

        let appointment = self.appointments.add(appointment)?;
        tracing::info!(appointment_id = %appointment.id, staff = staff_name, "agendamento criado pela equipe");
        Ok(appointment)
    }

    // --- CICLO DE VIDA ---

    /// Cliente cancela o próprio agendamento pendente; a equipe cancela
    /// pendentes e confirmados.
    pub fn cancel(&mut self, id: Uuid, actor: &Actor) -> Result<Appointment, AppError> {
        self.transition(id, AppointmentStatus::Cancelled, actor)
    }

    pub fn confirm(&mut self, id: Uuid, staff_name: &str) -> Result<Appointment, AppError> {
        self.transition(id, AppointmentStatus::Confirmed, &Actor::staff(staff_name))
    }

    /// Encerramento manual do atendimento. Nada no motor chama isto sozinho.
    pub fn mark_completed(&mut self, id: Uuid, staff_name: &str) -> Result<Appointment, AppError> {
        self.transition(id, AppointmentStatus::Completed, &Actor::staff(staff_name))
    }

    pub fn verify_payment(&mut self, id: Uuid, staff_name: &str) -> Result<Appointment, AppError> {
        let mut appointment = self.load(id)?;
        appointment.ensure_mutable()?;

        appointment.payment_verified = true;
        appointment.updated_at = Utc::now();

        tracing::info!(appointment_id = %id, staff = staff_name, "pagamento verificado");
        self.appointments.update(appointment)
    }

    /// Reclassificação pela equipe: troca item, preço e desconto.
    /// O status não muda.
    pub fn adjust(
        &mut self,
        id: Uuid,
        catalog: &Catalog,
        payload: AdjustmentPayload,
        staff_name: &str,
    ) -> Result<Appointment, AppError> {
        let mut appointment = self.load(id)?;
        appointment.ensure_mutable()?;

        match &payload.item {
            Some(key) => {
                let item = offerable_item(catalog, key, BookingOrigin::Staff)?;
                appointment.service = item.name().to_string();
                appointment.item = Some(key.clone());
                appointment.price = Some(payload.price.unwrap_or_else(|| item.price()));
            }
            None => {
                if payload.price.is_some() {
                    appointment.price = payload.price;
                }
            }
        }

        // Quem aplicou o desconto só muda quando o valor muda e é positivo
        if appointment.discount != Some(payload.discount) && payload.discount > Decimal::ZERO {
            appointment.discount_applied_by = Some(staff_name.to_string());
        }
        if payload.discount < Decimal::ZERO || payload.discount > Decimal::ONE_HUNDRED {
            tracing::warn!(appointment_id = %id, discount = %payload.discount, "desconto fora de 0-100");
        }
        appointment.discount = Some(payload.discount);
        appointment.updated_at = Utc::now();

        tracing::info!(appointment_id = %id, staff = staff_name, "agendamento reclassificado");
        self.appointments.update(appointment)
    }

    /// Modal de pagamento da equipe: aplica o ajuste e confirma se ainda
    /// estava pendente.
    pub fn record_payment(
        &mut self,
        id: Uuid,
        catalog: &Catalog,
        payload: AdjustmentPayload,
        staff_name: &str,
    ) -> Result<Appointment, AppError> {
        let appointment = self.adjust(id, catalog, payload, staff_name)?;
        if appointment.status == AppointmentStatus::Pending {
            return self.confirm(id, staff_name);
        }
        Ok(appointment)
    }

    pub fn reschedule(
        &mut self,
        config: &BusinessConfig,
        id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        staff_name: &str,
    ) -> Result<Appointment, AppError> {
        let mut appointment = self.load(id)?;
        appointment.ensure_mutable()?;

        self.ensure_slot_free(config, date, time, Some(id))?;

        appointment.date = date;
        appointment.time = time;
        appointment.updated_at = Utc::now();

        tracing::info!(appointment_id = %id, %date, staff = staff_name, "agendamento remarcado");
        self.appointments.update(appointment)
    }

    // --- LIQUIDAÇÃO ---

    pub fn settlement(&self, id: Uuid) -> Result<Settlement, AppError> {
        let appointment = self.load(id)?;
        let patient = self
            .patients
            .get(appointment.patient_id)
            .ok_or(AppError::PatientNotFound(appointment.patient_id))?;

        Ok(finance_service::calculate_settlement(
            appointment.price.unwrap_or(Decimal::ZERO),
            appointment.discount.unwrap_or(Decimal::ZERO),
            patient.is_new_client(),
        ))
    }

    pub fn payment_notice(&self, config: &BusinessConfig, id: Uuid) -> Result<PaymentNotice, AppError> {
        let appointment = self.load(id)?;
        appointment.ensure_mutable()?;

        let patient = self
            .patients
            .get(appointment.patient_id)
            .ok_or(AppError::PatientNotFound(appointment.patient_id))?;

        Ok(finance_service::payment_notice(&appointment, &patient, config.banking_info.as_ref()))
    }

    // --- CONSULTAS ---

    /// Histórico do paciente, inclusive cancelados, do mais recente ao mais antigo.
    pub fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut list = self.appointments.list_by_patient(patient_id);
        list.sort_by(|a, b| b.starts_at().cmp(&a.starts_at()));
        list
    }

    pub fn agenda(&self) -> Vec<Appointment> {
        let mut list = self.appointments.list_all();
        list.sort_by_key(Appointment::starts_at);
        list
    }

    pub fn active_for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut list: Vec<Appointment> = self
            .appointments
            .list_by_date(date)
            .into_iter()
            .filter(|a| a.status.is_active())
            .collect();
        list.sort_by_key(|a| a.time);
        list
    }

    // --- Internos ---

    fn load(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.appointments.get(id).ok_or(AppError::AppointmentNotFound(id))
    }

    fn ensure_slot_free(
        &self,
        config: &BusinessConfig,
        date: NaiveDate,
        time: NaiveTime,
        ignore: Option<Uuid>,
    ) -> Result<(), AppError> {
        let day = self.appointments.list_by_date(date);
        let guard = ConflictGuard::new(config, &day);
        let free = match ignore {
            Some(id) => guard.is_slot_available_for(date, time, id),
            None => guard.is_slot_available(date, time),
        };

        if !free {
            tracing::warn!(%date, time = %time_utils::format_hhmm(time), "horário recusado: ocupado ou bloqueado");
            return Err(AppError::SlotUnavailable { date, time });
        }
        Ok(())
    }

    fn transition(&mut self, id: Uuid, next: AppointmentStatus, actor: &Actor) -> Result<Appointment, AppError> {
        let mut appointment = self.load(id)?;
        appointment.ensure_mutable()?;

        if let Actor::Client { patient_id } = actor {
            if appointment.patient_id != *patient_id {
                return Err(AppError::NotAppointmentOwner(id));
            }
        }

        appointment.status.check_transition(next, actor)?;

        let previous = appointment.status;
        appointment.status = next;
        appointment.updated_at = Utc::now();

        tracing::info!(appointment_id = %id, from = %previous, to = %next, "status do agendamento alterado");
        self.appointments.update(appointment)
    }
}

fn offerable_item<'c>(catalog: &'c Catalog, key: &CatalogKey, origin: BookingOrigin) -> Result<&'c CatalogItem, AppError> {
    let item = catalog.get(key).ok_or_else(|| AppError::ItemNotFound(key.to_string()))?;
    if !item.is_offerable(origin) {
        return Err(AppError::ItemNotOffered(item.name().to_string()));
    }
    Ok(item)
}

// O nome exibido é sempre o da ficha, nunca o digitado no formulário
fn new_appointment(
    patient: &Patient,
    item: &CatalogItem,
    date: NaiveDate,
    time: NaiveTime,
    origin: BookingOrigin,
) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        patient_name: patient.full_name.clone(),
        date,
        time,
        service: item.name().to_string(),
        item: Some(item.key()),
        price: Some(item.price()),
        discount: None,
        discount_applied_by: None,
        status: origin.initial_status(),
        origin,
        assigned_to: None,
        payment_verified: false,
        created_at: now,
        updated_at: now,
    }
}
