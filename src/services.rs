pub mod booking_service;
pub mod calendar_service;
pub mod conflict_guard;
pub mod crm_service;
pub mod finance_service;
pub mod settings_service;
