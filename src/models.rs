pub mod appointment;
pub mod catalog;
pub mod crm;
pub mod finance;
pub mod settings;
