//src/main.rs

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use spa_backend::{
    common::time_utils,
    config::AppState,
    services::finance_service,
};

#[derive(Debug, Parser)]
#[command(name = "spa-backend", about = "Agenda e liquidação do spa")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Horários ofertáveis de uma data (AAAA-MM-DD)
    Slots { date: NaiveDate },
    /// Simula preço final e sinal
    Quote {
        price: Decimal,
        discount: Decimal,
        #[arg(value_enum)]
        client: ClientKind,
    },
    /// Agenda completa em ordem cronológica
    Agenda,
    /// Dados da mensagem de pagamento de um agendamento
    Notice { appointment_id: Uuid },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClientKind {
    New,
    Returning,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let state = AppState::new()?;
    let config = state.settings.config();

    match cli.command {
        Command::Slots { date } => {
            let slots = state.bookings.available_slots(config, date);
            if slots.is_empty() {
                println!("{date}: sem horários disponíveis");
            }
            for slot in slots {
                println!("{}", time_utils::format_hhmm(slot));
            }
        }
        Command::Quote { price, discount, client } => {
            let settlement =
                finance_service::calculate_settlement(price, discount, matches!(client, ClientKind::New));
            println!("{}", serde_json::to_string_pretty(&settlement)?);
        }
        Command::Agenda => {
            for apt in state.bookings.agenda() {
                println!(
                    "{} {}  {:<10} {:<28} {}",
                    apt.date,
                    time_utils::format_hhmm(apt.time),
                    apt.status.to_string(),
                    apt.patient_name,
                    apt.service
                );
            }
        }
        Command::Notice { appointment_id } => {
            let notice = state.bookings.payment_notice(config, appointment_id)?;
            println!("{}", serde_json::to_string_pretty(&notice)?);
        }
    }

    Ok(())
}
