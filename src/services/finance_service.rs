// src/services/finance_service.rs

use chrono::Duration;
use rust_decimal::Decimal;

use crate::models::{
    appointment::Appointment,
    crm::Patient,
    finance::{PaymentNotice, Settlement, SettlementWarning},
    settings::BankingInfo,
};

/// Fração do preço final paga antecipadamente por cliente novo (25%).
pub const NEW_CLIENT_DEPOSIT_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Calcula preço final e sinal.
///
/// Função pura: sem estado, sem aleatoriedade, sem I/O. O desconto é
/// aplicado antes do sinal, e o sinal é sempre sobre o preço com desconto.
/// Cliente recorrente paga o total como "sinal" (sem divisão 25/75).
///
/// Descontos fora de [0, 100] não são rejeitados nem corrigidos; o
/// resultado sai como está, com aviso em `warnings`. Valores que estouram
/// a faixa do `Decimal` zeram os montantes e geram `ArithmeticOverflow`.
pub fn calculate_settlement(price: Decimal, discount: Decimal, is_new_client: bool) -> Settlement {
    let mut warnings = Vec::new();
    if discount < Decimal::ZERO || discount > HUNDRED {
        warnings.push(SettlementWarning::DiscountOutOfRange(discount));
    }

    let (discount_amount, final_price, deposit_required, balance_due_on_site) =
        match settle_amounts(price, discount, is_new_client) {
            Some(amounts) => amounts,
            None => {
                warnings.push(SettlementWarning::ArithmeticOverflow);
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            }
        };

    if final_price < Decimal::ZERO {
        warnings.push(SettlementWarning::NegativeFinalPrice(final_price));
    }

    Settlement {
        list_price: price,
        discount_percent: discount,
        discount_amount,
        final_price,
        deposit_required,
        balance_due_on_site,
        is_new_client,
        warnings,
    }
}

// (desconto, preço final, sinal, saldo no local); `None` em estouro
fn settle_amounts(price: Decimal, discount: Decimal, is_new_client: bool) -> Option<(Decimal, Decimal, Decimal, Decimal)> {
    let discount_amount = price.checked_mul(discount.checked_div(HUNDRED)?)?;
    let final_price = price.checked_sub(discount_amount)?;
    let deposit_required = if is_new_client {
        final_price.checked_mul(NEW_CLIENT_DEPOSIT_RATE)?
    } else {
        final_price
    };
    let balance_due_on_site = final_price.checked_sub(deposit_required)?;
    Some((discount_amount, final_price, deposit_required, balance_due_on_site))
}

/// Monta os dados da mensagem de pagamento de um agendamento.
pub fn payment_notice(
    appointment: &Appointment,
    patient: &Patient,
    banking_info: Option<&BankingInfo>,
) -> PaymentNotice {
    let settlement = calculate_settlement(
        appointment.price.unwrap_or(Decimal::ZERO),
        appointment.discount.unwrap_or(Decimal::ZERO),
        patient.is_new_client(),
    );

    for warning in &settlement.warnings {
        tracing::warn!(appointment_id = %appointment.id, ?warning, "valores fora do esperado na liquidação");
    }

    let payment_deadline = settlement
        .is_new_client
        .then(|| appointment.starts_at() - Duration::hours(1));

    PaymentNotice {
        appointment_id: appointment.id,
        patient_name: patient.full_name.clone(),
        phone: patient.phone.clone(),
        email: patient.email.clone(),
        client_code: patient.client_code.clone(),
        payment_reference: format!("Abono {}", patient.client_code),
        service: appointment.service.clone(),
        settlement,
        banking_info: banking_info.cloned(),
        payment_deadline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_new_client_pays_quarter_of_discounted_price() {
        let s = calculate_settlement(dec(1000), dec(20), true);
        assert_eq!(s.discount_amount, dec(200));
        assert_eq!(s.final_price, dec(800));
        assert_eq!(s.deposit_required, dec(200));
        assert_eq!(s.balance_due_on_site, dec(600));
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn test_returning_client_deposit_is_full_price() {
        let s = calculate_settlement(dec(1000), dec(20), false);
        assert_eq!(s.final_price, dec(800));
        assert_eq!(s.deposit_required, dec(800));
        assert_eq!(s.balance_due_on_site, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_law_is_exact() {
        let price = Decimal::new(84999, 2); // 849.99
        let discount = Decimal::new(125, 1); // 12.5
        let s = calculate_settlement(price, discount, true);
        assert_eq!(s.deposit_required, s.final_price * Decimal::new(25, 2));
        assert_eq!(s.deposit_required + s.balance_due_on_site, s.final_price);
    }

    #[test]
    fn test_is_idempotent() {
        let a = calculate_settlement(dec(1500), dec(15), true);
        let b = calculate_settlement(dec(1500), dec(15), true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_discount_is_reported_not_clamped() {
        let s = calculate_settlement(dec(1000), dec(120), false);
        assert_eq!(s.final_price, dec(-200));
        assert_eq!(s.deposit_required, dec(-200));
        assert_eq!(
            s.warnings,
            vec![
                SettlementWarning::DiscountOutOfRange(dec(120)),
                SettlementWarning::NegativeFinalPrice(dec(-200)),
            ]
        );

        let s = calculate_settlement(dec(1000), dec(-10), true);
        assert_eq!(s.final_price, dec(1100));
        assert_eq!(s.warnings, vec![SettlementWarning::DiscountOutOfRange(dec(-10))]);
    }

    #[test]
    fn test_overflowing_discount_does_not_panic() {
        let price = Decimal::from(10_000_000_000i64);
        let s = calculate_settlement(price, Decimal::MAX, true);
        assert_eq!(s.final_price, Decimal::ZERO);
        assert_eq!(s.deposit_required, Decimal::ZERO);
        assert_eq!(
            s.warnings,
            vec![
                SettlementWarning::DiscountOutOfRange(Decimal::MAX),
                SettlementWarning::ArithmeticOverflow,
            ]
        );

        let s = calculate_settlement(Decimal::MAX, Decimal::from(-100), false);
        assert!(s.warnings.contains(&SettlementWarning::ArithmeticOverflow));
    }

    #[test]
    fn test_deposit_rate_constant() {
        assert_eq!(NEW_CLIENT_DEPOSIT_RATE, Decimal::new(25, 2));
    }
}
