// src/common/format.rs

// Formatação para exibição no padrão en-IN (₹, agrupamento em lakh/crore).
// O arredondamento acontece só aqui; valores persistidos nunca são arredondados.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// "₹2,50,000" (sem casas decimais)
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("{sign}₹{}", group_indian(&digits))
}

/// Número com agrupamento indiano e até 3 casas decimais: "12,34,567.891"
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = rounded.abs().to_string();
    match text.split_once('.') {
        Some((int_part, frac)) => format!("{sign}{}.{frac}", group_indian(int_part)),
        None => format!("{sign}{}", group_indian(&text)),
    }
}

/// Percentual com uma casa, como o calculador de comissões exibe: "60.0%"
pub fn format_percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

/// "1 Jan 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// "1 Jan 2024, 02:30 pm"
pub fn format_date_time(moment: DateTime<Utc>) -> String {
    moment.format("%-d %b %Y, %I:%M %P").to_string()
}

/// Números de 10 dígitos viram "+91 98765 43210"; o resto volta como veio.
pub fn format_phone(phone: &str) -> String {
    let cleaned: String = phone.chars().filter(char::is_ascii_digit).collect();
    if cleaned.len() == 10 {
        let (head, tail) = cleaned.split_at(5);
        return format!("+91 {head} {tail}");
    }
    phone.to_string()
}

// Últimos 3 dígitos juntos, o resto em pares: 12345678 -> 1,23,45,678
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{last_three}", groups.join(","))
}
