// src/models/constants.rs

// Tabelas fixas do negócio.

use rust_decimal::Decimal;

use crate::models::user::UserRole;

/// Comissão total padrão sobre a venda: 5%.
pub const STANDARD_COMMISSION_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

// Os 5% divididos 60/40 entre quem vendeu e o sub-membro
pub const STANDARD_MEMBER_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);
pub const STANDARD_SUB_MEMBER_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Papéis que participam de uma venda, na ordem em que a distribuição é listada.
pub const SALE_ROLES: [UserRole; 2] = [UserRole::Member, UserRole::SubMember];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>, // None = sem teto
    pub label: &'static str,
}

impl PriceRange {
    // Intervalo meio-aberto: [min, max)
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }

    pub fn containing(price: u64) -> Option<&'static PriceRange> {
        PRICE_RANGES.iter().find(|range| range.contains(price))
    }
}

pub const PRICE_RANGES: [PriceRange; 7] = [
    PriceRange { min: 0, max: Some(1_000_000), label: "Under ₹10 Lakh" },
    PriceRange { min: 1_000_000, max: Some(2_500_000), label: "₹10 - 25 Lakh" },
    PriceRange { min: 2_500_000, max: Some(5_000_000), label: "₹25 - 50 Lakh" },
    PriceRange { min: 5_000_000, max: Some(10_000_000), label: "₹50 Lakh - 1 Crore" },
    PriceRange { min: 10_000_000, max: Some(25_000_000), label: "₹1 - 2.5 Crore" },
    PriceRange { min: 25_000_000, max: Some(50_000_000), label: "₹2.5 - 5 Crore" },
    PriceRange { min: 50_000_000, max: None, label: "Above ₹5 Crore" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn standard_shares_add_up_to_the_commission_rate() {
        assert_eq!(STANDARD_MEMBER_RATE + STANDARD_SUB_MEMBER_RATE, STANDARD_COMMISSION_RATE);
        assert_eq!(STANDARD_COMMISSION_RATE.to_string(), "0.05");
    }

    #[rstest]
    #[case(0, "Under ₹10 Lakh")]
    #[case(999_999, "Under ₹10 Lakh")]
    #[case(1_000_000, "₹10 - 25 Lakh")]
    #[case(5_000_000, "₹50 Lakh - 1 Crore")]
    #[case(900_000_000, "Above ₹5 Crore")]
    fn buckets_are_half_open(#[case] price: u64, #[case] label: &str) {
        assert_eq!(PriceRange::containing(price).map(|r| r.label), Some(label));
    }
}
