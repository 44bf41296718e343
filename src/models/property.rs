// src/models/property.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::common::error::field_error;
use crate::db::{Record, RecordId};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyCategory {
    Land,
    Villa,
    Apartment,
    Commercial,
    Building,
}

impl PropertyCategory {
    pub const ALL: [PropertyCategory; 5] = [
        PropertyCategory::Land,
        PropertyCategory::Villa,
        PropertyCategory::Apartment,
        PropertyCategory::Commercial,
        PropertyCategory::Building,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyCategory::Land => "land",
            PropertyCategory::Villa => "villa",
            PropertyCategory::Apartment => "apartment",
            PropertyCategory::Commercial => "commercial",
            PropertyCategory::Building => "building",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyCategory::Land => "Land",
            PropertyCategory::Villa => "Villa",
            PropertyCategory::Apartment => "Apartment",
            PropertyCategory::Commercial => "Commercial Space",
            PropertyCategory::Building => "Buildings",
        }
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    #[default]
    Available,
    UnderNegotiation,
    Sold,
    Rented,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::UnderNegotiation => "under-negotiation",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::UnderNegotiation => "Under Negotiation",
            PropertyStatus::Sold => "Sold",
            PropertyStatus::Rented => "Rented",
        }
    }

    /// Vendido e alugado são finais; negociação pode voltar para disponível.
    pub fn can_transition_to(self, next: PropertyStatus) -> bool {
        use PropertyStatus::*;
        match (self, next) {
            (Available, UnderNegotiation | Sold | Rented) => true,
            (UnderNegotiation, Available | Sold | Rented) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    pub title: String,
    pub location: String,
    pub category: PropertyCategory,
    pub size: String, // Ex: "1200 sq ft"
    pub price: u64,   // Rupias inteiras
    pub status: PropertyStatus,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    /// Magnitude numérica no início de `size` ("1,200 sq ft" -> 1200).
    pub fn size_magnitude(&self) -> Option<Decimal> {
        leading_magnitude(&self.size)
    }

    /// Preço por unidade de área, quando o tamanho tem uma magnitude positiva.
    pub fn price_per_size_unit(&self) -> Option<Decimal> {
        let magnitude = self.size_magnitude()?;
        if magnitude <= Decimal::ZERO {
            return None;
        }
        Some(Decimal::from(self.price) / magnitude)
    }
}

fn leading_magnitude(size: &str) -> Option<Decimal> {
    let numeric: String = size
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&numeric).ok()
}

// Campos informados pelo chamador; id e createdAt vêm da store
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,

    pub category: PropertyCategory,

    #[validate(custom(function = "validate_size"))]
    pub size: String,

    #[validate(range(min = 1, message = "Price must be a positive amount."))]
    pub price: u64,

    #[serde(default)]
    pub status: PropertyStatus,

    #[serde(default)]
    pub images: Vec<String>,

    pub listed_by: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub category: Option<PropertyCategory>,
    pub size: Option<String>,
    pub price: Option<u64>,
    pub status: Option<PropertyStatus>,
    pub images: Option<Vec<String>>,
    pub listed_by: Option<String>,
    pub description: Option<String>,
}

impl PropertyPatch {
    pub fn status(status: PropertyStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

impl Record for Property {
    type Draft = NewProperty;
    type Patch = PropertyPatch;

    const LABEL: &'static str = "Property";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewProperty, now: DateTime<Utc>) -> Self {
        Property {
            id,
            title: draft.title,
            location: draft.location,
            category: draft.category,
            size: draft.size,
            price: draft.price,
            status: draft.status,
            images: draft.images,
            created_at: now,
            listed_by: draft.listed_by,
            description: draft.description,
        }
    }

    // createdAt nunca muda depois da criação
    fn apply(&mut self, patch: PropertyPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if patch.listed_by.is_some() {
            self.listed_by = patch.listed_by;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
    }
}

// --- Validação ---

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("blank", "This field is required."));
    }
    Ok(())
}

fn validate_size(value: &str) -> Result<(), ValidationError> {
    match leading_magnitude(value) {
        Some(magnitude) if magnitude > Decimal::ZERO => Ok(()),
        _ => Err(field_error("size", "Size must start with a positive number, e.g. \"1200 sq ft\".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn property(size: &str, price: u64) -> Property {
        Property::from_draft(
            7,
            NewProperty {
                title: "Sea-facing villa".into(),
                location: "Bandra, Mumbai".into(),
                category: PropertyCategory::Villa,
                size: size.into(),
                price,
                status: PropertyStatus::Available,
                images: vec![],
                listed_by: None,
                description: None,
            },
            Utc::now(),
        )
    }

    #[rstest]
    #[case("1200 sq ft", Some(Decimal::new(1200, 0)))]
    #[case("1,500 sq ft", Some(Decimal::new(1500, 0)))]
    #[case("2.5 acres", Some(Decimal::new(25, 1)))]
    #[case("about 900", None)]
    fn size_magnitude_reads_the_leading_number(#[case] size: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(property(size, 1).size_magnitude(), expected);
    }

    #[test]
    fn price_per_size_unit_divides_by_the_magnitude() {
        assert_eq!(property("1000 sq ft", 5_000_000).price_per_size_unit(), Some(Decimal::new(5000, 0)));
        assert_eq!(property("0 sq ft", 5_000_000).price_per_size_unit(), None);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut p = property("1200 sq ft", 100);
        let created_at = p.created_at;

        p.apply(PropertyPatch::status(PropertyStatus::Sold));

        assert_eq!(p.status, PropertyStatus::Sold);
        assert_eq!(p.title, "Sea-facing villa");
        assert_eq!(p.price, 100);
        assert_eq!(p.created_at, created_at);
    }

    #[rstest]
    #[case(PropertyStatus::Available, PropertyStatus::Sold, true)]
    #[case(PropertyStatus::Available, PropertyStatus::UnderNegotiation, true)]
    #[case(PropertyStatus::UnderNegotiation, PropertyStatus::Available, true)]
    #[case(PropertyStatus::Sold, PropertyStatus::Available, false)]
    #[case(PropertyStatus::Rented, PropertyStatus::Sold, false)]
    #[case(PropertyStatus::Available, PropertyStatus::Available, false)]
    fn status_transitions(#[case] from: PropertyStatus, #[case] to: PropertyStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn statuses_serialize_in_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PropertyStatus::UnderNegotiation).unwrap(),
            "\"under-negotiation\""
        );
    }

    #[test]
    fn new_property_validation_reports_each_field() {
        let draft = NewProperty {
            title: "  ".into(),
            location: "Pune".into(),
            category: PropertyCategory::Land,
            size: "large".into(),
            price: 0,
            status: PropertyStatus::Available,
            images: vec![],
            listed_by: None,
            description: None,
        };

        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("size"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("location"));
    }
}
