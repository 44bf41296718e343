// src/models/user.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::common::error::field_error;
use crate::db::{Record, RecordId};
use crate::models::property::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Member,
    #[default]
    SubMember,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
            UserRole::SubMember => "sub-member",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Member => "Team Member",
            UserRole::SubMember => "Sub Member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: UserRole,
    pub joined_date: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upline_id: Option<RecordId>, // Quem recrutou (só referência)
}

fn default_active() -> bool {
    true
}

// Payload do convite de um novo membro da equipe
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteMember {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Enter a valid e-mail address."))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(custom(function = "validate_invitable_role"))]
    pub role: UserRole,

    pub upline_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub upline_id: Option<Option<RecordId>>,
}

impl Record for User {
    type Draft = InviteMember;
    type Patch = UserPatch;

    const LABEL: &'static str = "User";

    fn id(&self) -> RecordId {
        self.id
    }

    // Novo membro entra sempre ativo
    fn from_draft(id: RecordId, draft: InviteMember, now: DateTime<Utc>) -> Self {
        User {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone,
            role: draft.role,
            joined_date: now,
            is_active: true,
            upline_id: draft.upline_id,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(upline_id) = patch.upline_id {
            self.upline_id = upline_id;
        }
    }
}

// Vazio é aceito; se vier, precisa ter 10 dígitos (com ou sem +91)
fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let national = digits.strip_prefix("91").filter(|d| d.len() == 10).unwrap_or(&digits);
    if national.len() != 10 {
        return Err(field_error("phone", "Phone must have 10 digits."));
    }
    Ok(())
}

fn validate_invitable_role(role: &UserRole) -> Result<(), ValidationError> {
    if *role == UserRole::Admin {
        return Err(field_error("role", "Admins cannot be invited."));
    }
    Ok(())
}
