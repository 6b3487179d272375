use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize)]
pub(crate) struct SignupRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    #[serde(alias = "firstName")]
    pub(crate) first_name: String,
    #[serde(alias = "lastName")]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) phone: String,
    /// Option (track) name chosen at signup.
    pub(crate) option: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MentorSignupRequest {
    #[serde(flatten)]
    pub(crate) base: SignupRequest,
    #[serde(default)]
    pub(crate) expertise: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileUpdateRequest {
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    pub(crate) bio: Option<String>,
    #[serde(default)]
    pub(crate) skills: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: String,
    pub(crate) bio: String,
    pub(crate) skills: String,
    pub(crate) role: UserRole,
    pub(crate) option: Option<String>,
    pub(crate) expertise: Option<String>,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(
        user: User,
        option_name: Option<String>,
        expertise: Option<String>,
    ) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            bio: user.bio,
            skills: user.skills,
            role: user.role,
            option: option_name,
            expertise,
            created_at: format_primitive(user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassmateResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    /// Uppercase initials, matching the avatar badge the frontend renders.
    pub(crate) name_abbreviation: String,
    pub(crate) skills: String,
    pub(crate) bio: String,
}

impl ClassmateResponse {
    pub(crate) fn from_db(user: User) -> Self {
        let name_abbreviation = name_abbreviation(&user.first_name, &user.last_name);
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            name_abbreviation,
            skills: user.skills,
            bio: user.bio,
        }
    }
}

pub(crate) fn name_abbreviation(first_name: &str, last_name: &str) -> String {
    let mut abbreviation = String::new();
    if let Some(initial) = first_name.chars().next() {
        abbreviation.extend(initial.to_uppercase());
    }
    if let Some(initial) = last_name.chars().next() {
        abbreviation.extend(initial.to_uppercase());
    }
    abbreviation
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    #[serde(flatten)]
    pub(crate) user: UserResponse,
    pub(crate) reports_count: i64,
    pub(crate) projects_count: i64,
}
