use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Subscription, User},
};

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 150;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::bad_request("A valid email is required"));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(AppError::bad_request(format!(
                "email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        validate_username(&self.username)?;
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::bad_request(format!("{field} is required")));
            }
            if value.chars().count() > MAX_NAME_LEN {
                return Err(AppError::bad_request(format!(
                    "{field} must be at most {MAX_NAME_LEN} characters"
                )));
            }
        }
        if self.password.is_empty() {
            return Err(AppError::bad_request("password is required"));
        }
        Ok(())
    }
}

/// Usernames are letters, digits and `_ . @ + -` only.
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::bad_request("username is required"));
    }
    if username.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request(format!(
            "username must be at most {MAX_NAME_LEN} characters"
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
    if !username.chars().all(allowed) {
        return Err(AppError::bad_request(
            "username may contain only letters, digits and _ . @ + -",
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubscriptionList {
    #[schema(value_type = Vec<Subscription>)]
    pub items: Vec<Subscription>,
}
