use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl SetPasswordRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.new_password.is_empty() {
            return Err(AppError::bad_request("new_password is required"));
        }
        if self.new_password == self.current_password {
            return Err(AppError::bad_request(
                "new_password must differ from the current password",
            ));
        }
        Ok(())
    }
}
