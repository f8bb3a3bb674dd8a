use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set, SqlErr,
    ActiveValue::NotSet,
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, SetPasswordRequest},
        users::RegisterRequest,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn password_matches(stored_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    let RegisterRequest {
        email,
        username,
        first_name,
        last_name,
        password,
    } = payload;
    let email = email.trim().to_string();

    let taken = Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Email.eq(email.as_str()))
                .add(UserCol::Username.eq(username.as_str())),
        )
        .one(&state.orm)
        .await?;

    if let Some(existing) = taken {
        let field = if existing.email == email { "Email" } else { "Username" };
        return Err(AppError::BadRequest(format!("{field} is already taken")));
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        username: Set(username),
        first_name: Set(first_name),
        last_name: Set(last_name),
        password_hash: Set(hash_password(&password)?),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::bad_request("Email or username is already taken")
        }
        _ => AppError::from(err),
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success(
        "User created",
        User::from_entity(user, false),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    if !password_matches(&user.password_hash, &password)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let token = issue_token(user.id, &state.jwt_secret)?;
    tracing::debug!(user_id = %user.id, "token issued");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

pub async fn set_password(
    state: &AppState,
    user: &AuthUser,
    payload: SetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.validate()?;
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".into()))?;

    if !password_matches(&model.password_hash, &payload.current_password)? {
        return Err(AppError::bad_request("current_password is incorrect"));
    }

    let mut active: UserActive = model.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, "password changed");
    Ok(ApiResponse::done("Password updated"))
}
