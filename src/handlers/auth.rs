use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{Repositories, Repository};
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::tasks::auto_sync::CurrentUser;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    email: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    name: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    message: String,
    created: bool,
    user: User,
}

// POST /v1/login
// Signs in by email, registering the user when the email is new.
pub async fn login(
    repos: web::Data<Repositories>,
    current_user: web::Data<CurrentUser>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let mut payload = payload.into_inner();
    payload.email = payload.email.trim().to_string();
    validate_payload(&payload)?;
    let email = payload.email.as_str();

    let (user, created) = match repos.users.find_by_email(email).await? {
        Some(user) => (user, false),
        None => {
            let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(AppError::BadRequest("Enter name for new user".to_string()));
            }
            (repos.users.create(NewUser::new(name, email)).await?, true)
        }
    };

    let message = if created {
        format!("New user created: {}", user.name)
    } else {
        format!("Welcome back, {}", user.name)
    };
    info!("{} ({})", message, user.email);
    current_user.send_replace(Some(user.clone()));

    let mut response = if created { HttpResponse::Created() } else { HttpResponse::Ok() };
    Ok(response.json(LoginResponse { message, created, user }))
}
