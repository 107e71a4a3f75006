use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::db::{Repositories, Repository};
use crate::errors::AppError;
use crate::models::progress::NewProgress;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct ProgressRequest {
    /// Defaults to today.
    day: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Steps cannot be negative"))]
    steps: Option<i32>,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    sleep_hours: Option<f64>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    notes: Option<String>,
}

// GET /v1/users/:userId/progress
pub async fn get_progress(
    repos: web::Data<Repositories>,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let rows = repos.progress.find_by_user_id(*user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

// POST /v1/users/:userId/progress
pub async fn create_progress(
    repos: web::Data<Repositories>,
    user_id: web::Path<i32>,
    payload: web::Json<ProgressRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let user = repos.users.find_by_id(*user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let progress = repos.progress.create(NewProgress {
        user_id: user.id,
        day: payload.day.unwrap_or_else(|| Local::now().date_naive()),
        steps: payload.steps,
        sleep_hours: payload.sleep_hours,
        notes: payload.notes,
    })
    .await?;

    Ok(HttpResponse::Created().json(progress))
}

// PATCH /v1/progress/:progressId
// Overwrites the whole row: omitted metrics are cleared.
pub async fn update_progress(
    repos: web::Data<Repositories>,
    progress_id: web::Path<i32>,
    payload: web::Json<ProgressRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let mut progress = repos.progress.find_by_id(*progress_id).await?
        .ok_or_else(|| AppError::NotFound("Progress not found".to_string()))?;

    if let Some(day) = payload.day {
        progress.day = day;
    }
    progress.steps = payload.steps;
    progress.sleep_hours = payload.sleep_hours;
    progress.notes = payload.notes;

    if !repos.progress.update(&progress).await? {
        return Err(AppError::NotFound("Progress not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(progress))
}

// DELETE /v1/progress/:progressId
pub async fn delete_progress(
    repos: web::Data<Repositories>,
    progress_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    if !repos.progress.delete(*progress_id).await? {
        return Err(AppError::NotFound("Progress not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Progress deleted successfully" })))
}
