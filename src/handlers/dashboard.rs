use actix_web::{web, HttpResponse};
use log::info;
use serde::Serialize;

use crate::db::{Repositories, Repository};
use crate::errors::AppError;
use crate::models::{progress::Progress, user::User, workout::Workout};

#[derive(Serialize)]
pub struct DashboardResponse {
    user: User,
    total_calories: i64,
    workouts: Vec<Workout>,
    progress: Vec<Progress>,
}

// GET /v1/users/:userId/dashboard
pub async fn get_dashboard(
    repos: web::Data<Repositories>,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user = repos.users.find_by_id(*user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let workouts = repos.workouts.find_by_user_id(user.id).await?;
    let progress = repos.progress.find_by_user_id(user.id).await?;
    info!(
        "Dashboard load: {} workouts, {} progress rows for {}",
        workouts.len(),
        progress.len(),
        user.email
    );

    let total_calories = workouts.iter().map(|w| i64::from(w.calories_burned)).sum();
    Ok(HttpResponse::Ok().json(DashboardResponse {
        user,
        total_calories,
        workouts,
        progress,
    }))
}
