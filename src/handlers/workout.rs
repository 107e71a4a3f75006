use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::db::{Repositories, Repository};
use crate::errors::AppError;
use crate::models::workout::NewWorkout;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct WorkoutRequest {
    #[validate(length(min = 1, max = 50, message = "Workout type must be between 1 and 50 characters"))]
    workout_type: String,

    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    duration_minutes: i32,

    #[validate(range(min = 0, message = "Calories cannot be negative"))]
    calories_burned: i32,

    /// Defaults to today.
    workout_date: Option<NaiveDate>,
}

// GET /v1/users/:userId/workouts
pub async fn get_workouts(
    repos: web::Data<Repositories>,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let workouts = repos.workouts.find_by_user_id(*user_id).await?;
    Ok(HttpResponse::Ok().json(workouts))
}

// POST /v1/users/:userId/workouts
pub async fn create_workout(
    repos: web::Data<Repositories>,
    user_id: web::Path<i32>,
    payload: web::Json<WorkoutRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let user = repos.users.find_by_id(*user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let workout = repos.workouts.create(NewWorkout {
        user_id: user.id,
        workout_type: payload.workout_type.trim().to_string(),
        duration_minutes: payload.duration_minutes,
        calories_burned: payload.calories_burned,
        workout_date: payload.workout_date.unwrap_or_else(|| Local::now().date_naive()),
    })
    .await?;

    Ok(HttpResponse::Created().json(workout))
}

// PATCH /v1/workouts/:workoutId
pub async fn update_workout(
    repos: web::Data<Repositories>,
    workout_id: web::Path<i32>,
    payload: web::Json<WorkoutRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let mut workout = repos.workouts.find_by_id(*workout_id).await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    workout.workout_type = payload.workout_type.trim().to_string();
    workout.duration_minutes = payload.duration_minutes;
    workout.calories_burned = payload.calories_burned;
    if let Some(date) = payload.workout_date {
        workout.workout_date = date;
    }

    if !repos.workouts.update(&workout).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(workout))
}

// DELETE /v1/workouts/:workoutId
pub async fn delete_workout(
    repos: web::Data<Repositories>,
    workout_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    if !repos.workouts.delete(*workout_id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Workout deleted successfully" })))
}
