pub mod auth;
pub mod dashboard;
pub mod fitness;
pub mod profile;
pub mod progress;
pub mod workout;

use actix_web::web;

use crate::errors::AppError;

/// Registers every route. Callers supply the app data: `Repositories`,
/// `CurrentUser` and `FitnessPage`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::resource("/fitness")
            .route(web::get().to(fitness::show_tracker))
            .route(web::post().to(fitness::submit_activity)),
    )
    .service(
        web::resource("/v1/login")
            .route(web::post().to(auth::login)),
    )
    .service(
        web::resource("/v1/users/{userId}")
            .route(web::get().to(profile::get_profile))
            .route(web::patch().to(profile::update_profile)),
    )
    .service(
        web::resource("/v1/users/{userId}/dashboard")
            .route(web::get().to(dashboard::get_dashboard)),
    )
    .service(
        web::resource("/v1/users/{userId}/workouts")
            .route(web::get().to(workout::get_workouts))
            .route(web::post().to(workout::create_workout)),
    )
    .service(
        web::resource("/v1/workouts/{workoutId}")
            .route(web::patch().to(workout::update_workout))
            .route(web::delete().to(workout::delete_workout)),
    )
    .service(
        web::resource("/v1/users/{userId}/progress")
            .route(web::get().to(progress::get_progress))
            .route(web::post().to(progress::create_progress)),
    )
    .service(
        web::resource("/v1/progress/{progressId}")
            .route(web::patch().to(progress::update_progress))
            .route(web::delete().to(progress::delete_progress)),
    );
}
