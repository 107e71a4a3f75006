//! Fitness tracking backend: users, workouts, daily progress and a legacy
//! activity log, stored in PostgreSQL and served over HTTP.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod tasks;
pub mod utils;
