pub mod activity;
pub mod progress;
pub mod user;
pub mod workout;
