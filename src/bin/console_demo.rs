//! Console walkthrough: builds two sample activities, checks them against a
//! calorie goal and prints a background calorie summary.

use chrono::NaiveDate;
use env_logger::Env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use fittrack::models::activity::NewActivity;
use fittrack::tasks::analytics::{shared_output, spawn_summary, total_calories, Goal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    println!("=== Console Test Started ===");

    let first = NaiveDate::from_ymd_opt(2025, 12, 1).ok_or("invalid date")?;
    let second = NaiveDate::from_ymd_opt(2025, 12, 2).ok_or("invalid date")?;
    let activities = vec![
        NewActivity::running(101, 30, 5.0, first).into_activity(1),
        NewActivity::cycling(101, 60, 20.0, second).into_activity(2),
    ];

    let calorie_goal = Goal::new(500.0);
    println!("Goal Met? {}", calorie_goal.is_met(total_calories(&activities)));

    let summary = spawn_summary(
        activities,
        shared_output(std::io::stdout()),
        Duration::from_millis(500),
        CancellationToken::new(),
    );
    summary.await??;

    println!("Console Test Completed.");
    Ok(())
}
