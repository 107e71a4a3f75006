//! HTML form at `/fitness`: log an activity, see the activity history.
//!
//! Nothing here returns an error response. Bad input and storage failures are
//! written into the page as text.

use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use log::error;
use serde::Deserialize;
use std::fmt::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::db::{Repositories, Repository};
use crate::errors::PersistenceError;
use crate::models::activity::{ActivityKind, FitnessActivity, NewActivity};
use crate::tasks::analytics::{report_summary, spawn_summary, SharedOutput};
use crate::utils::validation::{parse_count, parse_measure};

/// Settings and shared handles for the form page.
#[derive(Clone)]
pub struct FitnessPage {
    /// The form always logs for this user.
    pub user_id: i32,
    pub summary_delay: Duration,
    pub output: SharedOutput,
    pub shutdown: CancellationToken,
}

#[derive(Deserialize, Debug, Default)]
pub struct ActivityForm {
    #[serde(rename = "type")]
    kind: Option<String>,
    dur: Option<String>,
    dist: Option<String>,
}

// GET /fitness
pub async fn show_tracker(
    repos: web::Data<Repositories>,
    page: web::Data<FitnessPage>,
) -> HttpResponse {
    let history = repos.activities.find_by_user_id(page.user_id).await;
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(&history))
}

// POST /fitness
pub async fn submit_activity(
    repos: web::Data<Repositories>,
    page: web::Data<FitnessPage>,
    form: web::Form<ActivityForm>,
) -> HttpResponse {
    let draft = match parse_form(&form, page.user_id, Local::now().date_naive()) {
        Ok(draft) => draft,
        Err(msg) => return error_text(&msg),
    };

    match repos.activities.create(draft).await {
        Ok(activity) => {
            // Runs alongside the redirect; no ordering with the response.
            tokio::spawn(report_summary(spawn_summary(
                vec![activity],
                page.output.clone(),
                page.summary_delay,
                page.shutdown.child_token(),
            )));
            HttpResponse::Found()
                .append_header((header::LOCATION, "/fitness"))
                .finish()
        }
        Err(e) => {
            error!("Save Error: {}", e);
            error_text(&format!("Save Error: {}", e))
        }
    }
}

fn parse_form(form: &ActivityForm, user_id: i32, today: NaiveDate) -> Result<NewActivity, String> {
    let kind: ActivityKind = form.kind.as_deref().unwrap_or("").parse()?;
    let duration = parse_count("Duration", form.dur.as_deref())?;
    let distance = parse_measure("Distance", form.dist.as_deref())?;

    Ok(NewActivity {
        user_id,
        kind,
        duration_minutes: duration,
        distance_km: distance,
        date: today,
    })
}

fn error_text(msg: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("Error: {}", msg))
}

fn render_page(history: &Result<Vec<FitnessActivity>, PersistenceError>) -> String {
    let mut html = String::from("<html><body><h2>Fitness Tracker</h2>\n");
    html.push_str("<form method='POST'>\n");
    html.push_str("Type: <select name='type'><option>Running</option><option>Cycling</option></select><br>\n");
    html.push_str("Duration (mins): <input type='number' name='dur' min='0' required><br>\n");
    html.push_str("Distance (km): <input type='text' name='dist' required><br>\n");
    html.push_str("<button type='submit'>Save</button></form>\n");
    html.push_str("<hr><h3>History</h3><table border='1'><tr><th>Type</th><th>Cals</th></tr>\n");

    match history {
        Ok(activities) => {
            for activity in activities {
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td>{:?}</td></tr>",
                    activity.kind,
                    activity.calories()
                );
            }
        }
        Err(e) => {
            let _ = writeln!(html, "Error loading data: {}", escape_html(&e.to_string()));
        }
    }

    html.push_str("</table></body></html>");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
        .replace('"', "&quot;")
}
