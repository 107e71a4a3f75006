use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's metrics for a user. Nothing stops two rows sharing a day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Progress {
    pub progress_id: i32,
    pub user_id: i32,
    pub day: NaiveDate,
    pub steps: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewProgress {
    pub user_id: i32,
    pub day: NaiveDate,
    pub steps: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub notes: Option<String>,
}

impl NewProgress {
    pub fn into_progress(self, progress_id: i32) -> Progress {
        Progress {
            progress_id,
            user_id: self.user_id,
            day: self.day,
            steps: self.steps,
            sleep_hours: self.sleep_hours,
            notes: self.notes,
        }
    }
}
