use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::calories::calories_burned;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Running,
    Cycling,
}

impl ActivityKind {
    /// Tag written to the `activities.type` column.
    pub fn tag(self) -> &'static str {
        match self {
            ActivityKind::Running => "RUNNING",
            ActivityKind::Cycling => "CYCLING",
        }
    }

    /// Reads a stored tag back. Anything that is not `RUNNING` (ignoring
    /// case) loads as cycling, which is how legacy rows were always read.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("RUNNING") {
            ActivityKind::Running
        } else {
            ActivityKind::Cycling
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("running") => Ok(ActivityKind::Running),
            t if t.eq_ignore_ascii_case("cycling") => Ok(ActivityKind::Cycling),
            other => Err(format!("Unknown activity type: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FitnessActivity {
    pub id: i32,
    pub user_id: i32,
    pub kind: ActivityKind,
    pub duration_minutes: i32,
    /// Not persisted: activities loaded from storage carry `0.0` here.
    pub distance_km: f64,
    pub date: NaiveDate,
}

impl FitnessActivity {
    pub fn calories(&self) -> f64 {
        calories_burned(self.kind, self.distance_km)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: i32,
    pub kind: ActivityKind,
    pub duration_minutes: i32,
    pub distance_km: f64,
    pub date: NaiveDate,
}

impl NewActivity {
    pub fn running(user_id: i32, duration_minutes: i32, distance_km: f64, date: NaiveDate) -> Self {
        Self { user_id, kind: ActivityKind::Running, duration_minutes, distance_km, date }
    }

    pub fn cycling(user_id: i32, duration_minutes: i32, distance_km: f64, date: NaiveDate) -> Self {
        Self { user_id, kind: ActivityKind::Cycling, duration_minutes, distance_km, date }
    }

    pub fn calories(&self) -> f64 {
        calories_burned(self.kind, self.distance_km)
    }

    pub fn into_activity(self, id: i32) -> FitnessActivity {
        FitnessActivity {
            id,
            user_id: self.user_id,
            kind: self.kind,
            duration_minutes: self.duration_minutes,
            distance_km: self.distance_km,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn running_five_km_burns_300() {
        assert_eq!(NewActivity::running(101, 30, 5.0, date()).calories(), 300.0);
    }

    #[test]
    fn cycling_twenty_km_burns_800() {
        assert_eq!(NewActivity::cycling(101, 60, 20.0, date()).calories(), 800.0);
    }

    #[test]
    fn stored_tags_fall_back_to_cycling() {
        assert_eq!(ActivityKind::from_tag("running"), ActivityKind::Running);
        assert_eq!(ActivityKind::from_tag("RUNNING"), ActivityKind::Running);
        assert_eq!(ActivityKind::from_tag("CYCLING"), ActivityKind::Cycling);
        assert_eq!(ActivityKind::from_tag("swimming"), ActivityKind::Cycling);
    }

    #[test]
    fn form_labels_parse_strictly() {
        assert_eq!("Running".parse::<ActivityKind>(), Ok(ActivityKind::Running));
        assert_eq!(" cycling ".parse::<ActivityKind>(), Ok(ActivityKind::Cycling));
        assert!("Swimming".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn reloaded_activity_reads_zero_calories() {
        let mut activity = NewActivity::running(101, 30, 5.0, date()).into_activity(7);
        activity.distance_km = 0.0;
        assert_eq!(activity.calories(), 0.0);
    }
}
