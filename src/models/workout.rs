use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub workout_id: i32,
    pub user_id: i32,
    pub workout_type: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub workout_date: NaiveDate,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub user_id: i32,
    pub workout_type: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub workout_date: NaiveDate,
}

impl NewWorkout {
    pub fn into_workout(self, workout_id: i32) -> Workout {
        Workout {
            workout_id,
            user_id: self.user_id,
            workout_type: self.workout_type,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            workout_date: self.workout_date,
        }
    }
}
