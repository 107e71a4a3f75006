use crate::models::activity::ActivityKind;

/// Calories burned per kilometre, per activity kind.
const CALORIES_PER_KM: [(ActivityKind, f64); 2] = [
    (ActivityKind::Running, 60.0),
    (ActivityKind::Cycling, 40.0),
];

pub fn calories_per_km(kind: ActivityKind) -> f64 {
    CALORIES_PER_KM
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, per_km)| *per_km)
        .unwrap_or(0.0)
}

/// `distance_km × calories_per_km(kind)`. Negative distances are not
/// rejected here; input handlers refuse them before an activity is built.
pub fn calories_burned(kind: ActivityKind, distance_km: f64) -> f64 {
    distance_km * calories_per_km(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_multiplier() {
        assert_eq!(calories_per_km(ActivityKind::Running), 60.0);
        assert_eq!(calories_per_km(ActivityKind::Cycling), 40.0);
    }

    #[test]
    fn calories_scale_linearly_with_distance() {
        for d in [0.0, 0.5, 1.0, 5.0, 12.25, 42.195] {
            assert_eq!(calories_burned(ActivityKind::Running, d), d * 60.0);
            assert_eq!(calories_burned(ActivityKind::Cycling, d), d * 40.0);
        }
    }

    #[test]
    fn zero_distance_burns_nothing() {
        assert_eq!(calories_burned(ActivityKind::Running, 0.0), 0.0);
    }
}
