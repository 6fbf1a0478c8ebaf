//! Property tests for the per-tick decision
//!
//! For any snapshot: absent target means the baseline comes back unchanged,
//! and any match means exactly dnd.

use gamezen::services::decide;
use gamezen::{Activity, StatusValue, TargetConfig};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = StatusValue> {
    prop::sample::select(StatusValue::ALL.to_vec())
}

fn names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z ]{0,12}", 0..8)
}

proptest! {
    #[test]
    fn absent_target_restores_baseline(
        names in names_strategy(),
        baseline in status_strategy(),
    ) {
        // Digits never appear in generated names
        let target = TargetConfig::new("Target 1");
        let activities: Vec<Activity> = names.into_iter().map(Activity::new).collect();

        let decision = decide(&activities, &target, baseline);

        prop_assert_eq!(decision.status, baseline);
        prop_assert!(!decision.target_present);
    }

    #[test]
    fn present_target_forces_dnd(
        names in names_strategy(),
        baseline in status_strategy(),
        position in any::<prop::sample::Index>(),
    ) {
        let target = TargetConfig::new("Chess");
        let mut activities: Vec<Activity> = names.into_iter().map(Activity::new).collect();
        let at = position.index(activities.len() + 1);
        activities.insert(at, Activity::new("Chess"));

        let decision = decide(&activities, &target, baseline);

        prop_assert_eq!(decision.status, StatusValue::Dnd);
        prop_assert!(decision.target_present);
    }

    #[test]
    fn dnd_baseline_survives_absent_target(names in names_strategy()) {
        let target = TargetConfig::new("Target 1");
        let activities: Vec<Activity> = names.into_iter().map(Activity::new).collect();

        prop_assert_eq!(decide(&activities, &target, StatusValue::Dnd).status, StatusValue::Dnd);
    }
}
