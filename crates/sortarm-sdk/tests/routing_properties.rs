//! 路由与运动顺序的性质测试

use proptest::prelude::*;
use sortarm_hal::mock::SimArm;
use sortarm_sdk::prelude::*;
use sortarm_sdk::driver::RecordingSleeper;

proptest! {
    #[test]
    fn prop_labels_with_ripe_go_to_bin_a(prefix in "[a-z_]{0,6}", suffix in "[a-z_]{0,6}", upper in any::<bool>()) {
        let word = if upper { "RIPE" } else { "ripe" };
        let label = format!("{}{}{}", prefix, word, suffix);
        prop_assert_eq!(Ripeness::from_label(&label).bin(), Bin::A);
    }

    #[test]
    fn prop_labels_without_ripe_go_to_bin_b(label in "[a-hj-oq-z_ ]{0,16}") {
        // 字母表里去掉了 i 和 p，不可能包含 "ripe"
        prop_assert_eq!(Ripeness::from_label(&label).bin(), Bin::B);
    }

    #[test]
    fn prop_move_writes_in_joint_order(
        angles in prop::array::uniform5(0i32..=270),
        duration in 1u32..5000,
    ) {
        let sequencer = PoseSequencer::new(MotionConfig::default(), Arc::new(RecordingSleeper::new()));
        let mut arm = SimArm::new();
        let pose = JointPose::from_degrees(angles);

        sequencer.move_to(&mut arm, &pose, duration).unwrap();

        let writes = arm.writes();
        let ids: Vec<u8> = writes.iter().map(|w| w.joint.id()).collect();
        prop_assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        for write in &writes[..4] {
            prop_assert_eq!(write.duration_ms, duration);
        }
        prop_assert_eq!(writes[4].duration_ms, (f64::from(duration) * 1.2 + 1e-9).floor() as u32);
        prop_assert_eq!(arm.pose(), pose);
    }

    #[test]
    fn prop_grip_terminates_within_max_attempts(
        contact in prop::option::of(60.0f64..180.0),
        max_attempts in 3u32..60,
    ) {
        let config = GripConfig { max_attempts, ..GripConfig::default() };
        let grip = GripController::new(config, Arc::new(NoSleep)).unwrap();
        let arm = SimArm::new();
        arm.set_object(contact.map(Deg));
        arm.set_angle(JointId::Gripper, Deg(60.0));
        let mut actuator = arm.clone();

        let outcome = grip.clamp(&mut actuator, true).unwrap();

        let attempts = arm.writes_to(JointId::Gripper).len() as u32;
        prop_assert!(attempts <= max_attempts);
        match outcome {
            GripOutcome::GripDetected { attempt, .. } => prop_assert_eq!(attempt, attempts),
            GripOutcome::MaxAttemptsReached { attempts: n, .. } => {
                prop_assert_eq!(n, max_attempts);
                prop_assert_eq!(attempts, max_attempts);
            },
            GripOutcome::Opened { .. } => prop_assert!(false, "close returned Opened"),
        }
    }
}
