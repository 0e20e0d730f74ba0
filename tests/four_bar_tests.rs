use approx::assert_relative_eq;
use linkage_engine::{
    core::joint::MotorAnchor,
    error::LinkageError,
    synthesis::four_bar::{FourBarLengths, FourBarOptions, FourBarSynthesizer},
    world::LinkageWorld,
    DVec2,
};

const DT: f64 = 1.0 / 60.0;

fn link_error(world: &LinkageWorld) -> f64 {
    world
        .constraints()
        .iter()
        .map(|(id, link)| (world.link_length(id).unwrap() - link.rest_length()).abs())
        .fold(0.0, f64::max)
}

#[test]
fn equal_lengths_need_no_nudging() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(1.0, 1.0, 1.0, 1.0), FourBarOptions::default());

    assert!(four_bar.grashof.satisfied);
    assert_eq!(four_bar.grashof.attempts, 0);
    assert_eq!(world.joints().len(), 4);
    assert_eq!(world.constraints().len(), 4);
    for (id, link) in world.constraints().iter() {
        assert_relative_eq!(link.rest_length(), 1.0);
        assert_relative_eq!(world.link_length(id).unwrap(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn layout_locks_ground_and_motorizes_crank() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), FourBarOptions::default());
    let [a, b, c, d] = four_bar.joints;

    assert!(world.joint(a).unwrap().locked);
    assert!(world.joint(d).unwrap().locked);
    assert!(!world.joint(c).unwrap().locked);
    assert_eq!(world.joint_position(a), Some(DVec2::ZERO));
    assert_eq!(world.joint_position(b), Some(DVec2::new(1.0, 0.0)));
    assert_eq!(world.joint_position(d), Some(DVec2::new(4.0, 0.0)));

    let motor = world.joint(b).unwrap().motor.expect("crank motor");
    assert_eq!(motor.anchor, MotorAnchor::Joint(a));
    assert_relative_eq!(motor.revolutions_per_second, 0.25);

    // Coupler and rocker close the loop, elbow up.
    let pc = world.joint_position(c).unwrap();
    assert!(pc.y > 0.0);
    assert_relative_eq!(pc.distance(DVec2::new(1.0, 0.0)), 3.5, epsilon = 1e-9);
    assert_relative_eq!(pc.distance(DVec2::new(4.0, 0.0)), 3.0, epsilon = 1e-9);
}

#[test]
fn non_grashof_set_gives_up_after_the_attempt_budget() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(1.0, 5.0, 1.0, 1.0), FourBarOptions::default());

    assert!(!four_bar.grashof.satisfied);
    assert_eq!(four_bar.grashof.attempts, 20);
    assert!(four_bar.lengths.crank < 5.0);
    assert!(four_bar.lengths.ground > 1.0);
}

#[test]
fn nudging_stops_as_soon_as_grashof_holds() {
    let synthesizer = FourBarSynthesizer::default();
    let (lengths, report) = synthesizer.nudge_to_grashof(FourBarLengths::new(1.0, 1.2, 0.6, 0.5));

    assert!(report.satisfied);
    assert_eq!(report.attempts, 2);
    assert!(lengths.is_grashof());
}

#[test]
fn grashof_can_be_left_unenforced() {
    let mut world = LinkageWorld::default();
    let options = FourBarOptions {
        enforce_grashof: false,
        ..FourBarOptions::default()
    };
    let four_bar = world.synthesize_four_bar(FourBarLengths::new(1.0, 5.0, 1.0, 1.0), options);

    assert!(!four_bar.grashof.satisfied);
    assert_eq!(four_bar.grashof.attempts, 0);
    assert_eq!(four_bar.lengths.crank, 5.0);
}

#[test]
fn unreachable_coupler_lands_on_the_ground_axis() {
    let mut world = LinkageWorld::default();
    let options = FourBarOptions {
        enforce_grashof: false,
        ..FourBarOptions::default()
    };
    let four_bar = world.synthesize_four_bar(FourBarLengths::new(10.0, 1.0, 1.0, 1.0), options);

    let pc = world.joint_position(four_bar.joints[2]).unwrap();
    assert_relative_eq!(pc.x, 5.5, epsilon = 1e-9);
    assert_relative_eq!(pc.y, 0.0, epsilon = 1e-9);
}

#[test]
fn short_ground_and_rocker_still_terminates() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(0.3, 3.0, 3.0, 0.5), FourBarOptions::default());
    assert!(four_bar.grashof.attempts <= 20);
    assert_eq!(world.joints().len(), 4);
}

#[test]
fn crank_rocker_keeps_its_links_while_running() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), FourBarOptions::default());
    let [a, b, _, d] = four_bar.joints;

    for _ in 0..240 {
        world.step_frame(DT);
    }

    assert_eq!(world.joint_position(a), Some(DVec2::ZERO));
    assert_eq!(world.joint_position(d), Some(DVec2::new(4.0, 0.0)));
    assert!(link_error(&world) < 1e-3, "link error {}", link_error(&world));

    // Four seconds at 90 deg/s: the crank came back round near its start.
    let crank_tip = world.joint_position(b).unwrap();
    assert_relative_eq!(crank_tip.length(), 1.0, epsilon = 1e-3);
    assert!(crank_tip.distance(DVec2::new(1.0, 0.0)) < 0.05, "crank at {crank_tip}");
    assert_eq!(world.trace().len(), 240);
}

#[test]
fn update_rewrites_rest_lengths_and_moves_far_pivot() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), FourBarOptions::default());
    let [a, b, _, d] = four_bar.joints;

    world
        .update_four_bar(FourBarLengths::new(4.5, 1.2, 3.6, 3.2), Some(120.0))
        .unwrap();

    let rests: Vec<f64> = four_bar
        .constraints
        .iter()
        .map(|id| world.constraint(*id).unwrap().rest_length())
        .collect();
    assert_eq!(rests, vec![1.2, 3.6, 3.2, 4.5]);
    assert_eq!(world.joint_position(a), Some(DVec2::ZERO));
    assert_eq!(world.joint_position(d), Some(DVec2::new(4.5, 0.0)));

    let motor = world.joint(b).unwrap().motor.unwrap();
    assert_relative_eq!(motor.revolutions_per_second, 120.0 / 360.0);
    assert_eq!(world.four_bar().unwrap().lengths.ground, 4.5);
}

#[test]
fn update_without_speed_keeps_the_motor_rate() {
    let mut world = LinkageWorld::default();
    let four_bar =
        world.synthesize_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), FourBarOptions::default());

    world
        .update_four_bar(FourBarLengths::new(4.0, 1.1, 3.5, 3.0), None)
        .unwrap();

    let motor = world.joint(four_bar.joints[1]).unwrap().motor.unwrap();
    assert_relative_eq!(motor.revolutions_per_second, 0.25);
}

#[test]
fn update_needs_a_four_bar() {
    let mut world = LinkageWorld::default();
    let result = world.update_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), None);
    assert_eq!(result, Err(LinkageError::NotAFourBar));
}

#[test]
fn synthesis_replaces_the_previous_model() {
    let mut world = LinkageWorld::default();
    world.add_joint(DVec2::new(9.0, 9.0));
    world.add_joint(DVec2::new(8.0, 8.0));

    world.synthesize_four_bar(FourBarLengths::new(4.0, 1.0, 3.5, 3.0), FourBarOptions::default());

    assert_eq!(world.joints().len(), 4);
    assert!(world
        .joints()
        .values()
        .all(|joint| joint.position != DVec2::new(9.0, 9.0)));
}
