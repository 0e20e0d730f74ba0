use linkage_engine::*;

fn main() {
    let mut world = LinkageWorld::default();
    let four_bar = world.synthesize_four_bar(
        FourBarLengths::new(4.0, 1.0, 3.5, 3.0),
        FourBarOptions::default(),
    );
    println!(
        "Synthesized four-bar {:?} (grashof: {})",
        four_bar.lengths, four_bar.grashof.satisfied
    );

    // Trace the middle of the coupler.
    world.trace_mut().set_constraint(four_bar.constraints[1]);

    let mut clock = FrameClock::default();
    clock.play();
    let mut now = std::time::Instant::now();
    for frame in 0..240 {
        now += std::time::Duration::from_millis(16);
        let Some(dt) = clock.tick(now) else {
            continue;
        };
        world.step_frame(dt);
        if frame % 60 == 0 {
            if let Some(c) = world.joint_position(four_bar.joints[2]) {
                println!("frame {frame:>3}: coupler joint at ({:.3}, {:.3})", c.x, c.y);
            }
        }
    }

    println!("Trace holds {} samples", world.trace().len());
    world.profiler().report();
}
