use linkage_engine::*;

fn main() -> Result<()> {
    let mut world = LinkageWorld::default();
    let base = world.add_joint(DVec2::ZERO);
    world.set_locked(base, true)?;

    let mut previous = base;
    for i in 1..=4 {
        let joint = world.add_joint(DVec2::new(i as f64, 0.0));
        world.add_constraint(previous, joint)?;
        previous = joint;
    }

    let chain = world.build_ik_chain(base, previous)?;
    world.set_ik_chain(chain)?;
    if let Some(report) = world.set_ik_target(DVec2::new(1.5, 2.5)) {
        println!("Placed target: {report:?}");
    }
    world.start_ik()?;

    for _ in 0..30 {
        world.step_once();
    }
    if let Some(tip) = world.joint_position(previous) {
        println!("End effector settled at ({:.3}, {:.3})", tip.x, tip.y);
    }

    let chain = world.build_ik_chain(base, previous)?;
    let report = world.solve_ik(&chain, DVec2::new(10.0, 0.0), 1e-3, 50)?;
    println!("Reaching past the chain: {report:?}");
    Ok(())
}
