pub mod clock;
pub mod trace;

use std::time::Instant;

use glam::DVec2;
use log::{debug, trace, warn};

use crate::{
    config::{SimulationConfig, DEFAULT_STEP_DT},
    core::{
        constraints::Constraint,
        joint::{Joint, Motor, MotorAnchor},
        snapshot::{ConstraintRecord, JointRecord, LinkageSnapshot},
    },
    dynamics::{
        motor::{angle_about_anchor, MotorDriver},
        solver::{ConstraintSolver, SolverStepMetrics},
    },
    error::{LinkageError, Result},
    kinematics::{
        chain::{find_chain, ChainPathFinder, KinematicChain},
        ik::{FabrikConfig, FabrikSolver, IkReport},
    },
    synthesis::four_bar::{FourBar, FourBarLengths, FourBarOptions, FourBarSynthesizer},
    utils::{
        arena::{Arena, ConstraintId, JointId},
        logging::warn_if_frame_budget_exceeded,
        profiling::{FrameProfiler, FrameSection, SectionTimer},
    },
};

pub use clock::FrameClock;
pub use trace::TraceRecorder;

/// Chain, target and on/off state of the interactive IK drive.
#[derive(Debug, Clone, Default)]
pub struct IkSession {
    pub chain: Option<KinematicChain>,
    pub target: Option<DVec2>,
    pub active: bool,
}

/// A simulation session: owns every joint and link and steps them frame by frame.
pub struct LinkageWorld {
    joints: Arena<JointId, Joint>,
    constraints: Arena<ConstraintId, Constraint>,
    config: SimulationConfig,
    motors: MotorDriver,
    ik: IkSession,
    trace: TraceRecorder,
    four_bar: Option<FourBar>,
    profiler: FrameProfiler,
}

impl Default for LinkageWorld {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl LinkageWorld {
    pub fn new(config: SimulationConfig) -> Self {
        let mut trace = TraceRecorder::new(
            ConstraintId(config.trace_constraint),
            config.trace_fraction,
            config.trace_capacity,
        );
        trace.enabled = config.trace_enabled;

        Self {
            joints: Arena::new(),
            constraints: Arena::new(),
            config,
            motors: MotorDriver::new(),
            ik: IkSession::default(),
            trace,
            four_bar: None,
            profiler: FrameProfiler::default(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    pub fn joints(&self) -> &Arena<JointId, Joint> {
        &self.joints
    }

    pub fn constraints(&self) -> &Arena<ConstraintId, Constraint> {
        &self.constraints
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn joint_position(&self, id: JointId) -> Option<DVec2> {
        self.joints.get(id).map(|joint| joint.position)
    }

    /// Live distance between the two endpoints of a link.
    pub fn link_length(&self, id: ConstraintId) -> Option<f64> {
        let constraint = self.constraints.get(id)?;
        let a = self.joints.get(constraint.joint_a)?;
        let b = self.joints.get(constraint.joint_b)?;
        Some(a.position.distance(b.position))
    }

    pub fn profiler(&self) -> &FrameProfiler {
        &self.profiler
    }

    pub fn trace(&self) -> &TraceRecorder {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut TraceRecorder {
        &mut self.trace
    }

    pub fn ik_session(&self) -> &IkSession {
        &self.ik
    }

    pub fn four_bar(&self) -> Option<&FourBar> {
        self.four_bar.as_ref()
    }

    // ----- model editing -----

    pub fn add_joint(&mut self, position: DVec2) -> JointId {
        let id = self.joints.insert(Joint::new(position));
        debug!("added {id} at {position}");
        id
    }

    /// Links two joints at their current distance.
    pub fn add_constraint(&mut self, a: JointId, b: JointId) -> Result<ConstraintId> {
        if a == b {
            return Err(LinkageError::SelfLink(a));
        }
        let pa = self.joint_position(a).ok_or(LinkageError::UnknownJoint(a))?;
        let pb = self.joint_position(b).ok_or(LinkageError::UnknownJoint(b))?;
        if self.constraints.values().any(|c| c.connects(a, b)) {
            return Err(LinkageError::DuplicateLink(a, b));
        }
        let id = self.constraints.insert(Constraint::new(a, b, pa.distance(pb)));
        debug!("added {id} between {a} and {b}");
        Ok(id)
    }

    pub fn set_rest_length(&mut self, id: ConstraintId, rest_length: f64) -> Result<()> {
        self.constraints
            .get_mut(id)
            .ok_or(LinkageError::UnknownConstraint(id))?
            .set_rest_length(rest_length);
        Ok(())
    }

    pub fn set_locked(&mut self, id: JointId, locked: bool) -> Result<()> {
        self.joint_mut(id)?.locked = locked;
        Ok(())
    }

    /// Flips the ground flag, returning the new state.
    pub fn toggle_locked(&mut self, id: JointId) -> Result<bool> {
        let joint = self.joint_mut(id)?;
        joint.locked = !joint.locked;
        Ok(joint.locked)
    }

    /// Turns a joint's motor on (orbiting the world origin) or off.
    pub fn set_motor(&mut self, id: JointId, enabled: bool, speed_deg_per_sec: f64) -> Result<()> {
        let angle = angle_about_anchor(&self.joints, id, MotorAnchor::World);
        let joint = self.joint_mut(id)?;
        joint.motor = enabled.then(|| Motor {
            angle,
            ..Motor::new(speed_deg_per_sec)
        });
        Ok(())
    }

    pub fn set_motor_anchor(&mut self, id: JointId, anchor: MotorAnchor) -> Result<()> {
        if let MotorAnchor::Joint(anchor_id) = anchor {
            if !self.joints.contains(anchor_id) {
                warn!("{id} anchored to unknown {anchor_id}; it will orbit the world origin");
            }
        }
        let angle = angle_about_anchor(&self.joints, id, anchor);
        if let Some(motor) = self.joint_mut(id)?.motor.as_mut() {
            motor.anchor = anchor;
            motor.angle = angle;
        }
        Ok(())
    }

    /// Retunes every motor in the model.
    pub fn set_motor_speed_all(&mut self, speed_deg_per_sec: f64) {
        for (_, joint) in self.joints.iter_mut() {
            if let Some(motor) = joint.motor.as_mut() {
                motor.set_speed_deg(speed_deg_per_sec);
            }
        }
    }

    /// The world origin followed by every joint directly linked to `id`.
    pub fn anchor_candidates(&self, id: JointId) -> Result<Vec<MotorAnchor>> {
        if !self.joints.contains(id) {
            return Err(LinkageError::UnknownJoint(id));
        }
        let mut candidates = vec![MotorAnchor::World];
        for neighbor in ChainPathFinder::new(&self.constraints).neighbors(id) {
            let anchor = MotorAnchor::Joint(*neighbor);
            if !candidates.contains(&anchor) {
                candidates.push(anchor);
            }
        }
        Ok(candidates)
    }

    /// Moves a free joint to `position` and runs a reduced relaxation pass.
    ///
    /// Returns `false` when the joint is locked and nothing moved.
    pub fn drag_joint(&mut self, id: JointId, position: DVec2) -> Result<bool> {
        let joint = self.joint_mut(id)?;
        if joint.locked {
            return Ok(false);
        }
        joint.position = position;
        let iterations = self.config.drag_iterations();
        ConstraintSolver::relax(&mut self.joints, &self.constraints, iterations);
        Ok(true)
    }

    /// Drops every joint, link, trace sample, IK session and four-bar record.
    pub fn clear(&mut self) {
        self.joints.clear();
        self.constraints.clear();
        self.trace.clear();
        self.ik = IkSession::default();
        self.four_bar = None;
        self.profiler.reset();
    }

    pub fn solve_constraints(&mut self, iterations: u32) -> SolverStepMetrics {
        ConstraintSolver::relax(&mut self.joints, &self.constraints, iterations)
    }

    // ----- frame stepping -----

    /// Runs one frame: motors, relaxation, IK with a settle pass, then trace.
    ///
    /// `dt` is clamped into `[0, max_frame_dt]`.
    pub fn step_frame(&mut self, dt: f64) {
        let frame_start = Instant::now();
        let dt = dt.clamp(0.0, self.config.max_frame_dt);
        let mut profiler = FrameProfiler::default();
        let mut ik_ran = false;

        {
            let _t = SectionTimer::new(&mut profiler, FrameSection::Motors);
            self.motors.apply(&mut self.joints, dt);
        }

        {
            let _t = SectionTimer::new(&mut profiler, FrameSection::Solver);
            ConstraintSolver::new(self.config.solver_iterations)
                .solve(&mut self.joints, &self.constraints);
        }

        if self.ik.active {
            if let (Some(chain), Some(target)) = (self.ik.chain.as_ref(), self.ik.target) {
                let _t = SectionTimer::new(&mut profiler, FrameSection::Ik);
                let solver = FabrikSolver::new(FabrikConfig {
                    tolerance: self.config.ik_tolerance,
                    max_iterations: self.config.ik_frame_iterations,
                });
                match solver.solve(&mut self.joints, chain.joints(), target) {
                    Ok(_) => {
                        ConstraintSolver::relax(
                            &mut self.joints,
                            &self.constraints,
                            self.config.settle_iterations,
                        );
                        ik_ran = true;
                    }
                    Err(err) => debug!("skipping IK this frame: {err}"),
                }
            }
        }

        {
            let _t = SectionTimer::new(&mut profiler, FrameSection::Trace);
            self.trace.sample(&self.joints, &self.constraints);
        }

        profiler.ik_ran = ik_ran;
        profiler.total_frame_time = frame_start.elapsed();
        profiler.joint_count = self.joints.len();
        profiler.constraint_count = self.constraints.len();
        profiler.trace_len = self.trace.len();
        trace!(
            "frame dt {dt:.4}: {} joints, {} links, ik {ik_ran}",
            profiler.joint_count,
            profiler.constraint_count
        );
        warn_if_frame_budget_exceeded(profiler.total_frame_time, self.config.frame_budget_ms);
        self.profiler = profiler;
    }

    /// Single manual step at the fixed step delta.
    pub fn step_once(&mut self) {
        self.step_frame(DEFAULT_STEP_DT);
    }

    // ----- inverse kinematics -----

    pub fn build_ik_chain(&self, start: JointId, end: JointId) -> Result<KinematicChain> {
        for id in [start, end] {
            if !self.joints.contains(id) {
                return Err(LinkageError::UnknownJoint(id));
            }
        }
        let chain = find_chain(&self.constraints, start, end)?;
        debug!("IK chain {start} → {end}: {} joints", chain.len());
        Ok(chain)
    }

    pub fn set_ik_chain(&mut self, chain: KinematicChain) -> Result<()> {
        if chain.len() < 2 {
            return Err(LinkageError::ChainTooShort(chain.len()));
        }
        if let Some(missing) = chain.joints().iter().find(|id| !self.joints.contains(**id)) {
            return Err(LinkageError::UnknownJoint(*missing));
        }
        self.ik.chain = Some(chain);
        Ok(())
    }

    /// Places the IK target; with a chain set the chain reaches for it at once.
    pub fn set_ik_target(&mut self, target: DVec2) -> Option<IkReport> {
        self.ik.target = Some(target);
        if self.ik.chain.is_none() {
            return None;
        }
        self.reach_ik_target().ok()
    }

    /// Solves the session chain toward the session target with the
    /// placement iteration budget.
    pub fn reach_ik_target(&mut self) -> Result<IkReport> {
        let chain = self.ik.chain.as_ref().ok_or(LinkageError::IkChainNotSet)?;
        let target = self.ik.target.ok_or(LinkageError::IkTargetNotSet)?;
        let solver = FabrikSolver::new(FabrikConfig {
            tolerance: self.config.ik_tolerance,
            max_iterations: self.config.ik_placement_iterations,
        });
        solver.solve(&mut self.joints, chain.joints(), target)
    }

    pub fn start_ik(&mut self) -> Result<()> {
        if self.ik.chain.is_none() {
            return Err(LinkageError::IkChainNotSet);
        }
        self.ik.active = true;
        Ok(())
    }

    pub fn stop_ik(&mut self) {
        self.ik.active = false;
    }

    pub fn ik_active(&self) -> bool {
        self.ik.active
    }

    /// One-off FABRIK solve of `chain` toward `target`.
    pub fn solve_ik(
        &mut self,
        chain: &KinematicChain,
        target: DVec2,
        tolerance: f64,
        max_iterations: u32,
    ) -> Result<IkReport> {
        FabrikSolver::new(FabrikConfig {
            tolerance,
            max_iterations,
        })
        .solve(&mut self.joints, chain.joints(), target)
    }

    // ----- four-bar -----

    fn synthesizer(&self) -> FourBarSynthesizer {
        FourBarSynthesizer::new(self.config.grashof_attempts, self.config.grashof_nudge)
    }

    /// Synthesis options built from the session config.
    pub fn four_bar_options(&self) -> FourBarOptions {
        FourBarOptions {
            enforce_grashof: true,
            crank_speed_deg: self.config.motor_speed_deg,
            origin: self.config.four_bar_origin,
        }
    }

    /// Replaces the model with a crank-rocker laid out from `lengths`.
    pub fn synthesize_four_bar(
        &mut self,
        lengths: FourBarLengths,
        options: FourBarOptions,
    ) -> FourBar {
        self.clear();
        let four_bar = self
            .synthesizer()
            .build(&mut self.joints, &mut self.constraints, lengths, options);
        self.four_bar = Some(four_bar.clone());
        four_bar
    }

    /// Re-lays the current four-bar for new lengths.
    pub fn update_four_bar(
        &mut self,
        lengths: FourBarLengths,
        crank_speed_deg: Option<f64>,
    ) -> Result<()> {
        let synthesizer = self.synthesizer();
        let settle = self.config.settle_iterations;
        let four_bar = self.four_bar.as_mut().ok_or(LinkageError::NotAFourBar)?;
        synthesizer.update(
            &mut self.joints,
            &mut self.constraints,
            four_bar,
            lengths,
            crank_speed_deg,
            settle,
        )
    }

    // ----- persistence shape -----

    pub fn snapshot(&self) -> LinkageSnapshot {
        LinkageSnapshot {
            joints: self.joints.values().map(JointRecord::from_joint).collect(),
            constraints: self
                .constraints
                .values()
                .map(ConstraintRecord::from_constraint)
                .collect(),
        }
    }

    /// Rebuilds a session from its persisted records.
    pub fn from_snapshot(snapshot: &LinkageSnapshot, config: SimulationConfig) -> Result<Self> {
        let mut world = Self::new(config);
        for record in &snapshot.joints {
            world.joints.insert(record.to_joint());
        }

        for (index, record) in snapshot.constraints.iter().enumerate() {
            let (a, b) = (JointId(record.a), JointId(record.b));
            let (Some(pa), Some(pb)) = (world.joint_position(a), world.joint_position(b)) else {
                return Err(LinkageError::InvalidSnapshot(format!(
                    "link {index} references a missing joint ({} - {})",
                    record.a, record.b
                )));
            };
            if a == b {
                return Err(LinkageError::InvalidSnapshot(format!(
                    "link {index} joins joint {} to itself",
                    record.a
                )));
            }
            if world.constraints.values().any(|c| c.connects(a, b)) {
                return Err(LinkageError::InvalidSnapshot(format!(
                    "link {index} duplicates the pair {} - {}",
                    record.a, record.b
                )));
            }
            let rest = record.rest.unwrap_or_else(|| pa.distance(pb));
            world.constraints.insert(Constraint::new(a, b, rest));
        }

        for id in world.joints.ids().collect::<Vec<_>>() {
            let Some(anchor) = world.joints.get(id).and_then(|j| j.motor).map(|m| m.anchor) else {
                continue;
            };
            let angle = angle_about_anchor(&world.joints, id, anchor);
            if let Some(motor) = world.joints.get_mut(id).and_then(|j| j.motor.as_mut()) {
                motor.angle = angle;
            }
        }

        world.four_bar = FourBar::recognize(&world.joints, &world.constraints);
        debug!(
            "rehydrated {} joints, {} links",
            world.joints.len(),
            world.constraints.len()
        );
        Ok(world)
    }

    fn joint_mut(&mut self, id: JointId) -> Result<&mut Joint> {
        self.joints.get_mut(id).ok_or(LinkageError::UnknownJoint(id))
    }
}
