use std::time::{Duration, Instant};

/// Timing and size figures for the most recent simulated frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameProfiler {
    pub motor_time: Duration,
    pub solver_time: Duration,
    pub ik_time: Duration,
    pub trace_time: Duration,
    pub total_frame_time: Duration,

    pub joint_count: usize,
    pub constraint_count: usize,
    pub trace_len: usize,
    pub ik_ran: bool,
}

impl FrameProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_frame_time.as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "frame: joints {}, links {}, trace {}, ik {}",
            self.joint_count,
            self.constraint_count,
            self.trace_len,
            self.ik_ran
        );
        log::debug!(
            "  total {:.3} ms | motors {:.1}% | solver {:.1}% | ik {:.1}% | trace {:.1}%",
            self.total_frame_time.as_secs_f64() * 1000.0,
            share(self.motor_time, total_us),
            share(self.solver_time, total_us),
            share(self.ik_time, total_us),
            share(self.trace_time, total_us),
        );
    }
}

fn share(section: Duration, total_us: f64) -> f64 {
    section.as_micros() as f64 / total_us * 100.0
}

/// The stages of a frame, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSection {
    Motors,
    Solver,
    Ik,
    Trace,
}

impl FrameSection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Motors => "motors",
            Self::Solver => "solver",
            Self::Ik => "ik",
            Self::Trace => "trace",
        }
    }
}

impl FrameProfiler {
    pub fn section_time(&self, section: FrameSection) -> Duration {
        match section {
            FrameSection::Motors => self.motor_time,
            FrameSection::Solver => self.solver_time,
            FrameSection::Ik => self.ik_time,
            FrameSection::Trace => self.trace_time,
        }
    }

    fn section_time_mut(&mut self, section: FrameSection) -> &mut Duration {
        match section {
            FrameSection::Motors => &mut self.motor_time,
            FrameSection::Solver => &mut self.solver_time,
            FrameSection::Ik => &mut self.ik_time,
            FrameSection::Trace => &mut self.trace_time,
        }
    }
}

/// Charges the guard's lifetime to one frame section and traces it on drop.
pub struct SectionTimer<'a> {
    section: FrameSection,
    start: Instant,
    profiler: &'a mut FrameProfiler,
}

impl<'a> SectionTimer<'a> {
    pub fn new(profiler: &'a mut FrameProfiler, section: FrameSection) -> Self {
        Self {
            section,
            start: Instant::now(),
            profiler,
        }
    }
}

impl Drop for SectionTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.profiler.section_time_mut(self.section) += elapsed;
        log::trace!("{} took {} µs", self.section.label(), elapsed.as_micros());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_charges_only_its_own_section() {
        let mut profiler = FrameProfiler::default();
        {
            let _timer = SectionTimer::new(&mut profiler, FrameSection::Solver);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(profiler.section_time(FrameSection::Solver) >= Duration::from_millis(2));
        assert_eq!(profiler.section_time(FrameSection::Motors), Duration::ZERO);
        assert_eq!(profiler.section_time(FrameSection::Ik), Duration::ZERO);
    }
}
