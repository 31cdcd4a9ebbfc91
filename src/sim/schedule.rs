//! Timing domains and cancellation handles
//!
//! A session runs on two independent clocks: the display frame (motion,
//! capture, spawning) and a one-second ticker (countdown, power-up expiry).
//! Each is a named task with at most one live handle. Arming always mints a
//! new generation, so a callback holding an old handle is recognised as stale
//! and a restart can never leave two chains running side by side.

/// Which clock a task runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Frame,
    Second,
}

/// Token a host passes back when its timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    kind: TaskKind,
    generation: u64,
}

impl TaskHandle {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Live task handles for one session
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    frame: Option<TaskHandle>,
    second: Option<TaskHandle>,
    generation: u64,
}

impl Schedule {
    fn slot(&mut self, kind: TaskKind) -> &mut Option<TaskHandle> {
        match kind {
            TaskKind::Frame => &mut self.frame,
            TaskKind::Second => &mut self.second,
        }
    }

    /// Arm (or re-arm) a task, invalidating any previous handle of that kind
    pub fn arm(&mut self, kind: TaskKind) -> TaskHandle {
        self.generation += 1;
        let handle = TaskHandle {
            kind,
            generation: self.generation,
        };
        *self.slot(kind) = Some(handle);
        handle
    }

    pub fn cancel(&mut self, kind: TaskKind) {
        *self.slot(kind) = None;
    }

    pub fn cancel_all(&mut self) {
        self.frame = None;
        self.second = None;
    }

    pub fn current(&self, kind: TaskKind) -> Option<TaskHandle> {
        match kind {
            TaskKind::Frame => self.frame,
            TaskKind::Second => self.second,
        }
    }

    /// Whether `handle` is the live handle for its kind
    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.current(handle.kind) == Some(handle)
    }
}

/// Fires once per `period` seconds of accumulated time
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    period: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt`, returning how many periods completed
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !(self.period > 0.0) || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
