//! Single-threaded frame scheduler
//!
//! The host calls `FrameLoop::tick` once per display refresh. Each task runs
//! once per tick until its `CancellationToken` is cancelled or it returns
//! `ControlFlow::Break`.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use tracing::{debug, trace};

use super::surface::Surface;

/// Longest frame delta handed to tasks (seconds). Backgrounded tabs and
/// debugger pauses would otherwise produce one giant step.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Shared cancellation flag between a frame task and its owner
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Timing info passed to each task
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Monotonic clock, seconds
    pub now: f64,
    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DELTA]`
    pub delta: f64,
}

type Task = Box<dyn FnMut(&mut dyn Surface, FrameTime) -> ControlFlow<()>>;

struct Scheduled {
    id: u64,
    token: CancellationToken,
    run: Task,
}

/// Frame-driven task runner
#[derive(Default)]
pub struct FrameLoop {
    tasks: Vec<Scheduled>,
    next_id: u64,
    last_tick: Option<f64>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to run on every tick. Cancel the returned token to
    /// stop it; the task is dropped on the next tick.
    pub fn spawn<F>(&mut self, task: F) -> CancellationToken
    where
        F: FnMut(&mut dyn Surface, FrameTime) -> ControlFlow<()> + 'static,
    {
        let token = CancellationToken::new();
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            token: token.clone(),
            run: Box::new(task),
        });
        debug!(task_id = id, live = self.tasks.len(), "Frame task scheduled");
        token
    }

    /// Run every live task once, in spawn order
    pub fn tick(&mut self, surface: &mut dyn Surface, now: f64) {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_DELTA));
        self.last_tick = Some(now);
        self.frames += 1;

        let time = FrameTime { now, delta };
        self.tasks.retain_mut(|task| {
            if task.token.is_cancelled() {
                trace!(task_id = task.id, "Dropping cancelled frame task");
                return false;
            }
            match (task.run)(&mut *surface, time) {
                ControlFlow::Continue(()) => true,
                ControlFlow::Break(()) => {
                    trace!(task_id = task.id, "Frame task finished");
                    false
                }
            }
        });
    }

    /// Number of tasks that will run on the next tick
    pub fn live_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.token.is_cancelled()).count()
    }

    pub fn is_idle(&self) -> bool {
        self.live_tasks() == 0
    }

    /// Ticks processed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
