//! Running/Stopped frame loop over a host frame scheduler.
//!
//! The host owns the actual callback (for browsers, a
//! `requestAnimationFrame` closure) and forwards each firing to
//! [`FrameLoop::on_frame`]. The loop decides whether that firing does any
//! work, computes the frame step from timestamps, and asks for the next one.

use crate::engine::Engine;
use crate::field::clamp_step;
use crate::render::Painter;

/// Milliseconds in one nominal 60 Hz frame.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Host primitive that calls back once per display frame.
pub trait FrameScheduler {
    type Handle;

    /// Requests one callback. `None` when the host cannot schedule.
    fn request(&mut self) -> Option<Self::Handle>;

    /// Cancels a pending request so it never fires.
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<S::Handle>,
    last_timestamp: Option<f64>,
    visible: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Stopped,
            pending: None,
            last_timestamp: None,
            visible: true,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Stopped → Running, requesting the first frame. No-op when running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.last_timestamp = None;
        self.schedule();
    }

    /// Handles one scheduler callback fired at `timestamp` milliseconds.
    ///
    /// Returns `false` without touching the engine when the loop is stopped
    /// or hidden, which makes a callback that outlived [`Self::stop`]
    /// harmless. The first frame after a (re)start counts as one nominal
    /// frame.
    pub fn on_frame(&mut self, timestamp: f64, engine: &mut dyn Engine, painter: &mut dyn Painter) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        // The handle that fired is spent.
        self.pending = None;
        if !self.visible {
            return false;
        }

        let dt = match self.last_timestamp {
            Some(last) => clamp_step((timestamp - last) / NOMINAL_FRAME_MS),
            None => 1.0,
        };
        self.last_timestamp = Some(timestamp);

        engine.frame(dt, painter);
        self.schedule();
        true
    }

    /// Running → Stopped, cancelling the pending request.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.last_timestamp = None;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Hidden pages stop requesting frames; the clock restarts on return so
    /// the first visible frame is not one giant step.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.last_timestamp = None;
        if visible {
            if self.state == LoopState::Running && self.pending.is_none() {
                self.schedule();
            }
        } else if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn schedule(&mut self) {
        if self.pending.is_some() || !self.visible {
            return;
        }
        self.pending = self.scheduler.request();
        if self.pending.is_none() {
            log::warn!("frame scheduler refused a request; loop is idle");
        }
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::event::InputEvent;
    use crate::render::RecordingPainter;
    use crate::surface::Surface;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Ledger {
        next: u32,
        outstanding: Vec<u32>,
        cancelled: Vec<u32>,
        refuse: bool,
    }

    /// Scheduler whose bookkeeping stays visible after the loop takes it.
    #[derive(Clone, Default)]
    struct ManualScheduler(Rc<RefCell<Ledger>>);

    impl FrameScheduler for ManualScheduler {
        type Handle = u32;

        fn request(&mut self) -> Option<u32> {
            let mut ledger = self.0.borrow_mut();
            if ledger.refuse {
                return None;
            }
            ledger.next += 1;
            let id = ledger.next;
            ledger.outstanding.push(id);
            Some(id)
        }

        fn cancel(&mut self, handle: u32) {
            let mut ledger = self.0.borrow_mut();
            ledger.outstanding.retain(|&h| h != handle);
            ledger.cancelled.push(handle);
        }
    }

    #[derive(Default)]
    struct CountingEngine {
        steps: Vec<f64>,
    }

    impl Engine for CountingEngine {
        fn handle(&mut self, _event: &InputEvent) {}

        fn step(&mut self, dt: f64) {
            self.steps.push(dt);
        }

        fn render(&self, painter: &mut dyn Painter) {
            painter.clear(Srgb::BLACK);
        }

        fn particle_count(&self) -> usize {
            0
        }

        fn surface(&self) -> Surface {
            Surface::default()
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn setup() -> (FrameLoop<ManualScheduler>, Rc<RefCell<Ledger>>) {
        let scheduler = ManualScheduler::default();
        let ledger = Rc::clone(&scheduler.0);
        (FrameLoop::new(scheduler), ledger)
    }

    #[test]
    fn starts_stopped_with_nothing_scheduled() {
        let (frames, ledger) = setup();
        assert_eq!(frames.state(), LoopState::Stopped);
        assert!(ledger.borrow().outstanding.is_empty());
    }

    #[test]
    fn start_requests_exactly_one_frame() {
        let (mut frames, ledger) = setup();
        frames.start();
        frames.start();
        assert!(frames.is_running());
        assert_eq!(ledger.borrow().outstanding, vec![1]);
    }

    #[test]
    fn each_frame_runs_engine_and_reschedules() {
        let (mut frames, ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        assert!(frames.on_frame(1000.0, &mut engine, &mut painter));
        assert!(frames.on_frame(1000.0 + NOMINAL_FRAME_MS * 2.0, &mut engine, &mut painter));
        assert_eq!(engine.steps.len(), 2);
        assert_eq!(engine.steps[0], 1.0);
        assert!((engine.steps[1] - 2.0).abs() < 1e-9);
        assert_eq!(painter.clears.len(), 2);
        assert_eq!(ledger.borrow().next, 3);
    }

    #[test]
    fn long_stall_is_clamped() {
        let (mut frames, _ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.on_frame(0.0, &mut engine, &mut painter);
        frames.on_frame(60_000.0, &mut engine, &mut painter);
        frames.on_frame(59_000.0, &mut engine, &mut painter);
        assert_eq!(engine.steps, vec![1.0, crate::field::MAX_FRAME_STEP, 0.0]);
    }

    #[test]
    fn stop_cancels_the_pending_handle_exactly() {
        let (mut frames, ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.on_frame(0.0, &mut engine, &mut painter);
        frames.stop();
        let ledger = ledger.borrow();
        assert_eq!(ledger.cancelled, vec![2]);
        assert!(ledger.outstanding.contains(&1), "the fired handle is not cancelled");
        assert!(!ledger.outstanding.contains(&2));
    }

    #[test]
    fn stray_callback_after_stop_is_a_no_op() {
        let (mut frames, ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.stop();
        assert!(!frames.on_frame(16.0, &mut engine, &mut painter));
        assert!(engine.steps.is_empty());
        assert!(painter.clears.is_empty());
        assert_eq!(ledger.borrow().next, 1, "nothing rescheduled");
    }

    #[test]
    fn hidden_loop_pauses_and_resumes() {
        let (mut frames, ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.on_frame(0.0, &mut engine, &mut painter);
        frames.set_visible(false);
        assert!(!frames.has_pending());
        assert_eq!(ledger.borrow().cancelled, vec![2]);

        frames.set_visible(true);
        assert!(frames.has_pending());
        frames.on_frame(90_000.0, &mut engine, &mut painter);
        // Clock was reset: no giant step after coming back.
        assert_eq!(engine.steps, vec![1.0, 1.0]);
    }

    #[test]
    fn callback_while_hidden_does_not_reschedule() {
        let (mut frames, ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.set_visible(false);
        assert!(!frames.on_frame(16.0, &mut engine, &mut painter));
        assert!(engine.steps.is_empty());
        assert_eq!(ledger.borrow().next, 1);
    }

    #[test]
    fn refused_request_leaves_loop_idle() {
        let (mut frames, ledger) = setup();
        ledger.borrow_mut().refuse = true;
        frames.start();
        assert!(frames.is_running());
        assert!(!frames.has_pending());
    }

    #[test]
    fn drop_cancels_pending() {
        let (mut frames, ledger) = setup();
        frames.start();
        drop(frames);
        assert_eq!(ledger.borrow().cancelled, vec![1]);
        assert!(ledger.borrow().outstanding.is_empty());
    }

    #[test]
    fn restart_after_stop_counts_first_frame_as_nominal() {
        let (mut frames, _ledger) = setup();
        let mut engine = CountingEngine::default();
        let mut painter = RecordingPainter::new();
        frames.start();
        frames.on_frame(0.0, &mut engine, &mut painter);
        frames.stop();
        frames.start();
        frames.on_frame(50_000.0, &mut engine, &mut painter);
        assert_eq!(engine.steps, vec![1.0, 1.0]);
    }
}
