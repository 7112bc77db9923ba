//! Mount lifecycle shared by hosts: listener guards and teardown.
//!
//! A host attaches every subscription through [`Mount::listen`], which
//! wraps it in a [`Listener`] that detaches itself on drop. The mounted
//! state sits behind a shared cell so host callbacks can reach it;
//! [`Mount::unmount`] stops the frame loop (cancelling the pending frame),
//! empties that cell so late callbacks find nothing, and drops every guard.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::Engine;
use crate::frame::{FrameLoop, FrameScheduler};
use crate::render::Painter;

/// Something host events can be subscribed on (a DOM `EventTarget`).
pub trait ListenerTarget {
    type Callback;
    type Error;

    fn add_listener(&self, kind: &'static str, callback: &Self::Callback) -> Result<(), Self::Error>;

    /// Failures are the implementor's to log; a guard cannot report them.
    fn remove_listener(&self, kind: &'static str, callback: &Self::Callback);
}

/// An attached listener, removed again on drop.
pub struct Listener<T: ListenerTarget> {
    target: T,
    kind: &'static str,
    callback: T::Callback,
}

impl<T: ListenerTarget> Listener<T> {
    pub fn attach(target: T, kind: &'static str, callback: T::Callback) -> Result<Self, T::Error> {
        target.add_listener(kind, &callback)?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<T: ListenerTarget> Drop for Listener<T> {
    fn drop(&mut self) {
        self.target.remove_listener(self.kind, &self.callback);
    }
}

/// Everything that lives between mount and unmount.
pub struct Mounted<E, P, S: FrameScheduler> {
    pub engine: E,
    pub painter: P,
    pub frames: FrameLoop<S>,
}

impl<E: Engine, P: Painter, S: FrameScheduler> Mounted<E, P, S> {
    /// Forwards one scheduler firing to the frame loop.
    pub fn on_frame(&mut self, timestamp: f64) -> bool {
        self.frames
            .on_frame(timestamp, &mut self.engine, &mut self.painter)
    }
}

pub type SharedMount<E, P, S> = Rc<RefCell<Option<Mounted<E, P, S>>>>;

/// Runs `f` against the mounted state. `None` once unmounted, or while the
/// state is already borrowed by an outer callback.
pub fn with_mounted<E, P, S: FrameScheduler, R>(
    state: &SharedMount<E, P, S>,
    f: impl FnOnce(&mut Mounted<E, P, S>) -> R,
) -> Option<R> {
    let mut guard = state.try_borrow_mut().ok()?;
    guard.as_mut().map(f)
}

/// A mounted engine plus the listeners feeding it. Dropping it unmounts.
pub struct Mount<E, P, S: FrameScheduler, T: ListenerTarget> {
    state: SharedMount<E, P, S>,
    listeners: Vec<Listener<T>>,
}

impl<E, P, S: FrameScheduler, T: ListenerTarget> Mount<E, P, S, T> {
    /// Mounts with the loop stopped and nothing attached yet.
    pub fn new(engine: E, painter: P, scheduler: S) -> Self {
        Self {
            state: Rc::new(RefCell::new(Some(Mounted {
                engine,
                painter,
                frames: FrameLoop::new(scheduler),
            }))),
            listeners: Vec::new(),
        }
    }

    /// Handle for callbacks; it goes empty on unmount.
    pub fn state(&self) -> SharedMount<E, P, S> {
        Rc::clone(&self.state)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Mounted<E, P, S>) -> R) -> Option<R> {
        with_mounted(&self.state, f)
    }

    pub fn listen(&mut self, target: T, kind: &'static str, callback: T::Callback) -> Result<(), T::Error> {
        self.listeners.push(Listener::attach(target, kind, callback)?);
        Ok(())
    }

    /// Starts the frame loop; a hidden host waits for visibility first.
    pub fn start(&self, visible: bool) {
        self.with(|m| {
            m.frames.set_visible(visible);
            m.frames.start();
        });
    }

    pub fn is_mounted(&self) -> bool {
        self.state.try_borrow().map_or(true, |guard| guard.is_some())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Stops the loop, releases the mounted state and detaches every
    /// listener. Returns whether anything was still mounted.
    pub fn unmount(&mut self) -> bool {
        let released = match self.state.try_borrow_mut() {
            Ok(mut guard) => guard.take(),
            Err(_) => {
                log::warn!("unmount during a callback; state released on drop");
                None
            }
        };
        let was_mounted = released.is_some();
        if let Some(mut mounted) = released {
            mounted.frames.stop();
        }
        self.listeners.clear();
        was_mounted
    }
}

impl<E, P, S: FrameScheduler, T: ListenerTarget> Drop for Mount<E, P, S, T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
