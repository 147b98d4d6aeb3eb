//! Fixed-rate repeating task standing in for a display refresh callback.

use super::cancel::CancelHandle;
use std::ops::ControlFlow;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Timing information handed to each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based tick number.
    pub index: u64,
    /// Time since the loop started.
    pub elapsed: Duration,
    /// Time since the previous tick started.
    pub delta: Duration,
}

/// Runs a callback once per refresh interval until cancelled.
///
/// Ticks never overlap: the next deadline is set only after the current tick
/// returns. A tick that overruns its slot makes the next one run immediately;
/// missed slots are dropped rather than replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    interval: Duration,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameLoop {
    /// Creates a loop ticking `fps` times per second (at least once).
    pub fn new(fps: u32) -> Self {
        Self::with_interval(Duration::from_secs(1) / fps.max(1))
    }

    /// Creates a loop with an explicit interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// Time between tick starts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs ticks on the current thread until `cancel` fires or `tick`
    /// breaks. Returns the number of ticks run.
    pub fn run<F>(&self, cancel: &CancelHandle, mut tick: F) -> u64
    where
        F: FnMut(&FrameTick) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let mut next = start;
        let mut last = start;
        let mut index = 0;

        while !cancel.is_cancelled() {
            let now = Instant::now();
            if now < next {
                thread::sleep(next - now);
                continue;
            }

            let frame = FrameTick {
                index,
                elapsed: now - start,
                delta: now - last,
            };
            last = now;
            index += 1;

            if tick(&frame).is_break() {
                break;
            }
            next = (next + self.interval).max(Instant::now());
        }

        tracing::debug!(ticks = index, "Frame loop finished");
        index
    }

    /// Moves `state` onto a worker thread and runs ticks there.
    ///
    /// The returned handle cancels and joins the worker when stopped or
    /// dropped, so no tick runs after teardown returns.
    pub fn spawn<S, F>(&self, mut state: S, mut tick: F) -> LoopHandle<S>
    where
        S: Send + 'static,
        F: FnMut(&mut S, &FrameTick) -> ControlFlow<()> + Send + 'static,
    {
        let cancel = CancelHandle::new();
        let worker_cancel = cancel.clone();
        let frame_loop = *self;

        let thread = thread::spawn(move || {
            frame_loop.run(&worker_cancel, |frame| tick(&mut state, frame));
            state
        });

        LoopHandle {
            cancel,
            thread: Some(thread),
        }
    }
}

/// Cancellation handle for a spawned [`FrameLoop`].
#[derive(Debug)]
pub struct LoopHandle<S> {
    cancel: CancelHandle,
    thread: Option<JoinHandle<S>>,
}

impl<S> LoopHandle<S> {
    /// A clone of the loop's cancellation flag.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Returns true once the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancels the loop, waits for the in-flight tick to finish and returns
    /// the state. Returns `None` if the worker panicked.
    pub fn stop(mut self) -> Option<S> {
        self.cancel.cancel();
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(state) => Some(state),
            Err(_) => {
                tracing::error!("Frame loop worker panicked");
                None
            }
        }
    }
}

impl<S> Drop for LoopHandle<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_until_break() {
        let frame_loop = FrameLoop::with_interval(Duration::from_millis(1));
        let mut seen = Vec::new();

        let ticks = frame_loop.run(&CancelHandle::new(), |frame| {
            seen.push(frame.index);
            if frame.index == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(ticks, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel_before_run() {
        let cancel = CancelHandle::new();
        cancel.cancel();
        let ticks = FrameLoop::default().run(&cancel, |_| ControlFlow::Continue(()));
        assert_eq!(ticks, 0);
    }

    #[test]
    fn test_cancel_from_inside_tick() {
        let cancel = CancelHandle::new();
        let inner = cancel.clone();
        let ticks = FrameLoop::with_interval(Duration::ZERO).run(&cancel, |frame| {
            if frame.index == 2 {
                inner.cancel();
            }
            ControlFlow::Continue(())
        });
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_spawn_and_stop_returns_state() {
        let handle = FrameLoop::with_interval(Duration::from_millis(1))
            .spawn(0u64, |count, _| {
                *count += 1;
                ControlFlow::Continue(())
            });

        thread::sleep(Duration::from_millis(20));
        let count = handle.stop().unwrap();
        assert!(count > 0);
    }

    #[test]
    fn test_dropped_handle_stops_worker() {
        let cancel;
        {
            let handle = FrameLoop::with_interval(Duration::from_millis(1))
                .spawn((), |_, _| ControlFlow::Continue(()));
            cancel = handle.cancel_handle();
        }
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_rate_is_respected() {
        let frame_loop = FrameLoop::with_interval(Duration::from_millis(10));
        let start = Instant::now();
        frame_loop.run(&CancelHandle::new(), |frame| {
            if frame.index == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        // ticks at 0, 10, 20, 30 ms
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
