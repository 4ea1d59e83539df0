//! Getting finished frames onto a screen.
//!
//! A [`DisplaySink`] accepts packed XRGB frames (top-left origin, row-major,
//! no padding) and says whether the application should keep rendering.
//!
//! [`FrontBufferSink`] runs a [`Presenter`] on its own thread. The renderer
//! publishes into a shared front buffer and blocks until the previous frame
//! has been presented, so a slow presenter throttles the renderer instead of
//! dropping frames. [`HeadlessSink`] keeps frames in memory for tests and
//! batch renders.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::error::DisplayError;

/// How long the presentation thread waits for a frame before pumping events.
pub const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub trait DisplaySink {
    /// Hand over one frame. Returns `false` once the display has closed; the
    /// caller should stop rendering.
    fn submit(&mut self, pixels: &[u32]) -> bool;

    /// Close the display. Later submits return `false`.
    fn shutdown(&mut self);
}

/// Something that can show frames, driven by a [`FrontBufferSink`].
///
/// Presenters are created on, and never leave, the presentation thread.
pub trait Presenter {
    /// Show a frame. `Ok(false)` asks to stop.
    fn present(&mut self, pixels: &[u32]) -> Result<bool, DisplayError>;

    /// Called while no frame is pending, e.g. to pump window events.
    /// Returning `false` asks to stop.
    fn poll(&mut self) -> bool {
        true
    }
}

struct FrontBuffer {
    pixels: Vec<u32>,
    pending: bool,
    closed: bool,
}

struct Shared {
    front: Mutex<FrontBuffer>,
    signal: Condvar,
}

impl Shared {
    fn close(&self) {
        let mut front = self.front.lock();
        front.closed = true;
        self.signal.notify_all();
    }
}

/// Display sink backed by a presentation thread and a single front buffer.
pub struct FrontBufferSink {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl FrontBufferSink {
    /// Start the presentation thread.
    ///
    /// `factory` runs on the new thread and builds the presenter. Its error,
    /// if any, is returned here.
    pub fn spawn<F, P>(width: u32, height: u32, factory: F) -> Result<Self, DisplayError>
    where
        F: FnOnce(u32, u32) -> Result<P, DisplayError> + Send + 'static,
        P: Presenter,
    {
        let shared = Arc::new(Shared {
            front: Mutex::new(FrontBuffer {
                pixels: vec![0; width as usize * height as usize],
                pending: false,
                closed: false,
            }),
            signal: Condvar::new(),
        });

        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), DisplayError>>(1);
        let thread_shared = Arc::clone(&shared);

        let thread = thread::Builder::new()
            .name("pixelforge-present".into())
            .spawn(move || {
                let presenter = match factory(width, height) {
                    Ok(presenter) => {
                        let _ = ready_tx.send(Ok(()));
                        presenter
                    }
                    Err(e) => {
                        thread_shared.close();
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                present_loop(&thread_shared, presenter);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                debug!(width, height, "presentation thread started");
                Ok(Self {
                    shared,
                    thread: Some(thread),
                    width,
                    height,
                })
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(DisplayError::Init(
                    "presentation thread exited during startup".into(),
                ))
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_closed(&self) -> bool {
        self.shared.front.lock().closed
    }
}

/// Closes the front buffer when dropped, including while unwinding from a
/// panicking presenter.
struct CloseOnDrop<'a>(&'a Shared);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
        debug!("presentation thread stopped");
    }
}

fn present_loop<P: Presenter>(shared: &Shared, mut presenter: P) {
    let _close = CloseOnDrop(shared);
    let mut back = Vec::new();

    loop {
        let has_frame = {
            let mut front = shared.front.lock();
            if !front.pending && !front.closed {
                shared.signal.wait_for(&mut front, POLL_INTERVAL);
            }
            if front.closed {
                break;
            }
            if front.pending {
                back.clear();
                back.extend_from_slice(&front.pixels);
            }
            front.pending
        };

        let keep_going = if has_frame {
            let keep_going = match presenter.present(&back) {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    warn!(error = %e, "presenter failed");
                    false
                }
            };

            // A waiting submit must see `closed` and `!pending` together.
            let mut front = shared.front.lock();
            front.pending = false;
            front.closed |= !keep_going;
            shared.signal.notify_all();
            keep_going
        } else {
            presenter.poll()
        };

        if !keep_going {
            break;
        }
    }
}

impl DisplaySink for FrontBufferSink {
    fn submit(&mut self, pixels: &[u32]) -> bool {
        let mut front = self.shared.front.lock();
        while front.pending && !front.closed {
            self.shared.signal.wait(&mut front);
        }
        if front.closed {
            return false;
        }
        if pixels.len() != front.pixels.len() {
            warn!(
                expected = front.pixels.len(),
                actual = pixels.len(),
                "dropping frame with wrong size"
            );
            return true;
        }

        front.pixels.copy_from_slice(pixels);
        front.pending = true;
        self.shared.signal.notify_all();
        true
    }

    fn shutdown(&mut self) {
        self.shared.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("presentation thread panicked");
            }
        }
    }
}

impl Drop for FrontBufferSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keeps frames in memory and stops after a fixed number of them.
#[derive(Debug, Clone)]
pub struct HeadlessSink {
    frame_limit: usize,
    frames: usize,
    last_frame: Vec<u32>,
    closed: bool,
}

impl HeadlessSink {
    /// A sink that asks to stop once `frame_limit` frames have been submitted.
    pub fn new(frame_limit: usize) -> Self {
        Self {
            frame_limit,
            frames: 0,
            last_frame: Vec::new(),
            closed: frame_limit == 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> &[u32] {
        &self.last_frame
    }
}

impl DisplaySink for HeadlessSink {
    fn submit(&mut self, pixels: &[u32]) -> bool {
        if self.closed {
            return false;
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(pixels);
        self.frames += 1;
        if self.frames >= self.frame_limit {
            debug!(frames = self.frames, "headless sink reached frame limit");
            self.closed = true;
        }
        !self.closed
    }

    fn shutdown(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Arc<Mutex<Vec<Vec<u32>>>>;

    /// Records every presented frame and stops after `limit` of them.
    struct Recorder {
        log: Log,
        limit: usize,
        delay: Duration,
    }

    impl Presenter for Recorder {
        fn present(&mut self, pixels: &[u32]) -> Result<bool, DisplayError> {
            thread::sleep(self.delay);
            let mut log = self.log.lock();
            log.push(pixels.to_vec());
            Ok(log.len() < self.limit)
        }
    }

    fn recorder_sink(limit: usize, delay: Duration) -> (FrontBufferSink, Log) {
        let log = Log::default();
        let thread_log = Arc::clone(&log);
        let sink = FrontBufferSink::spawn(2, 1, move |_, _| {
            Ok(Recorder {
                log: thread_log,
                limit,
                delay,
            })
        })
        .expect("spawn presenter");
        (sink, log)
    }

    #[test]
    fn every_submitted_frame_is_presented_in_order() {
        let (mut sink, log) = recorder_sink(3, Duration::from_millis(5));

        assert!(sink.submit(&[1, 1]));
        assert!(sink.submit(&[2, 2]));
        assert!(sink.submit(&[3, 3]));
        // The presenter stops after the third frame.
        assert!(!sink.submit(&[4, 4]));
        assert!(!sink.submit(&[5, 5]));
        assert!(sink.is_closed());

        sink.shutdown();
        assert_eq!(*log.lock(), vec![vec![1, 1], vec![2, 2], vec![3, 3]]);
    }

    #[test]
    fn submit_waits_for_previous_frame() {
        let (mut sink, log) = recorder_sink(usize::MAX, Duration::from_millis(20));

        assert!(sink.submit(&[7, 7]));
        assert!(sink.submit(&[8, 8]));
        // The second submit returns only after the first frame was presented.
        assert!(!log.lock().is_empty());

        sink.shutdown();
        assert!(!sink.submit(&[9, 9]));
    }

    #[test]
    fn factory_error_is_reported() {
        let result = FrontBufferSink::spawn(4, 4, |_, _| -> Result<Recorder, DisplayError> {
            Err(DisplayError::Init("no display".into()))
        });
        match result {
            Err(DisplayError::Init(msg)) => assert_eq!(msg, "no display"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("spawn should fail"),
        }
    }

    #[test]
    fn presenter_error_closes_sink() {
        struct Failing;
        impl Presenter for Failing {
            fn present(&mut self, _: &[u32]) -> Result<bool, DisplayError> {
                Err(DisplayError::Present("device lost".into()))
            }
        }

        let mut sink = FrontBufferSink::spawn(1, 1, |_, _| Ok(Failing)).expect("spawn presenter");
        assert!(sink.submit(&[0]));
        assert!(!sink.submit(&[0]));
    }

    #[test]
    fn presenter_panic_closes_sink() {
        struct Panicking;
        impl Presenter for Panicking {
            fn present(&mut self, _: &[u32]) -> Result<bool, DisplayError> {
                panic!("presenter blew up");
            }
        }

        let mut sink = FrontBufferSink::spawn(1, 1, |_, _| Ok(Panicking)).expect("spawn presenter");
        assert!(sink.submit(&[0]));
        assert!(!sink.submit(&[0]));
        assert!(sink.is_closed());
        sink.shutdown();
    }

    #[test]
    fn headless_sink_stops_after_limit() {
        let mut sink = HeadlessSink::new(2);
        assert!(sink.submit(&[1, 2, 3]));
        assert!(!sink.submit(&[4, 5, 6]));
        assert!(!sink.submit(&[7, 8, 9]));
        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.last_frame(), &[4, 5, 6]);
    }

    #[test]
    fn headless_sink_shutdown() {
        let mut sink = HeadlessSink::new(10);
        sink.shutdown();
        assert!(!sink.submit(&[1]));
        assert_eq!(sink.frames(), 0);
    }
}
