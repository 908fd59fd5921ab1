//! Local animation playback.

use std::sync::Arc;

use lumipet_core::{Fps, Grid};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Duration, Instant},
};

use crate::timeline::Frames;

/// Periodically advances the displayed frame index over the timeline frames.
///
/// The playback is either stopped or playing, in the latter state exactly one tick task
/// is running. The frames count is re-read from the latest snapshot on every tick, so
/// the timeline may be edited while playing.
#[derive(Debug)]
pub struct Playback {
    frames: watch::Receiver<Frames>,
    index: Arc<watch::Sender<usize>>,
    fps: Fps,
    task: Option<JoinHandle<()>>,
}

impl Playback {
    /// Creates a stopped playback over the given frames with the default rate.
    pub fn new(frames: watch::Receiver<Frames>) -> Self {
        Self::with_fps(frames, Fps::DEFAULT)
    }

    /// Creates a stopped playback over the given frames with the given rate.
    pub fn with_fps(frames: watch::Receiver<Frames>, fps: Fps) -> Self {
        let (index, _) = watch::channel(0);
        Self {
            frames,
            index: Arc::new(index),
            fps,
            task: None,
        }
    }

    /// Starts playing at the given rate.
    ///
    /// Playing at the same rate again does nothing, another rate is applied like
    /// [`Self::set_fps`].
    pub async fn play(&mut self, fps: Fps) {
        if self.is_playing() {
            if self.fps != fps {
                self.set_fps(fps).await;
            }
            return;
        }

        self.fps = fps;
        self.start();
    }

    /// Stops playing, no tick happens after this method returns.
    ///
    /// Ticks which are already due at the moment of stopping are applied first. The
    /// displayed index keeps its last value.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        tokio::task::yield_now().await;
        task.abort();
        // The task has been aborted, so the only expected outcome is a cancellation.
        if let Err(err) = task.await {
            if !err.is_cancelled() {
                log::error!("Playback task failed: {err}");
            }
        }
        log::info!("Playback stopped at frame #{}", self.display_index());
    }

    /// Changes the rate, the running playback continues with the new one.
    pub async fn set_fps(&mut self, fps: Fps) {
        self.fps = fps;
        if self.is_playing() {
            self.stop().await;
            self.start();
        }
    }

    /// Moves the displayed index back to the first frame.
    pub fn reset(&mut self) {
        self.index.send_replace(0);
    }

    /// Returns the index of the displayed frame.
    ///
    /// The index always points into the latest frames snapshot, even if frames have been
    /// deleted since the last tick.
    pub fn display_index(&self) -> usize {
        let index = *self.index.borrow();
        index % self.frames.borrow().len().max(1)
    }

    /// Returns the displayed frame of the latest frames snapshot.
    pub fn display_frame(&self) -> Grid {
        let index = self.display_index();
        self.frames
            .borrow()
            .get(index)
            .copied()
            .unwrap_or_default()
    }

    /// Subscribes to the index changes made by the ticks.
    ///
    /// Unlike [`Self::display_index`], the received value is not adjusted to the frames
    /// deleted after the tick.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.subscribe()
    }

    pub fn is_playing(&self) -> bool {
        self.task.is_some()
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    fn start(&mut self) {
        let period = self.fps.frame_interval();
        log::info!("Playback started at {} fps", self.fps);

        self.task = Some(tokio::spawn(tick(
            self.frames.clone(),
            self.index.clone(),
            Instant::now() + period,
            period,
        )));
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn tick(
    frames: watch::Receiver<Frames>,
    index: Arc<watch::Sender<usize>>,
    start: Instant,
    period: Duration,
) {
    let mut interval = time::interval_at(start, period);
    loop {
        interval.tick().await;

        let len = frames.borrow().len().max(1);
        index.send_modify(|index| *index = (*index + 1) % len);
        log::trace!("Displaying frame #{}", *index.borrow());
    }
}
