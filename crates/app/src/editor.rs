//! Animation editing session.

use lumipet_core::{AnimationData, AnimationRecord, Error, Fps, Result};
use lumipet_network::{Bus, DeviceSync};
use lumipet_storage::{AnimationStore, BlobStore};

use crate::{playback::Playback, timeline::Timeline};

/// An animation being edited.
///
/// Ties together the frames timeline, its local playback and the stored record the
/// animation was opened from or saved to.
#[derive(Debug)]
pub struct Editor {
    timeline: Timeline,
    playback: Playback,
    looped: bool,
    record: Option<AnimationRecord>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Starts a new unsaved animation with a single empty frame.
    pub fn new() -> Self {
        Self::with_timeline(Timeline::new(), Fps::DEFAULT, true, None)
    }

    /// Opens a stored animation.
    pub fn open(record: AnimationRecord) -> Result<Self> {
        log::info!("Opening animation \"{}\" ({})", record.name, record.id);

        let timeline = Timeline::from_frames(record.data.frames().to_vec())?;
        let (fps, looped) = (record.data.fps, record.data.looped);
        Ok(Self::with_timeline(timeline, fps, looped, Some(record)))
    }

    /// Starts a new unsaved animation from the imported data.
    pub fn import(data: AnimationData) -> Result<Self> {
        let (fps, looped) = (data.fps, data.looped);
        let timeline = Timeline::from_frames(data.into_frames())?;
        Ok(Self::with_timeline(timeline, fps, looped, None))
    }

    fn with_timeline(
        timeline: Timeline,
        fps: Fps,
        looped: bool,
        record: Option<AnimationRecord>,
    ) -> Self {
        let playback = Playback::with_fps(timeline.subscribe(), fps);
        Self {
            timeline,
            playback,
            looped,
            record,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    /// Returns the stored record this animation belongs to, if any.
    pub fn record(&self) -> Option<&AnimationRecord> {
        self.record.as_ref()
    }

    pub fn fps(&self) -> Fps {
        self.playback.fps()
    }

    /// Changes the frame rate, the running playback picks it up immediately.
    pub async fn set_fps(&mut self, fps: Fps) {
        self.playback.set_fps(fps).await;
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    /// Returns the edited animation.
    pub fn animation_data(&self) -> Result<AnimationData> {
        let mut data = AnimationData::new(self.fps(), self.timeline.frames().to_vec())?;
        data.looped = self.looped;
        Ok(data)
    }

    /// Saves the animation as a new record and continues editing it.
    pub fn save_as<B: BlobStore>(
        &mut self,
        store: &mut AnimationStore<B>,
        name: &str,
    ) -> Result<&AnimationRecord> {
        let record = store.create(name, self.animation_data()?)?;
        Ok(self.record.insert(record))
    }

    /// Saves the changes to the record this animation belongs to.
    ///
    /// Only the animation data is replaced, the name is taken from the store since the
    /// record might have been renamed after it was opened. An unsaved animation has no
    /// name yet, use [`Self::save_as`] instead.
    pub fn save<B: BlobStore>(&mut self, store: &mut AnimationStore<B>) -> Result<&AnimationRecord> {
        let data = self.animation_data()?;
        let Some(record) = self.record.as_mut() else {
            return Err(Error::EmptyName);
        };

        if let Some(stored) = store.get(&record.id)? {
            record.name = stored.name;
        }
        record.data = data;
        if !store.update(record)? {
            log::warn!(
                "Animation \"{}\" has been removed from the store, saving it as a new one",
                record.name
            );
            *record = store.create(&record.name, record.data.clone())?;
        }
        Ok(record)
    }

    /// Shows the current frame on the device.
    pub fn send_pattern<B: Bus>(&self, sync: &mut DeviceSync<B>) -> Result<()> {
        sync.publish_single_pattern(&self.timeline.current())
    }

    /// Uploads the animation to the device.
    pub fn send_animation<B: Bus>(&self, sync: &mut DeviceSync<B>) -> Result<()> {
        sync.publish_animation(self.name(), &self.animation_data()?)
    }

    /// Uploads the animation to the device and plays it.
    pub fn preview<B: Bus>(&self, sync: &mut DeviceSync<B>) -> Result<()> {
        sync.preview(self.name(), &self.animation_data()?)
    }

    fn name(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.name.as_str())
    }
}
