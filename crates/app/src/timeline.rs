//! Frame sequence editing.

use std::sync::Arc;

use lumipet_core::{Error, Grid, Result};
use tokio::sync::watch;

/// Immutable snapshot of the frame sequence.
pub type Frames = Arc<Vec<Grid>>;

/// Ordered, non-empty sequence of frames with a cursor pointing to the frame being edited.
///
/// Every mutation commits a whole new frame list, so the subscribers never observe
/// a partially applied edit. Snapshots held by the readers are not affected by the
/// subsequent edits.
#[derive(Debug)]
pub struct Timeline {
    frames: watch::Sender<Frames>,
    cursor: usize,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Creates a timeline with a single empty frame.
    pub fn new() -> Self {
        Self::with_frames(vec![Grid::empty()])
    }

    /// Creates a timeline from the given frames, the cursor points to the first one.
    pub fn from_frames(frames: Vec<Grid>) -> Result<Self> {
        ensure_not_empty(&frames)?;
        Ok(Self::with_frames(frames))
    }

    fn with_frames(frames: Vec<Grid>) -> Self {
        let (frames, _) = watch::channel(Arc::new(frames));
        Self { frames, cursor: 0 }
    }

    /// Appends an empty frame and moves the cursor to it.
    pub fn add_frame(&mut self) {
        self.commit(|frames| frames.push(Grid::empty()));
        self.cursor = self.len() - 1;
        log::debug!("Added frame #{}", self.cursor);
    }

    /// Removes the frame under the cursor.
    ///
    /// The last remaining frame cannot be deleted.
    pub fn delete_current(&mut self) -> Result<()> {
        if self.len() <= 1 {
            return Err(Error::InvariantViolation(
                "the only remaining frame cannot be deleted",
            ));
        }

        let cursor = self.cursor;
        self.commit(|frames| {
            frames.remove(cursor);
        });
        self.cursor = cursor.saturating_sub(1);
        log::debug!("Deleted frame #{cursor}, cursor moved to #{}", self.cursor);
        Ok(())
    }

    /// Replaces the frame under the cursor by an empty one.
    pub fn clear_current(&mut self) {
        let cursor = self.cursor;
        self.commit(|frames| frames[cursor] = Grid::empty());
    }

    /// Moves the cursor to the given frame.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.cursor = Error::check_index(index, self.len())?;
        Ok(())
    }

    /// Flips a cell of the frame under the cursor.
    pub fn toggle_cell_at_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        let grid = self.current().try_toggle(row, col)?;
        let cursor = self.cursor;
        self.commit(|frames| frames[cursor] = grid);
        Ok(())
    }

    /// Inserts a copy of the current frame right after it and moves the cursor to the copy.
    pub fn duplicate_current(&mut self) {
        let grid = self.current();
        let index = self.cursor + 1;
        self.commit(|frames| frames.insert(index, grid));
        self.cursor = index;
    }

    /// Replaces the whole sequence, the cursor returns to the first frame.
    pub fn replace_all(&mut self, frames: Vec<Grid>) -> Result<()> {
        ensure_not_empty(&frames)?;

        log::debug!("Loaded {} frames", frames.len());
        self.frames.send_replace(Arc::new(frames));
        self.cursor = 0;
        Ok(())
    }

    /// Returns the frame under the cursor.
    pub fn current(&self) -> Grid {
        self.frames.borrow()[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of frames, always at least one.
    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Returns the current frames snapshot.
    pub fn frames(&self) -> Frames {
        self.frames.borrow().clone()
    }

    /// Subscribes to the frame list changes.
    pub fn subscribe(&self) -> watch::Receiver<Frames> {
        self.frames.subscribe()
    }

    fn commit(&mut self, edit: impl FnOnce(&mut Vec<Grid>)) {
        self.frames.send_modify(|frames| edit(Arc::make_mut(frames)));
    }
}

fn ensure_not_empty(frames: &[Grid]) -> Result<()> {
    if frames.is_empty() {
        Err(Error::InvariantViolation("a timeline must have at least one frame"))
    } else {
        Ok(())
    }
}
