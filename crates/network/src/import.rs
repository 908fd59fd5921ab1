//! Import of the animations derived from video clips and external payloads.

use std::time::Duration;

use lumipet_core::{AnimationData, Error, Fps, Grid, Result};

use crate::AnimationPayload;

/// Grayscale values strictly above this threshold become turned on cells.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// An external video frames extractor.
///
/// Takes a clip fragment starting at the given time and reduces each of its frames
/// to 64 row-major grayscale values.
pub trait VideoFrameSource {
    /// Returns pixelated grayscale frames starting from the given time.
    fn extract(&mut self, start: Duration) -> Result<Vec<Vec<u8>>>;
}

/// Converts grayscale 8x8 frames into a new looped animation with the default rate.
///
/// Each frame must contain exactly 64 values.
pub fn import_from_video_frames<I, F>(frames: I, threshold: u8) -> Result<AnimationData>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let grids = frames
        .into_iter()
        .enumerate()
        .map(|(index, pixels)| {
            Grid::from_grayscale(pixels.as_ref(), threshold).map_err(|err| in_frame(index, err))
        })
        .collect::<Result<Vec<_>>>()?;

    if grids.is_empty() {
        return Err(Error::Format("no frames to import".to_owned()));
    }

    log::info!(
        "Imported {} frames with the threshold {threshold}",
        grids.len()
    );
    AnimationData::new(Fps::DEFAULT, grids)
}

/// Extracts frames from the given source and converts them into a new animation.
pub fn import_from_video<S>(source: &mut S, start: Duration, threshold: u8) -> Result<AnimationData>
where
    S: VideoFrameSource + ?Sized,
{
    let frames = source.extract(start)?;
    log::debug!("Extracted {} frames starting at {start:?}", frames.len());
    import_from_video_frames(frames, threshold)
}

/// Parses an untrusted `{ name, fps, frames }` animation payload.
///
/// Row count, row length and the character set of every frame are validated.
pub fn parse_animation_payload(json: &str) -> Result<AnimationPayload> {
    let payload: AnimationPayload = serde_json::from_str(json)?;
    if payload.frames.is_empty() {
        return Err(Error::Format("animation payload has no frames".to_owned()));
    }
    Ok(payload)
}

/// Parses frames in the numeric matrix form, a JSON array of 8x8 arrays of `0`/`1`.
pub fn parse_frame_matrices(json: &str) -> Result<Vec<Grid>> {
    let matrices: Vec<Vec<Vec<u8>>> = serde_json::from_str(json)?;
    if matrices.is_empty() {
        return Err(Error::Format("no frames to import".to_owned()));
    }

    matrices
        .iter()
        .enumerate()
        .map(|(index, matrix)| {
            Grid::from_matrix(matrix.as_slice()).map_err(|err| in_frame(index, err))
        })
        .collect()
}

/// Adds the frame index to the format error message.
fn in_frame(index: usize, err: Error) -> Error {
    match err {
        Error::Format(msg) => Error::Format(format!("frame {index}: {msg}")),
        other => other,
    }
}
