//! Capture seam: how bitmaps enter the library
//!
//! The comparator never knows how pixels were obtained: browser, emulator,
//! framebuffer, canned fixtures. Anything that can hand over the current
//! surface as a [`Bitmap`] plugs in here.

use std::collections::VecDeque;

use crate::bitmap::Bitmap;
use crate::result::{CotejoError, CotejoResult};

/// Produces the current visual surface as a bitmap
pub trait SurfaceCapture {
    /// Capture the surface as currently rendered
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::Capture`] when no frame can be produced.
    fn capture_surface(&mut self) -> CotejoResult<Bitmap>;
}

/// Scripted capture for tests: hands out prepared frames in order
#[derive(Debug, Default)]
pub struct MockCapture {
    frames: VecDeque<Bitmap>,
    capture_count: usize,
}

impl MockCapture {
    /// Empty mock; every capture fails until frames are queued
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock pre-loaded with `frames`, handed out front to back
    #[must_use]
    pub fn with_frames(frames: Vec<Bitmap>) -> Self {
        Self {
            frames: frames.into(),
            capture_count: 0,
        }
    }

    /// Queue one more frame
    pub fn push_frame(&mut self, frame: Bitmap) {
        self.frames.push_back(frame);
    }

    /// How many captures have been requested so far
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Frames still queued
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SurfaceCapture for MockCapture {
    fn capture_surface(&mut self) -> CotejoResult<Bitmap> {
        self.capture_count += 1;
        self.frames.pop_front().ok_or_else(|| CotejoError::Capture {
            message: "Mock capture queue is empty".to_string(),
        })
    }
}
