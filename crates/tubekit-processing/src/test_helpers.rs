//! Mock decoder implementations shared by the processing tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::decoder::{VideoDecoder, VideoStream};

/// Scripted stand-in for the external decoder.
pub struct MockDecoder {
    duration: f64,
    fps: f64,
    open_fails: bool,
    probe_fails: bool,
    fail_at_frame: Option<u64>,
    probe_called: AtomicBool,
    probed_paths: Mutex<Vec<PathBuf>>,
}

impl MockDecoder {
    fn new(duration: f64, fps: f64) -> Self {
        Self {
            duration,
            fps,
            open_fails: false,
            probe_fails: false,
            fail_at_frame: None,
            probe_called: AtomicBool::new(false),
            probed_paths: Mutex::new(Vec::new()),
        }
    }

    /// Decoder where every operation succeeds.
    pub fn ok(duration: f64, fps: f64) -> Self {
        Self::new(duration, fps)
    }

    /// Decoder whose `open` always fails.
    pub fn open_fails() -> Self {
        Self {
            open_fails: true,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Decoder that fails when asked to decode `frame_index`.
    pub fn fails_at_frame(duration: f64, fps: f64, frame_index: u64) -> Self {
        Self {
            fail_at_frame: Some(frame_index),
            ..Self::new(duration, fps)
        }
    }

    /// Decoder whose validation probe rejects everything.
    pub fn probe_rejects() -> Self {
        Self {
            probe_fails: true,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn probe_was_called(&self) -> bool {
        self.probe_called.load(Ordering::SeqCst)
    }

    /// Paths handed to the validation probe, in call order.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoDecoder for MockDecoder {
    async fn open(&self, _path: &Path) -> Result<Box<dyn VideoStream>> {
        if self.open_fails {
            return Err(anyhow!("mock: open failure"));
        }

        Ok(Box::new(MockStream {
            duration: self.duration,
            fps: self.fps,
            fail_at_frame: self.fail_at_frame,
        }))
    }

    async fn probe_first_frame(&self, path: &Path) -> Result<()> {
        self.probe_called.store(true, Ordering::SeqCst);
        self.probed_paths.lock().unwrap().push(path.to_path_buf());

        if self.probe_fails {
            return Err(anyhow!("mock: undecodable media"));
        }
        Ok(())
    }
}

struct MockStream {
    duration: f64,
    fps: f64,
    fail_at_frame: Option<u64>,
}

// Smallest bytes that look enough like a JPEG for tests.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];

#[async_trait]
impl VideoStream for MockStream {
    fn frames_per_second(&self) -> f64 {
        self.fps
    }

    fn duration_seconds(&self) -> f64 {
        self.duration
    }

    async fn decode_frame(&mut self, frame_index: u64, output: &Path) -> Result<()> {
        if self.fail_at_frame == Some(frame_index) {
            return Err(anyhow!("mock: decode failure at frame {}", frame_index));
        }

        tokio::fs::write(output, FAKE_JPEG).await?;
        Ok(())
    }
}
