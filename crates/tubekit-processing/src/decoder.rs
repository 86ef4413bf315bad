//! Video decoding seam over the external ffmpeg/ffprobe executables.
//!
//! The traits model the decoder the way callers need it: open a stream, read
//! its frame rate and duration, decode individual frames by index. The stream
//! handle is released by drop on every exit path.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// Metadata read from an opened video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub duration: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

/// An opened video stream.
#[async_trait]
pub trait VideoStream: Send {
    fn frames_per_second(&self) -> f64;

    fn duration_seconds(&self) -> f64;

    /// Decode the frame at `frame_index` and write it as an image file at
    /// `output`.
    async fn decode_frame(&mut self, frame_index: u64, output: &Path) -> Result<()>;
}

/// External video decoder.
#[async_trait]
pub trait VideoDecoder: Send + Sync {
    /// Open `path` as a decodable video stream.
    async fn open(&self, path: &Path) -> Result<Box<dyn VideoStream>>;

    /// Decode a single frame from `path` as a cheap validity probe.
    ///
    /// The probe's exit status is the only signal; its output is discarded.
    async fn probe_first_frame(&self, path: &Path) -> Result<()>;
}

/// Validate that an executable path doesn't contain shell metacharacters or
/// dangerous sequences.
fn validate_executable_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Decoder backed by the ffmpeg/ffprobe command-line tools.
pub struct FfmpegDecoder {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegDecoder {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        validate_executable_path(&ffmpeg_path).context("Invalid ffmpeg path")?;
        validate_executable_path(&ffprobe_path).context("Invalid ffprobe path")?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_stream(&self, video_path: &Path) -> Result<VideoStreamInfo> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(video_path)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let probe_data: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("Failed to parse ffprobe output")?;

        let stream = probe_data["streams"]
            .get(0)
            .ok_or_else(|| anyhow!("No video stream found"))?;

        let format = &probe_data["format"];

        let duration = format["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| anyhow!("Could not parse duration"))?;

        let fps = stream["r_frame_rate"]
            .as_str()
            .and_then(|r| {
                let parts: Vec<&str> = r.split('/').collect();
                if parts.len() == 2 {
                    let num: f64 = parts[0].parse().ok()?;
                    let den: f64 = parts[1].parse().ok()?;
                    if den != 0.0 {
                        Some(num / den)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .ok_or_else(|| anyhow!("Could not parse frame rate"))?;

        let width = stream["width"]
            .as_u64()
            .ok_or_else(|| anyhow!("Could not parse width"))? as u32;

        let height = stream["height"]
            .as_u64()
            .ok_or_else(|| anyhow!("Could not parse height"))? as u32;

        let codec = stream["codec_name"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();

        tracing::debug!(
            video_duration = duration,
            fps = fps,
            width = width,
            height = height,
            codec = %codec,
            "Video probe completed"
        );

        Ok(VideoStreamInfo {
            duration,
            fps,
            width,
            height,
            codec,
        })
    }
}

#[async_trait]
impl VideoDecoder for FfmpegDecoder {
    async fn open(&self, path: &Path) -> Result<Box<dyn VideoStream>> {
        let info = self.probe_stream(path).await?;

        Ok(Box::new(FfmpegStream {
            ffmpeg_path: self.ffmpeg_path.clone(),
            source: path.to_path_buf(),
            info,
        }))
    }

    async fn probe_first_frame(&self, path: &Path) -> Result<()> {
        let probe_output = tempfile::Builder::new()
            .prefix("tubekit-probe-")
            .suffix(".jpg")
            .tempfile()
            .context("Failed to create probe output file")?;

        let output = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2", "-y"])
            .arg(probe_output.path())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Decode probe failed: {}", stderr));
        }

        Ok(())
    }
}

/// Stream handle over a probed file; frames are decoded on demand.
struct FfmpegStream {
    ffmpeg_path: String,
    source: PathBuf,
    info: VideoStreamInfo,
}

#[async_trait]
impl VideoStream for FfmpegStream {
    fn frames_per_second(&self) -> f64 {
        self.info.fps
    }

    fn duration_seconds(&self) -> f64 {
        self.info.duration
    }

    async fn decode_frame(&mut self, frame_index: u64, output_path: &Path) -> Result<()> {
        // The comma inside the filter expression must be escaped so ffmpeg
        // doesn't read it as a filter separator.
        let select_filter = format!("select=eq(n\\,{})", frame_index);

        let output = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-i"])
            .arg(&self.source)
            .args(["-vf", &select_filter, "-vframes", "1", "-q:v", "2", "-y"])
            .arg(output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Frame extraction failed at index {}: {}",
                frame_index,
                stderr
            ));
        }

        Ok(())
    }
}
