//! Video dimension probing.
//!
//! [`FfprobeProbe`] shells out to `ffprobe`; other implementations of
//! [`MediaProbe`] can stand in where no binary is available.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

use crate::aspect::VideoDimensions;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to execute ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe failed: {0}")]
    Failed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("No video stream found")]
    NoVideoStream,
}

#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Width and height of the first stream that reports both.
pub fn parse_ffprobe_output(stdout: &[u8]) -> Result<VideoDimensions, ProbeError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout).map_err(ProbeError::Parse)?;

    output
        .streams
        .into_iter()
        .find_map(|s| match (s.width, s.height) {
            (Some(width), Some(height)) => Some(VideoDimensions::new(width, height)),
            _ => None,
        })
        .ok_or(ProbeError::NoVideoStream)
}

pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: String) -> Self {
        Self { ffprobe_path }
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProbeError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(status = ?output.status.code(), stderr = %stderr, "ffprobe failed");
            return Err(ProbeError::Failed(stderr));
        }

        let dimensions = parse_ffprobe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            aspect_ratio = %dimensions.aspect_ratio(),
            "Video probe completed"
        );

        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_video_stream() {
        let stdout = br#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#;
        let dims = parse_ffprobe_output(stdout).unwrap();
        assert_eq!(dims, VideoDimensions::new(1920, 1080));
    }

    #[test]
    fn test_parse_skips_streams_without_dimensions() {
        let stdout = br#"{"streams":[{"codec_type":"audio"},{"width":1080,"height":1920}]}"#;
        let dims = parse_ffprobe_output(stdout).unwrap();
        assert_eq!(dims.height, 1920);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_ffprobe_output(br#"{"streams":[]}"#),
            Err(ProbeError::NoVideoStream)
        ));
        assert!(matches!(
            parse_ffprobe_output(b"{}"),
            Err(ProbeError::NoVideoStream)
        ));
        assert!(matches!(
            parse_ffprobe_output(b"not json"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let probe = FfprobeProbe::new("/nonexistent/tubely-ffprobe".to_string());
        let result = probe.probe(Path::new("/tmp/whatever.mp4")).await;
        assert!(matches!(result, Err(ProbeError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_runs_configured_binary() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-ffprobe");
        std::fs::write(
            &script,
            "#!/bin/sh\necho '{\"streams\":[{\"width\":720,\"height\":1280}]}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = FfprobeProbe::new(script.to_string_lossy().to_string());
        let dims = probe.probe(&dir.path().join("clip.mp4")).await.unwrap();
        assert_eq!(dims, VideoDimensions::new(720, 1280));
        assert_eq!(dims.aspect_ratio().as_str(), "9:16");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_nonzero_exit_is_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing-ffprobe");
        std::fs::write(&script, "#!/bin/sh\necho 'moov atom not found' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = FfprobeProbe::new(script.to_string_lossy().to_string());
        match probe.probe(&dir.path().join("clip.mp4")).await {
            Err(ProbeError::Failed(stderr)) => assert!(stderr.contains("moov atom")),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
