use std::path::Path;

use serde::Deserialize;

use crate::foundation::error::{GlassError, GlassResult};

/// Facts read back from an encoded file.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MediaInfo {
    pub duration_seconds: Option<f64>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_ffprobe_json(bytes: &[u8]) -> GlassResult<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(bytes)
        .map_err(|e| GlassError::validation(format!("invalid ffprobe json: {e}")))?;
    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| GlassError::validation("no video stream found"))?;

    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    Ok(MediaInfo {
        duration_seconds,
        width: video.width.unwrap_or(0),
        height: video.height.unwrap_or(0),
    })
}

/// Probe `path` with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub async fn probe_media(ffprobe: &str, path: &Path) -> GlassResult<Option<MediaInfo>> {
    use std::process::Stdio;

    let output = tokio::process::Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| GlassError::encoder_failed(format!("failed to run ffprobe: {e}"), None, None))?;

    if !output.status.success() {
        return Err(GlassError::encoder_failed(
            "ffprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).trim().to_string()),
            output.status.code(),
        ));
    }
    parse_ffprobe_json(&output.stdout).map(Some)
}

/// Without `media-ffmpeg` nothing is probed and callers keep the requested values.
#[cfg(not(feature = "media-ffmpeg"))]
pub async fn probe_media(_ffprobe: &str, _path: &Path) -> GlassResult<Option<MediaInfo>> {
    Ok(None)
}
