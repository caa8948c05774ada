use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaybackClock {
    time_seconds: f64,
    frame_index: u64,
    fps: f64,
    duration_millis: Option<f64>,
}

impl PlaybackClock {
    pub(crate) fn new(time_seconds: f64, frame_index_label: &str, fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            bail!("fps must be a positive number, got {fps}");
        }
        let time_seconds = sanitize_time(time_seconds);
        let frame_index = frame_index_label
            .trim()
            .parse::<u64>()
            .unwrap_or_else(|_| derive_frame_index(time_seconds, fps));
        Ok(Self {
            time_seconds,
            frame_index,
            fps,
            duration_millis: None,
        })
    }

    pub(crate) fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub(crate) fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub(crate) fn fps(&self) -> f64 {
        self.fps
    }

    pub(crate) fn duration_millis(&self) -> Option<f64> {
        self.duration_millis
    }

    /// Player time-update: the frame index is always re-derived.
    pub(crate) fn set_time(&mut self, time_seconds: f64) {
        self.time_seconds = sanitize_time(time_seconds);
        self.frame_index = derive_frame_index(self.time_seconds, self.fps);
    }

    /// Player loaded-metadata.
    pub(crate) fn set_duration_millis(&mut self, duration_millis: Option<f64>) {
        self.duration_millis = duration_millis.filter(|ms| ms.is_finite() && *ms >= 0.0);
    }
}

fn sanitize_time(time_seconds: f64) -> f64 {
    if time_seconds.is_finite() && time_seconds > 0.0 {
        time_seconds
    } else {
        0.0
    }
}

pub(crate) fn derive_frame_index(time_seconds: f64, fps: f64) -> u64 {
    (time_seconds * fps).floor() as u64
}

pub(crate) fn format_time(time_seconds: f64) -> String {
    let total = sanitize_time(time_seconds).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub(crate) fn video_info_line(
    video: &str,
    frame_number: &str,
    time_seconds: f64,
    fps: f64,
) -> String {
    format!(
        "Video {video} Frame: {frame_number} Time: {} FPS: {fps}",
        format_time(time_seconds)
    )
}
