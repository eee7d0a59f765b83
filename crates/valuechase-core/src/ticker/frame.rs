use serde::{Deserialize, Serialize};

/// Frame timing payload handed to listeners
///
/// `progress` and `raw` start empty and are filled in by the chaser that
/// re-emits the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameEvent {
    /// Milliseconds since the ticker origin
    pub time: f64,
    /// Milliseconds since the previous frame (0 for the first frame of a run)
    pub delta: f64,
    /// Configured frame rate
    pub fps: f64,
    /// Measured frame rate for this frame
    pub true_fps: f64,
    /// Frames dispatched since the ticker was created
    pub frame: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
}

impl FrameEvent {
    pub fn new(time: f64, delta: f64, fps: f64, true_fps: f64, frame: u64) -> Self {
        Self {
            time,
            delta,
            fps,
            true_fps,
            frame,
            progress: None,
            raw: None,
        }
    }

    /// Payload used before any real frame was seen
    pub fn synthetic(fps: f64) -> Self {
        Self::new(0.0, 0.0, fps, fps, 0)
    }

    /// Ratio of measured to configured frame rate, 1 when they agree
    pub fn fps_coefficient(&self) -> f64 {
        if self.true_fps != self.fps {
            self.true_fps / self.fps
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_coefficient() {
        assert_eq!(FrameEvent::new(0.0, 16.0, 60.0, 60.0, 1).fps_coefficient(), 1.0);
        assert_eq!(FrameEvent::new(0.0, 33.0, 60.0, 30.0, 1).fps_coefficient(), 0.5);
    }

    #[test]
    fn test_synthetic_has_no_values() {
        let evt = FrameEvent::synthetic(60.0);
        assert_eq!(evt.time, 0.0);
        assert!(evt.progress.is_none());
        assert!(evt.raw.is_none());
    }
}
