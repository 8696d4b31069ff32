// Animation driver - injected capability for panel resize animation
//
// The controller never animates by itself: it hands a start/end height and
// a duration to a driver and consumes the driver's events from its command
// channel. The driver runs wherever it likes (TweenDriver spawns a tokio
// task); delivery back onto the owning task goes through AnimationSink,
// which tags every event with the generation captured when the animation
// started. The controller drops events whose generation is stale, which is
// how a cancelled animation can never clobber its successor.

use crate::panel::command::PanelCommand;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Interval between animation frames (roughly 30 fps, plenty for a terminal)
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Progress notifications emitted by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    Started,
    /// Intermediate height in rows
    Frame(u16),
    /// The animation reached its end height
    Completed,
    /// The driver abandoned the animation before the end height
    Cancelled,
}

/// Generation-tagged sender a driver uses to deliver events
#[derive(Clone)]
pub struct AnimationSink {
    tx: mpsc::Sender<PanelCommand>,
    generation: u64,
}

impl AnimationSink {
    pub fn new(tx: mpsc::Sender<PanelCommand>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn started(&self) {
        self.emit(AnimationEvent::Started);
    }

    pub fn frame(&self, height: u16) {
        self.emit(AnimationEvent::Frame(height));
    }

    pub fn completed(&self) {
        self.emit(AnimationEvent::Completed);
    }

    pub fn cancelled(&self) {
        self.emit(AnimationEvent::Cancelled);
    }

    fn emit(&self, event: AnimationEvent) {
        let cmd = PanelCommand::Animation {
            generation: self.generation,
            event,
        };
        if self.tx.try_send(cmd).is_err() {
            // Panel loop gone or saturated; the generation guard makes
            // dropped frames harmless.
            tracing::trace!("animation event dropped");
        }
    }
}

/// Handle to an in-flight animation
pub struct AnimationHandle {
    task: Option<JoinHandle<()>>,
}

impl AnimationHandle {
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle with nothing behind it (drivers that complete inline)
    #[allow(dead_code)]
    pub fn detached() -> Self {
        Self { task: None }
    }

    /// Stop the animation. The caller is responsible for bumping its
    /// generation first so any frame already in the channel is ignored.
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Capability to animate the panel between two heights
pub trait AnimationDriver: Send + Sync {
    /// Start an animation from `from` to `to` rows over `duration`.
    /// Events are delivered through `sink`; the returned handle cancels.
    fn animate(
        &self,
        from: u16,
        to: u16,
        duration: Duration,
        sink: AnimationSink,
    ) -> AnimationHandle;
}

/// Tokio-based linear tween driver used by the app
pub struct TweenDriver;

impl AnimationDriver for TweenDriver {
    fn animate(
        &self,
        from: u16,
        to: u16,
        duration: Duration,
        sink: AnimationSink,
    ) -> AnimationHandle {
        let task = tokio::spawn(async move {
            sink.started();

            let steps = (duration.as_millis() / FRAME_INTERVAL.as_millis()).max(1) as u32;
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            // The first tick completes immediately; consume it so the
            // first frame lands one interval after start.
            ticker.tick().await;

            for step in 1..=steps {
                ticker.tick().await;
                let t = f64::from(step) / f64::from(steps);
                let height = lerp(from, to, t);
                sink.frame(height);
            }

            sink.completed();
        });

        AnimationHandle::from_task(task)
    }
}

/// Linear interpolation between two heights, rounded to whole rows
fn lerp(from: u16, to: u16, t: f64) -> u16 {
    let from = f64::from(from);
    let to = f64::from(to);
    (from + (to - from) * t).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn drain(rx: &mut mpsc::Receiver<PanelCommand>) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            if let PanelCommand::Animation { event, .. } = cmd {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn lerp_is_monotonic_and_hits_endpoints() {
        assert_eq!(lerp(0, 10, 0.0), 0);
        assert_eq!(lerp(0, 10, 1.0), 10);
        assert_eq!(lerp(10, 0, 1.0), 0);
        let mut prev = 0;
        for step in 0..=20 {
            let h = lerp(0, 12, f64::from(step) / 20.0);
            assert!(h >= prev);
            prev = h;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tween_emits_frames_then_completes() {
        let (tx, mut rx) = mpsc::channel(64);
        let sink = AnimationSink::new(tx, 1);
        let _handle = TweenDriver.animate(0, 10, Duration::from_millis(330), sink);

        tokio::time::sleep(Duration::from_millis(400)).await;

        let events = drain(&mut rx);
        assert_eq!(events.first(), Some(&AnimationEvent::Started));
        assert_eq!(events.last(), Some(&AnimationEvent::Completed));

        let frames: Vec<u16> = events
            .iter()
            .filter_map(|e| match e {
                AnimationEvent::Frame(h) => Some(*h),
                _ => None,
            })
            .collect();
        assert!(!frames.is_empty());
        assert_eq!(*frames.last().unwrap(), 10);
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_frame_delivery() {
        let (tx, mut rx) = mpsc::channel(64);
        let sink = AnimationSink::new(tx, 1);
        let handle = TweenDriver.animate(0, 10, Duration::from_millis(330), sink);

        tokio::time::sleep(Duration::from_millis(66)).await;
        handle.cancel();
        let before = drain(&mut rx).len();

        tokio::time::sleep(Duration::from_millis(400)).await;
        let after = drain(&mut rx);
        assert!(after.is_empty(), "no events after cancel, got {after:?}");
        assert!(before > 0);
    }
}
