//! Frame scheduling for running effects on a matrix.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputChannel;
use crate::effect::EffectSlot;
use crate::matrix::Matrix;
use crate::output::FrameStatus;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether the frame reached the LEDs or was dropped on a busy channel.
    pub status: FrameStatus,
}

/// Drives an effect on a matrix at the effect's own frame period.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Renders the effect into the framebuffer
/// - Pushes the frame without waiting for a running transfer
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(matrix, EffectId::Plasma.to_slot(0));
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<C: OutputChannel> {
    matrix: Matrix<C>,
    effect: EffectSlot,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<C: OutputChannel> FrameScheduler<C> {
    /// Create a scheduler paced at the effect's period.
    pub fn new(matrix: Matrix<C>, effect: EffectSlot) -> Self {
        let frame_duration = effect.period();
        Self::with_frame_duration(matrix, effect, frame_duration)
    }

    /// Create a scheduler with a custom frame duration.
    pub fn with_frame_duration(matrix: Matrix<C>, effect: EffectSlot, frame_duration: Duration) -> Self {
        Self {
            matrix,
            effect,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Replace the running effect; pacing follows the new effect's period.
    pub fn set_effect(&mut self, mut effect: EffectSlot) {
        effect.reset();
        self.frame_duration = effect.period();

        #[cfg(feature = "esp32-log")]
        println!(
            "[FrameScheduler.set_effect] {} @ {}ms",
            effect.id().as_str(),
            self.frame_duration.as_millis()
        );

        self.effect = effect;
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Renders the current frame
    /// 3. Pushes it to the LEDs without blocking on a busy channel
    /// 4. Returns the deadline for the next frame
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // More than two frames behind: drop the backlog instead of bursting
        let max_drift = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift {
            self.next_frame = now;
        }

        self.matrix.render_effect(&mut self.effect, now);
        let status = self.matrix.update(false);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            status,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub const fn effect(&self) -> &EffectSlot {
        &self.effect
    }

    pub const fn matrix(&self) -> &Matrix<C> {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut Matrix<C> {
        &mut self.matrix
    }

    /// Stop scheduling and hand the matrix back
    pub fn into_matrix(self) -> Matrix<C> {
        self.matrix
    }
}
