//! Panel visibility and the launcher pulse.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use jobchat_core::error::Result;
use jobchat_core::{ChatError, PresentationEvent, PresentationState};

pub const PULSE_REST_SCALE: f32 = 1.0;
pub const PULSE_PEAK_SCALE: f32 = 1.1;

/// Launcher scale `elapsed` into the pulse loop.
///
/// Grows linearly from rest to peak over one `phase`, shrinks back over the
/// next, and repeats.
pub fn pulse_scale(elapsed: Duration, phase: Duration) -> f32 {
    let phase_ms = phase.as_millis();
    if phase_ms == 0 {
        return PULSE_REST_SCALE;
    }

    let cycle_pos = elapsed.as_millis() % (phase_ms * 2);
    let progress = if cycle_pos <= phase_ms {
        cycle_pos as f32 / phase_ms as f32
    } else {
        (phase_ms * 2 - cycle_pos) as f32 / phase_ms as f32
    };

    PULSE_REST_SCALE + (PULSE_PEAK_SCALE - PULSE_REST_SCALE) * progress
}

/// Background task publishing the launcher scale every frame.
///
/// The task stops on [`PulseAnimator::cancel`] or when the animator is dropped.
pub struct PulseAnimator {
    scale: watch::Receiver<f32>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PulseAnimator {
    /// Starts the animation on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Internal` when called outside a runtime.
    pub fn spawn(phase: Duration, frame: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            ChatError::internal(format!("Pulse animation needs a tokio runtime: {e}"))
        })?;

        let (tx, scale) = watch::channel(PULSE_REST_SCALE);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let frame = frame.max(Duration::from_millis(1));

        let task = runtime.spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(frame);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tx.send_replace(pulse_scale(started.elapsed(), phase));
                    }
                }
            }
            tracing::trace!("Pulse animation stopped");
        });

        Ok(Self {
            scale,
            cancel,
            task: Some(task),
        })
    }

    /// An animator that never moves.
    pub fn stopped() -> Self {
        let (_, scale) = watch::channel(PULSE_REST_SCALE);
        let cancel = CancellationToken::new();
        cancel.cancel();
        Self {
            scale,
            cancel,
            task: None,
        }
    }

    pub fn scale(&self) -> f32 {
        *self.scale.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PulseAnimator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Drives [`PresentationState`] from user intents.
pub struct PresentationController {
    state: watch::Sender<PresentationState>,
    pulse: PulseAnimator,
}

impl PresentationController {
    pub fn new(pulse: PulseAnimator) -> Self {
        let (state, _) = watch::channel(PresentationState::Closed);
        Self { state, pulse }
    }

    pub fn state(&self) -> PresentationState {
        *self.state.borrow()
    }

    /// Applies `event`. Events that do not apply in the current state are
    /// ignored and the current state is returned.
    pub fn apply(&self, event: PresentationEvent) -> PresentationState {
        let mut next = self.state();
        self.state.send_if_modified(|state| match state.transition(event) {
            Some(to) => {
                tracing::debug!(from = ?state, to = ?to, event = ?event, "Presentation changed");
                *state = to;
                next = to;
                true
            }
            None => {
                tracing::trace!(state = ?state, event = ?event, "Ignoring presentation event");
                false
            }
        });
        next
    }

    pub fn open(&self) -> PresentationState {
        self.apply(PresentationEvent::Launch)
    }

    pub fn minimize(&self) -> PresentationState {
        self.apply(PresentationEvent::Minimize)
    }

    pub fn expand(&self) -> PresentationState {
        self.apply(PresentationEvent::Expand)
    }

    pub fn dismiss(&self) -> PresentationState {
        self.apply(PresentationEvent::Dismiss)
    }

    /// Launcher button behaviour: opens when closed, closes otherwise.
    pub fn toggle(&self) -> PresentationState {
        if self.state().is_active() {
            self.dismiss()
        } else {
            self.open()
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.subscribe()
    }

    pub fn pulse_scale(&self) -> f32 {
        self.pulse.scale()
    }

    pub fn pulse(&self) -> &PulseAnimator {
        &self.pulse
    }

    pub fn shutdown(&self) {
        self.pulse.cancel();
    }
}
