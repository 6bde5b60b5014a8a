//! Sound and haptic feedback
//!
//! The simulation only emits `GameEvent`s. `dispatch` turns them into calls
//! on a `FeedbackSink`; sink failures are logged and never reach the game.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Infection or capture; one of `COLLISION_TONES` pitches
    Tone(u8),
    /// Level cleared
    Win,
    /// Level lost
    Lose,
    /// Controller's ball destroyed
    Explosion,
}

impl SoundEffect {
    /// Base pitch in Hz. Collision tones climb a pentatonic scale.
    pub fn frequency(self) -> f32 {
        const SCALE: [f32; 5] = [523.25, 587.33, 659.25, 783.99, 880.0];
        match self {
            SoundEffect::Tone(t) => SCALE[t as usize % SCALE.len()],
            SoundEffect::Win => 1046.5,
            SoundEffect::Lose => 196.0,
            SoundEffect::Explosion => 80.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),
    #[error("vibration unsupported")]
    VibrationUnsupported,
}

/// Audio/haptic output collaborator
pub trait FeedbackSink {
    fn play(&mut self, effect: SoundEffect) -> Result<(), FeedbackError>;
    fn stop_all(&mut self) -> Result<(), FeedbackError>;
    fn vibrate(&mut self, duration_ms: u64) -> Result<(), FeedbackError>;
}

/// Forward drained events to a sink. With `sound` off only vibration goes
/// through. Returns the number of calls that failed.
pub fn dispatch(events: &[GameEvent], sink: &mut dyn FeedbackSink, sound: bool) -> usize {
    let mut failures = 0;
    for &event in events {
        let result = match event {
            GameEvent::Vibrate { duration_ms } => sink.vibrate(duration_ms),
            _ if !sound => Ok(()),
            GameEvent::Collision { tone } => sink.play(SoundEffect::Tone(tone)),
            GameEvent::StopSounds => sink.stop_all(),
            GameEvent::Win => sink.play(SoundEffect::Win),
            GameEvent::Lose => sink.play(SoundEffect::Lose),
            GameEvent::Explosion => sink.play(SoundEffect::Explosion),
        };
        if let Err(e) = result {
            log::warn!("Feedback for {:?} failed: {}", event, e);
            failures += 1;
        }
    }
    failures
}

/// Sink that only logs; used by the headless runner
#[derive(Debug, Default)]
pub struct LogSink {
    played: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> u64 {
        self.played
    }
}

impl FeedbackSink for LogSink {
    fn play(&mut self, effect: SoundEffect) -> Result<(), FeedbackError> {
        self.played += 1;
        log::debug!("Sound {:?} ({:.0} Hz)", effect, effect.frequency());
        Ok(())
    }

    fn stop_all(&mut self) -> Result<(), FeedbackError> {
        log::debug!("Sounds stopped");
        Ok(())
    }

    fn vibrate(&mut self, duration_ms: u64) -> Result<(), FeedbackError> {
        log::debug!("Vibrate {} ms", duration_ms);
        Ok(())
    }
}
