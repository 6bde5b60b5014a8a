//! Pointer event handoff
//!
//! Event callbacks (or another thread) push through an `InputSender`; the
//! frame loop drains everything into the session right before `update`.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::sim::{InputEvent, Session};

/// Unbounded: every physical event reaches the session, in order
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A handle for an event source
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Hand every pending event to the session, oldest first.
    /// Returns how many were forwarded.
    pub fn drain_into(&self, session: &mut Session) -> usize {
        let mut count = 0;
        for event in self.receiver.try_iter() {
            session.handle_input(event);
            count += 1;
        }
        count
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Non-blocking submit. Fails only once the queue itself is gone.
    pub fn submit(&self, event: InputEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Input queue closed, {:?} not delivered", event.kind);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Options;
    use crate::sim::{GameMode, ManualClock, SessionState};
    use crate::{HighScores, Tuning};

    fn running_session(clock: &ManualClock) -> Session {
        let mut session = Session::new(
            1,
            Tuning::default(),
            Box::new(clock.clone()),
            Box::new(HighScores::new()),
            Box::new(Options::with_mode(GameMode::Reaction)),
        );
        session.notify_loading_shown();
        session.update();
        assert_eq!(session.state(), SessionState::Running);
        session
    }

    #[test]
    fn test_burst_is_never_dropped() {
        let clock = ManualClock::new(0);
        let mut session = running_session(&clock);
        let queue = InputQueue::new();
        let sender = queue.sender();

        for k in 0..1_000 {
            assert!(sender.submit(InputEvent::moved(k as f32, 10.0)));
        }
        assert!(sender.submit(InputEvent::up(200.0, 300.0)));
        assert_eq!(queue.pending_count(), 1_001);

        assert_eq!(queue.drain_into(&mut session), 1_001);
        clock.advance(16);
        session.update();
        // The release at the end of the burst still detonates
        assert!(!session.player().has_turn);
        assert_eq!(session.player().ball.pos.x, 200.0);
    }

    #[test]
    fn test_closed_queue_rejects() {
        let queue = InputQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.submit(InputEvent::up(1.0, 1.0)));
    }

    #[test]
    fn test_drain_reaches_session() {
        let clock = ManualClock::new(0);
        let mut session = running_session(&clock);

        let queue = InputQueue::default();
        let sender = queue.sender();
        std::thread::spawn(move || {
            sender.submit(InputEvent::up(120.0, 300.0));
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain_into(&mut session), 1);
        assert_eq!(queue.pending_count(), 0);
        clock.advance(16);
        session.update();
        assert!(!session.player().has_turn);
    }
}
