use crate::bots::{BotStrategy, GameView};
use crate::error::PokerError;
use crate::game::action::Action;
use crate::game::player::PlayerId;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One submitted action, tagged with the seat it came from so the
/// orchestrator can reject anything out of turn.
pub struct Submission {
    pub player_id: PlayerId,
    pub action: Action,
}

/// The per-hand inbound channel human and bot actions are both delivered
/// through; the one message-passing primitive shared by every actor.
/// Closed when the hand ends.
pub struct ActionChannel {
    sender: UnboundedSender<Submission>,
    receiver: UnboundedReceiver<Submission>,
}

impl ActionChannel {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> ActionHandle {
        ActionHandle { sender: self.sender.clone() }
    }

    pub async fn recv(&mut self) -> Option<Submission> {
        self.receiver.recv().await
    }
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable sender side of the channel, held by the WebSocket bridge (for
/// humans) and by scheduled bot tasks.
#[derive(Clone)]
pub struct ActionHandle {
    sender: UnboundedSender<Submission>,
}

impl ActionHandle {
    pub fn submit(&self, player_id: PlayerId, action: Action) -> Result<(), PokerError> {
        self.sender
            .send(Submission { player_id, action })
            .map_err(|_| PokerError::InvariantViolation("action channel closed".into()))
    }
}

/// Schedules a bot's decision after a uniformly random delay in
/// `[0.5s, 2.0s]`, submitting it through the same channel a human would use.
/// The returned `JoinHandle` is the cancellation token: dropping or aborting
/// it discards the pending decision, used when the hand ends (e.g.
/// all-fold) before the timer fires.
pub fn schedule_bot_action(
    handle: ActionHandle,
    player_id: PlayerId,
    strategy: std::sync::Arc<dyn BotStrategy>,
    view: GameView,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let delay_ms = rand::rng().random_range(500..=2000);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        let action = strategy.decide(&view);
        let _ = handle.submit(player_id, action);
    })
}
