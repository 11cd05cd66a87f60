use crate::game::player::PlayerId;
use crate::game::state::GameState;
use crate::wire::{Event, Protocol, ServerMessage};
use log::warn;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A command from the hosting layer affecting a table it does not own:
/// registering/deregistering a connection's outbound sender, or seating a
/// newly-joined player into an open seat. Delivered over
/// [`ConnectionChannel`] rather than mutating the table's state directly,
/// since both the `Broadcaster` and the `GameState` are privately owned by
/// the running table task.
pub enum ConnectionCommand {
    Connect(PlayerId, UnboundedSender<ServerMessage>),
    Disconnect(PlayerId),
    Seat { player_id: PlayerId, name: String, buy_in: crate::game::player::Chips },
}

/// The channel the Casino's WebSocket bridge uses to register and
/// deregister a seat's outbound sender with a running table.
pub struct ConnectionChannel {
    sender: UnboundedSender<ConnectionCommand>,
    receiver: UnboundedReceiver<ConnectionCommand>,
}

impl ConnectionChannel {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> ConnectionHandle {
        ConnectionHandle { sender: self.sender.clone() }
    }

    pub async fn recv(&mut self) -> Option<ConnectionCommand> {
        self.receiver.recv().await
    }
}

impl Default for ConnectionChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct ConnectionHandle {
    sender: UnboundedSender<ConnectionCommand>,
}

impl ConnectionHandle {
    pub fn connect(&self, player_id: PlayerId, sender: UnboundedSender<ServerMessage>) {
        let _ = self.sender.send(ConnectionCommand::Connect(player_id, sender));
    }
    pub fn disconnect(&self, player_id: PlayerId) {
        let _ = self.sender.send(ConnectionCommand::Disconnect(player_id));
    }
    pub fn seat(&self, player_id: PlayerId, name: String, buy_in: crate::game::player::Chips) {
        let _ = self.sender.send(ConnectionCommand::Seat { player_id, name, buy_in });
    }
}

/// The per-table connection registry: one outbound channel per seat.
/// Disconnected seats keep their slot as `None` rather than shrinking the
/// vector, so seat indices stay stable. Send failures are logged and the
/// registry continues rather than propagating the error, since one
/// slow/gone client must never stall the hand for everyone else.
pub struct Broadcaster {
    senders: Vec<Option<UnboundedSender<ServerMessage>>>,
}

impl Broadcaster {
    pub fn new(seats: usize) -> Self {
        Self {
            senders: (0..seats).map(|_| None).collect(),
        }
    }

    pub fn connect(&mut self, player_id: PlayerId, sender: UnboundedSender<ServerMessage>) {
        self.senders[player_id] = Some(sender);
    }

    pub fn disconnect(&mut self, player_id: PlayerId) {
        self.senders[player_id] = None;
    }

    pub fn is_connected(&self, player_id: PlayerId) -> bool {
        self.senders.get(player_id).is_some_and(Option::is_some)
    }

    pub fn unicast(&self, player_id: PlayerId, message: ServerMessage) {
        match self.senders.get(player_id).and_then(Option::as_ref) {
            Some(sender) => {
                if sender.send(message).is_err() {
                    warn!("failed to unicast to player {player_id}: receiver dropped");
                }
            }
            None => warn!("unicast to disconnected player {player_id} dropped"),
        }
    }

    /// Encodes `event` once per connected seat via [`Protocol::encode`] (a
    /// pure `(event, player_id) -> payload` function) and sends each result
    /// to its own connection. Never builds one shared payload and mutates
    /// it per-recipient, which would race across the fan-out.
    pub fn broadcast_personalized(&self, event: &Event, state: &GameState) {
        for (player_id, sender) in self.senders.iter().enumerate() {
            let Some(sender) = sender else { continue };
            if let Some(message) = Protocol::encode(event, state, player_id) {
                if sender.send(message).is_err() {
                    warn!("failed to deliver event to player {player_id}: receiver dropped");
                }
            }
        }
    }

    pub fn connected_count(&self) -> usize {
        self.senders.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::betting::Variant;
    use crate::game::player::Player;
    use crate::game::state::Blinds;
    use tokio::sync::mpsc::unbounded_channel;

    fn state() -> GameState {
        GameState::new(
            Variant::NoLimit,
            Blinds { small_blind: 1, big_blind: 2 },
            vec![Player::new(0, "a", false, 100), Player::new(1, "b", false, 100)],
        )
    }

    #[test]
    fn disconnect_clears_the_slot() {
        let mut b = Broadcaster::new(2);
        let (tx, _rx) = unbounded_channel();
        b.connect(0, tx);
        assert!(b.is_connected(0));
        b.disconnect(0);
        assert!(!b.is_connected(0));
    }

    #[test]
    fn broadcast_personalized_skips_disconnected_seats() {
        let mut b = Broadcaster::new(2);
        let (tx, mut rx) = unbounded_channel();
        b.connect(1, tx);
        let s = state();
        b.broadcast_personalized(&Event::HandOver, &s);
        assert!(rx.try_recv().is_ok());
        assert_eq!(b.connected_count(), 1);
    }
}
