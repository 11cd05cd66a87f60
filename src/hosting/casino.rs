use crate::broadcast::{ConnectionChannel, ConnectionHandle};
use crate::dispatch::{ActionChannel, ActionHandle};
use crate::game::player::{Chips, Player, PlayerId};
use crate::game::{Blinds, Table, TableId, Variant};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Seats fall back to this stack when a table is created without an
/// explicit `starting_stack`: 100 big blinds, a conventional deep-stack
/// buy-in.
fn default_buy_in(blinds: Blinds) -> Chips {
    blinds.big_blind * 100
}

/// Everything the lobby needs to reach a running table without touching
/// its privately-owned `GameState`: the channel a client's actions flow
/// into, the channel its connection is registered on, and an independent
/// record of which seats are taken (by display name), used only to decide
/// whether a join can be accepted and which seat it lands in.
struct TableHandle {
    variant: Variant,
    blinds: Blinds,
    actions: ActionHandle,
    connections: ConnectionHandle,
    seats: Arc<Mutex<Vec<Option<String>>>>,
}

/// A lobby entry as returned by [`Casino::list`].
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub id: TableId,
    pub variant: Variant,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub seats_total: usize,
    pub seats_open: usize,
}

/// Manages the set of live tables. Touched only at table-creation, join,
/// and teardown, never inside a hand's hot loop.
pub struct Casino {
    tables: RwLock<HashMap<TableId, TableHandle>>,
    decision_timeout: std::time::Duration,
    showdown_timeout: std::time::Duration,
    default_small_blind: Chips,
    default_big_blind: Chips,
}

impl Default for Casino {
    fn default() -> Self {
        Self::from_config(&crate::config::Config::default())
    }
}

impl Casino {
    /// Builds a casino using the hosting layer's configured decision
    /// timeout, showdown pause, and fallback blinds for tables created
    /// without explicit ones.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            decision_timeout: config.decision_timeout,
            showdown_timeout: config.showdown_timeout,
            default_small_blind: config.default_small_blind,
            default_big_blind: config.default_big_blind,
        }
    }

    /// The blinds a newly created table falls back to when the request
    /// doesn't specify its own.
    pub fn default_blinds(&self) -> Blinds {
        Blinds { small_blind: self.default_small_blind, big_blind: self.default_big_blind }
    }

    /// Opens a new table with `seats` empty chairs, `bot_count` of which
    /// (lowest-indexed first) are immediately filled by `RandomBot`
    /// players, and spawns its orchestrator task. Returns the new table's
    /// id; the table starts idling on `Phase::Waiting` until two seats
    /// carry chips — no separate `/start` handshake.
    pub async fn open_table(
        &self,
        variant: Variant,
        blinds: Blinds,
        seats: usize,
        bot_count: usize,
        starting_stack: Option<Chips>,
    ) -> TableId {
        let stack = starting_stack.unwrap_or_else(|| default_buy_in(blinds));
        let id = TableId::new();
        let mut seat_names = vec![None; seats];
        let players: Vec<Player> = (0..seats)
            .map(|i| {
                if i < bot_count {
                    seat_names[i] = Some(format!("bot-{i}"));
                    Player::new(i, format!("bot-{i}"), true, stack)
                } else {
                    Player::new(i, "open seat", false, 0)
                }
            })
            .collect();

        let mut table = Table::new(id, variant, blinds, players)
            .with_decision_timeout(self.decision_timeout)
            .with_showdown_pause(self.showdown_timeout);
        let actions = ActionChannel::new();
        let connections = ConnectionChannel::new();
        let action_handle = actions.handle();
        let connection_handle = connections.handle();

        tokio::spawn(async move {
            table.run(actions, connections).await;
            log::info!("table {} stopped running", table.id);
        });

        self.tables.write().await.insert(
            id,
            TableHandle {
                variant,
                blinds,
                actions: action_handle,
                connections: connection_handle,
                seats: Arc::new(Mutex::new(seat_names)),
            },
        );
        log::info!("opened table {id} ({seats} seats, {bot_count} bots)");
        id
    }

    /// Removes a table from the lobby. The table's own task is not
    /// cancelled (no durable state to flush; process shutdown is the only
    /// thing that cancels table tasks) — this only stops routing new joins
    /// and listings to it.
    pub async fn close(&self, id: TableId) -> anyhow::Result<()> {
        self.tables
            .write()
            .await
            .remove(&id)
            .map(|_| log::info!("closed table {id}"))
            .ok_or_else(|| anyhow::anyhow!("table {id} not found"))
    }

    pub async fn list(&self) -> Vec<TableSummary> {
        let tables = self.tables.read().await;
        let mut out = Vec::with_capacity(tables.len());
        for (&id, handle) in tables.iter() {
            let seats = handle.seats.lock().await;
            out.push(TableSummary {
                id,
                variant: handle.variant,
                small_blind: handle.blinds.small_blind,
                big_blind: handle.blinds.big_blind,
                seats_total: seats.len(),
                seats_open: seats.iter().filter(|s| s.is_none()).count(),
            });
        }
        out
    }

    /// Claims the lowest-indexed open seat for `name`, seats it into the
    /// table's `GameState` via a connection command, and returns the new
    /// player's seat index along with the handles the WebSocket bridge
    /// needs. A default buy-in is used; there is no separate buy-in
    /// endpoint since nothing here persists a player's bankroll across
    /// tables.
    async fn claim_seat(&self, id: TableId, name: &str) -> anyhow::Result<(PlayerId, ActionHandle, ConnectionHandle)> {
        let tables = self.tables.read().await;
        let handle = tables.get(&id).ok_or_else(|| anyhow::anyhow!("table {id} not found"))?;
        let mut seats = handle.seats.lock().await;
        let seat = seats
            .iter()
            .position(|s| s.is_none())
            .ok_or_else(|| anyhow::anyhow!("table is full"))?;
        seats[seat] = Some(name.to_string());
        let buy_in = default_buy_in(handle.blinds);
        handle.connections.seat(seat, name.to_string(), buy_in);
        Ok((seat, handle.actions.clone(), handle.connections.clone()))
    }

    /// Bridges an upgraded WebSocket session to a table: claims a seat for
    /// `name`, registers the connection's outbound sender, relays frames
    /// in both directions (a `tokio::select!` loop ferrying typed
    /// `ServerMessage`s out and `ClientMessage`s in), and deregisters on
    /// disconnect.
    pub async fn bridge(
        &self,
        id: TableId,
        name: String,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use crate::wire::{ClientMessage, Protocol};
        use futures::StreamExt;

        let (player_id, actions, connections) = self.claim_seat(id, &name).await?;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        connections.connect(player_id, tx);
        log::info!("player {player_id} ({name}) joined table {id}");

        actix_web::rt::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(message) => {
                            if session.text(message.to_json()).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    frame = stream.next() => match frame {
                        Some(Ok(actix_ws::Message::Text(text))) => {
                            match Protocol::decode(&text) {
                                Ok(ClientMessage::Action { action }) => {
                                    if let Ok(action) = Protocol::parse_action(action) {
                                        let _ = actions.submit(player_id, action);
                                    }
                                }
                                Ok(ClientMessage::Ping) => {}
                                Ok(ClientMessage::Chat { .. }) => {}
                                Err(e) => log::warn!("dropping malformed message from player {player_id}: {e}"),
                            }
                        }
                        Some(Ok(actix_ws::Message::Close(_))) | Some(Err(_)) | None => break,
                        _ => continue,
                    },
                }
            }
            connections.disconnect(player_id);
            log::info!("player {player_id} disconnected from table {id}");
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_table_is_listed_with_open_seats() {
        let casino = Casino::default();
        let blinds = Blinds { small_blind: 1, big_blind: 2 };
        let id = casino.open_table(Variant::NoLimit, blinds, 6, 1, None).await;
        let listing = casino.list().await;
        let summary = listing.iter().find(|t| t.id == id).unwrap();
        assert_eq!(summary.seats_total, 6);
        assert_eq!(summary.seats_open, 5);
    }

    #[tokio::test]
    async fn closing_an_unknown_table_errors() {
        let casino = Casino::default();
        assert!(casino.close(TableId::new()).await.is_err());
    }

    #[tokio::test]
    async fn claim_seat_rejects_a_full_table() {
        let casino = Casino::default();
        let blinds = Blinds { small_blind: 1, big_blind: 2 };
        let id = casino.open_table(Variant::NoLimit, blinds, 1, 1, None).await;
        assert!(casino.claim_seat(id, "late").await.is_err());
    }

    #[test]
    fn default_blinds_come_from_config() {
        let config = crate::config::Config {
            default_small_blind: 5,
            default_big_blind: 10,
            ..crate::config::Config::default()
        };
        let casino = Casino::from_config(&config);
        let blinds = casino.default_blinds();
        assert_eq!(blinds.small_blind, 5);
        assert_eq!(blinds.big_blind, 10);
    }
}
