//! The message router.
//!
//! The switch owns the routing table of connected endpoints per room and
//! runs one forwarding loop per connection that drains that endpoint's
//! inbound wire and dispatches each announcement to its destination(s).
//! Delivery is best-effort: a destination that does not accept a message
//! within the forward timeout is skipped, and senders never learn whether
//! a message reached anyone.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;

use crate::domain::{Announcement, RoomId, SwitchWire, UserId};

/// How long a single destination may refuse a handoff before it is treated
/// as dead.
const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(1);

type RoutingTable = HashMap<RoomId, HashMap<UserId, mpsc::Sender<Announcement>>>;

/// The per-room routing table plus forwarding logic.
///
/// One switch instance is constructed per process and passed by reference
/// to all consumers; there is no global state.
pub struct Switch {
    fwd: RwLock<RoutingTable>,
    forward_timeout: Duration,
}

impl Switch {
    pub fn new() -> Self {
        Self::with_forward_timeout(DEFAULT_FORWARD_TIMEOUT)
    }

    /// Create a switch with a custom per-destination send timeout (tests).
    pub fn with_forward_timeout(forward_timeout: Duration) -> Self {
        Self {
            fwd: RwLock::new(HashMap::new()),
            forward_timeout,
        }
    }

    /// Register `wire` under `(room_id, user_id)` and start the forwarding
    /// loop for it, scoped to `cancel`.
    ///
    /// A prior entry for the same key is overwritten (reconnect semantics:
    /// last writer wins). The loop is spawned only after the table entry is
    /// committed, so an endpoint is routable exactly when its loop runs.
    pub async fn connect(
        self: &Arc<Self>,
        cancel: CancellationToken,
        room_id: RoomId,
        user_id: UserId,
        wire: SwitchWire,
    ) {
        {
            let mut fwd = self.fwd.write().await;
            fwd.entry(room_id.clone())
                .or_default()
                .insert(user_id.clone(), wire.outbound);
        }
        tracing::debug!("Endpoint '{}' connected to room '{}'", user_id, room_id);

        let switch = Arc::clone(self);
        tokio::spawn(async move {
            switch
                .forward_announcements(cancel, room_id, wire.inbound)
                .await;
        });
    }

    /// Remove the `(room_id, user_id)` routing entry if present.
    ///
    /// This does not stop the endpoint's forwarding loop; the caller must
    /// cancel the connection's token before or concurrently with this call,
    /// otherwise a stale loop keeps sourcing broadcasts until it is
    /// cancelled.
    pub async fn disconnect(&self, room_id: &RoomId, user_id: &UserId) {
        {
            let mut fwd = self.fwd.write().await;
            if let Some(endpoints) = fwd.get_mut(room_id) {
                endpoints.remove(user_id);
                if endpoints.is_empty() {
                    fwd.remove(room_id);
                }
            }
        }
        tracing::debug!("Endpoint '{}' disconnected from room '{}'", user_id, room_id);
    }

    /// Forward `ann` to every endpoint in the room except its source.
    ///
    /// `dst` is cleared first so an explicit broadcast can never be
    /// mistaken for a unicast. Failure to reach anyone is not an error.
    pub async fn broadcast(
        &self,
        cancel: &CancellationToken,
        mut ann: Announcement,
        room_id: &RoomId,
    ) {
        ann.dst.clear();
        if !self.forward(cancel, ann, room_id).await {
            tracing::debug!("Broadcast did not reach anyone in room '{}'", room_id);
        }
    }

    /// Drain one endpoint's inbound wire until the connection is cancelled
    /// or the pump drops its end.
    async fn forward_announcements(
        &self,
        cancel: CancellationToken,
        room_id: RoomId,
        mut inbound: mpsc::Receiver<Announcement>,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = inbound.recv() => match received {
                    None => break,
                    Some(ann) if ann.src.is_empty() => {
                        tracing::error!("Announcement with empty src in room '{}'", room_id);
                    }
                    Some(ann) => {
                        if !self.forward(&cancel, ann, &room_id).await {
                            tracing::debug!(
                                "Incoming announce was dropped in room '{}', nowhere to forward",
                                room_id
                            );
                        }
                    }
                },
            }
        }
        tracing::debug!("Forwarding loop for room '{}' stopped", room_id);
    }

    /// Dispatch one announcement; returns whether anyone received it.
    ///
    /// Targets are snapshotted under the shared lock, which is released
    /// before any send so a slow consumer can never block structural table
    /// changes.
    async fn forward(
        &self,
        cancel: &CancellationToken,
        ann: Announcement,
        room_id: &RoomId,
    ) -> bool {
        let targets: Vec<(UserId, mpsc::Sender<Announcement>)> = {
            let fwd = self.fwd.read().await;
            let Some(endpoints) = fwd.get(room_id) else {
                return false;
            };
            if ann.is_broadcast() {
                endpoints
                    .iter()
                    .filter(|(user_id, _)| user_id.as_str() != ann.src)
                    .map(|(user_id, tx)| (user_id.clone(), tx.clone()))
                    .collect()
            } else {
                match endpoints
                    .iter()
                    .find(|(user_id, _)| user_id.as_str() == ann.dst)
                {
                    Some((user_id, tx)) => vec![(user_id.clone(), tx.clone())],
                    None => {
                        tracing::debug!(
                            "Cannot forward '{}' from '{}', dst '{}' not found in room '{}'",
                            ann.kind,
                            ann.src,
                            ann.dst,
                            room_id
                        );
                        return false;
                    }
                }
            }
        };

        let mut sent = false;
        for (user_id, tx) in targets {
            let (ann_sent, canceled) = self.send(cancel, ann.clone(), &user_id, &tx).await;
            if canceled {
                break;
            }
            if ann_sent {
                sent = true;
            }
        }
        sent
    }

    /// Hand one announcement to one destination wire.
    ///
    /// Races the caller's cancellation against the forward timeout against
    /// a successful handoff. Returns `(sent, canceled)`; a timeout only
    /// marks this destination dead, it does not abort the caller's fan-out.
    async fn send(
        &self,
        cancel: &CancellationToken,
        ann: Announcement,
        user_id: &UserId,
        tx: &mpsc::Sender<Announcement>,
    ) -> (bool, bool) {
        tokio::select! {
            _ = cancel.cancelled() => (false, true),
            result = tokio::time::timeout(self.forward_timeout, tx.send(ann)) => match result {
                Ok(Ok(())) => {
                    tracing::trace!("Announce forwarded to '{}'", user_id);
                    (true, false)
                }
                Ok(Err(_)) => {
                    // Receiver dropped its wire; same outcome as no route.
                    tracing::debug!("Wire of endpoint '{}' is closed", user_id);
                    (false, false)
                }
                Err(_) => {
                    tracing::error!("Dead endpoint '{}', send timed out", user_id);
                    (false, false)
                }
            },
        }
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}
