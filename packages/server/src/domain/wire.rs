//! The per-connection channel pair between the pump and the switch.

use tokio::sync::mpsc;

use super::Announcement;

/// Channel capacity of one wire direction.
///
/// Capacity 1 keeps the handoff effectively synchronous: a producer that is
/// faster than its consumer blocks until the switch's send timeout expires.
const WIRE_CAPACITY: usize = 1;

/// Pump-side ends of a wire: the receiver loop writes decoded announcements
/// into `inbound`, the sender loop drains `outbound` towards the transport.
pub struct PumpWire {
    pub inbound: mpsc::Sender<Announcement>,
    pub outbound: mpsc::Receiver<Announcement>,
}

/// Switch-side ends of a wire: the forwarding loop drains `inbound`,
/// the routing table keeps `outbound` as the endpoint's delivery target.
pub struct SwitchWire {
    pub inbound: mpsc::Receiver<Announcement>,
    pub outbound: mpsc::Sender<Announcement>,
}

/// Create the wire for one connection attempt.
///
/// Each direction is single-producer/single-consumer by construction:
/// only the receiver loop writes `inbound`, only the switch writes
/// `outbound`.
pub fn new_wire() -> (PumpWire, SwitchWire) {
    let (inbound_tx, inbound_rx) = mpsc::channel(WIRE_CAPACITY);
    let (outbound_tx, outbound_rx) = mpsc::channel(WIRE_CAPACITY);
    (
        PumpWire {
            inbound: inbound_tx,
            outbound: outbound_rx,
        },
        SwitchWire {
            inbound: inbound_rx,
            outbound: outbound_tx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[tokio::test]
    async fn test_wire_carries_announcements_between_ends() {
        // テスト項目: pump 側で書いたメッセージが switch 側で読める
        // given (前提条件):
        let (pump, mut switch) = new_wire();
        let alice = UserId::new("alice".to_string()).unwrap();
        let ann = Announcement::server(&alice, "offer");

        // when (操作):
        pump.inbound.send(ann.clone()).await.unwrap();
        let received = switch.inbound.recv().await;

        // then (期待する結果):
        assert_eq!(received, Some(ann));
    }

    #[tokio::test]
    async fn test_dropping_switch_end_closes_pump_sender() {
        // テスト項目: switch 側を破棄すると pump 側の送信がエラーになる
        // given (前提条件):
        let (pump, switch) = new_wire();
        let alice = UserId::new("alice".to_string()).unwrap();
        drop(switch);

        // when (操作):
        let result = pump.inbound.send(Announcement::server(&alice, "offer")).await;

        // then (期待する結果):
        assert!(result.is_err());
    }
}
