//! An in-memory duplex frame channel for exercising `uic-session` without a
//! real socket (§1.4), mirroring the teacher's in-memory transport test
//! harnesses.

use tokio::sync::mpsc;
use uic_session::Message;

/// One end of a connected pair of in-memory transports.
pub struct DuplexEnd {
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
}

impl DuplexEnd {
    /// Send a frame to the peer end.
    pub async fn send(&self, message: Message) -> bool {
        self.tx.send(message).await.is_ok()
    }

    /// Receive the next frame from the peer end, or `None` once it is
    /// dropped.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }
}

/// Build a connected pair of in-memory transports, as if a client and
/// server were talking over a real socket.
pub fn duplex_pair(capacity: usize) -> (DuplexEnd, DuplexEnd) {
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (
        DuplexEnd { tx: a_tx, rx: a_rx },
        DuplexEnd { tx: b_tx, rx: b_rx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_sent_on_one_end_arrive_on_the_other() {
        let (mut client, mut server) = duplex_pair(4);

        assert!(
            client
                .send(Message::Ping {
                    session_id: "s1".to_string(),
                    timestamp: 0,
                })
                .await
        );
        let received = server.recv().await.unwrap();
        assert!(matches!(received, Message::Ping { .. }));

        assert!(
            server
                .send(Message::Pong {
                    session_id: "s1".to_string(),
                    timestamp: 0,
                })
                .await
        );
        let received = client.recv().await.unwrap();
        assert!(matches!(received, Message::Pong { .. }));
    }

    #[tokio::test]
    async fn dropping_one_end_closes_the_other_receiver() {
        let (client, mut server) = duplex_pair(4);
        drop(client);
        assert!(server.recv().await.is_none());
    }
}
