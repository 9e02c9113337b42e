//! Scripted remote console server for end-to-end tests over loopback TCP

use arkrcon::protocol::{FramedPacket, Packet, PacketKind};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct MockServer {
    pub address: String,
    received: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Accept a single client, authenticate it against `password` and answer
    /// every command with `respond(command)`.
    pub async fn start<F>(password: &str, respond: F) -> Self
    where
        F: Fn(&str) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let received = Arc::new(Mutex::new(Vec::new()));
        let password = password.to_string();

        let log = Arc::clone(&received);
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let framed = FramedPacket::default();

            let auth = framed.read_packet(&mut stream).await.unwrap();
            assert_eq!(auth.kind, PacketKind::AUTH);
            let auth_id = if auth.body == password { auth.id } else { -1 };
            framed
                .write_packet(&mut stream, &Packet::new(auth.id, PacketKind::RESPONSE_VALUE, ""))
                .await
                .unwrap();
            framed
                .write_packet(&mut stream, &Packet::new(auth_id, PacketKind::AUTH_RESPONSE, ""))
                .await
                .unwrap();
            if auth_id == -1 {
                return;
            }

            while let Ok(request) = framed.read_packet(&mut stream).await {
                log.lock().unwrap().push(request.body.clone());
                let reply = Packet::new(request.id, PacketKind::RESPONSE_VALUE, respond(&request.body));
                if framed.write_packet(&mut stream, &reply).await.is_err() {
                    break;
                }
            }
        });

        Self {
            address,
            received,
            handle,
        }
    }

    /// Commands received so far, in order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Wait for the client to disconnect
    pub async fn finish(self) -> Vec<String> {
        let Self { received, handle, .. } = self;
        handle.await.unwrap();
        let commands = received.lock().unwrap().clone();
        commands
    }
}

/// Replies the way an ARK server answers the commands used in tests
pub fn ark_like_reply(command: &str) -> String {
    let mut parts = command.splitn(2, ' ');
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default();

    match verb {
        "listplayers" => "\n0. CyFreeze, 76561198025588951 \n1. Bob The Builder, 76561198000000002 \n".to_string(),
        "getchat" => "SERVER: hello\nCyFreeze (Bob The Builder): foobar\n".to_string(),
        "saveworld" => "World Saved \n".to_string(),
        "doexit" => "Exiting... \n".to_string(),
        "banplayer" => format!("{} Banned \n", arg),
        "kickplayer" => format!("{} Kicked \n", arg),
        "unbanplayer" => format!("{} Unbanned \n", arg),
        "allowplayertojoinnocheck" => format!("{} Allow Player To Join No Check \n", arg),
        "disallowplayertojoinnocheck" => format!("{} Disallowed Player To Join No Check \n", arg),
        "setmessageoftheday" => format!("Message of set to {} \n", arg),
        _ => "Server received, But no response!! \n".to_string(),
    }
}
