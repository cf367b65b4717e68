//! Browser websocket loop feeding a [`SyncChannel`].
//!
//! The loop connects to the hub, pumps queued outbound bytes into the socket,
//! hands every inbound binary message to the channel, and reconnects with
//! [`Backoff`] whenever the socket drops. The channel only reports
//! `Connected` once the socket has actually opened.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedReceiver;
use leptos::prelude::{RwSignal, Set};

use crate::net::backoff::Backoff;
use crate::net::sync_channel::{ConnectionStatus, SyncChannel};
use crate::util::location::ws_url;

/// How often a connecting socket is checked for the open state.
const OPEN_POLL_MS: u64 = 50;

/// Create the app's channel and spawn its websocket lifecycle as a local task.
pub fn spawn_sync_channel(status: RwSignal<ConnectionStatus>) -> SyncChannel {
    let (tx, rx) = futures::channel::mpsc::unbounded::<Vec<u8>>();
    let channel = SyncChannel::new(tx);
    leptos::task::spawn_local(connection_loop(channel.clone(), status, rx));
    channel
}

fn set_status(channel: &SyncChannel, status: RwSignal<ConnectionStatus>, next: ConnectionStatus) {
    channel.set_connection_status(next);
    status.set(next);
}

/// Main connection loop with reconnect logic.
async fn connection_loop(channel: SyncChannel, status: RwSignal<ConnectionStatus>, rx: UnboundedReceiver<Vec<u8>>) {
    let rx = Rc::new(RefCell::new(rx));
    let mut backoff = Backoff::default();

    loop {
        set_status(&channel, status, ConnectionStatus::Connecting);

        let url = current_ws_url();
        let delay_ms = match connect_and_run(&url, &channel, status, &rx).await {
            Ok(()) => {
                log::info!("ws: disconnected from {url}");
                backoff.after_session()
            }
            Err(e) => {
                log::warn!("ws: connect to {url} failed: {e}");
                backoff.after_failure()
            }
        };

        set_status(&channel, status, ConnectionStatus::Disconnected);
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(delay_ms))).await;
    }
}

fn current_ws_url() -> String {
    let location = web_sys::window().map(|w| w.location());
    let protocol = location
        .as_ref()
        .and_then(|l| l.protocol().ok())
        .unwrap_or_default();
    let host = location
        .as_ref()
        .and_then(|l| l.host().ok())
        .unwrap_or_else(|| "localhost:5000".to_owned());
    ws_url(&protocol, &host)
}

/// Connect to the hub and process messages until disconnect.
async fn connect_and_run(
    url: &str,
    channel: &SyncChannel,
    status: RwSignal<ConnectionStatus>,
    rx: &Rc<RefCell<UnboundedReceiver<Vec<u8>>>>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    wait_open(&ws).await?;
    let (mut ws_write, mut ws_read) = ws.split();

    // Drop anything queued for the previous socket; publishes are not retried.
    let mut rx_borrow = rx.borrow_mut();
    while let Ok(Some(_)) = rx_borrow.try_next() {}

    set_status(channel, status, ConnectionStatus::Connected);

    let send_task = async {
        use futures::SinkExt;
        while let Some(bytes) = rx_borrow.next().await {
            if ws_write.send(Message::Bytes(bytes)).await.is_err() {
                break;
            }
        }
    };

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Bytes(bytes)) => {
                    channel.dispatch_bytes(&bytes);
                }
                Ok(Message::Text(_)) => {}
                Err(e) => {
                    log::warn!("ws: recv error: {e}");
                    break;
                }
            }
        }
    };

    // Run send/recv loops; when either finishes, the connection is done.
    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}

/// Resolve once `ws` is open; `Err` if it closes first.
///
/// `WebSocket::open` succeeds for any well-formed URL, so a refused
/// connection only shows up here.
async fn wait_open(ws: &gloo_net::websocket::futures::WebSocket) -> Result<(), String> {
    use gloo_net::websocket::State;

    loop {
        match ws.state() {
            State::Open => return Ok(()),
            State::Connecting => {
                gloo_timers::future::sleep(std::time::Duration::from_millis(OPEN_POLL_MS)).await;
            }
            State::Closing | State::Closed => return Err("socket closed before opening".to_owned()),
        }
    }
}
