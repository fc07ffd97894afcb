use crate::api::state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use lockwatch_core::{CountdownPresenter, CountdownSnapshot, TimeLeft};
use serde::Serialize;

/// Events pushed to a connected viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
enum ViewerEvent {
    Locker { number: String },
    Tick(TimeLeft),
    Expired,
}

impl ViewerEvent {
    fn from_snapshot(snapshot: CountdownSnapshot) -> Self {
        match snapshot {
            CountdownSnapshot::Running(time_left) => ViewerEvent::Tick(time_left),
            CountdownSnapshot::Expired => ViewerEvent::Expired,
        }
    }
}

// GET /api/locker/ws
pub async fn viewer_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if let Err(err) = stream_viewer(socket, state).await {
            tracing::warn!("Viewer stream error: {}", err);
        }
        tracing::debug!("Viewer disconnected");
    })
}

/// Drive one viewer connection.
///
/// The connection owns its own countdown presenter and locker subscription;
/// both are torn down when the socket closes.
async fn stream_viewer(socket: WebSocket, state: AppState) -> anyhow::Result<()> {
    let (mut sender, mut receiver) = socket.split();

    let mut presenter = CountdownPresenter::spawn(&state.locker);
    let mut subscription = state.locker.subscribe();

    // Registration delivery: the current number, then the initial countdown.
    let current = ViewerEvent::Locker {
        number: subscription.current().to_string(),
    };
    send_event(&mut sender, &current).await?;
    send_event(&mut sender, &ViewerEvent::from_snapshot(presenter.snapshot())).await?;

    loop {
        tokio::select! {
            snapshot = presenter.changed() => match snapshot {
                Some(snapshot) => {
                    send_event(&mut sender, &ViewerEvent::from_snapshot(snapshot)).await?;
                }
                None => break,
            },
            update = subscription.recv() => match update {
                Some(update) => {
                    let event = ViewerEvent::Locker {
                        number: update.number.to_string(),
                    };
                    send_event(&mut sender, &event).await?;
                }
                None => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!("Viewer socket closed: {}", err);
                    break;
                }
            },
        }
    }

    presenter.shutdown();
    subscription.unsubscribe();
    Ok(())
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ViewerEvent,
) -> anyhow::Result<()> {
    let payload = serde_json::to_string(event)?;
    sender.send(Message::Text(payload.into())).await?;
    Ok(())
}
