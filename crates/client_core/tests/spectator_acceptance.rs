use std::time::Duration;

use axum::{
    extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    routing::get,
    Router,
};
use client_core::{ConnectionEvent, ConnectionManager, ConnectionSettings, DashboardState};
use shared::domain::{ErrorLevel, ModuleLocation};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};

const TRACE: [&str; 5] = [
    r#"{"type":"bomb","serial_number":"KT4N3","widgets":[]}"#,
    r#"{"type":"add_module","location":3,"module_type":1,"serial":"AB-1","state":"READY","error_level":"NONE","details":{}}"#,
    r#"{"type":"error","module":3,"level":"MAJOR","message":"x"}"#,
    r#"{"type":"error","module":3,"level":"INFO","message":"y"}"#,
    r#"{"type":"reset"}"#,
];

async fn replay_trace(mut socket: WebSocket) {
    let _ = socket.recv().await;
    for frame in TRACE {
        if socket.send(Message::Text(frame.to_string())).await.is_err() {
            return;
        }
    }
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: 1001,
            reason: "done".into(),
        })))
        .await;
}

#[tokio::test]
async fn example_trace_over_a_live_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/ws",
        get(|ws: WebSocketUpgrade| async move { ws.on_upgrade(replay_trace) }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let settings =
        ConnectionSettings::new(format!("ws://{addr}/ws"), "0.1-a1", None).expect("settings");
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    tokio::spawn(ConnectionManager::new(settings).run(events_tx));

    let slot = ModuleLocation::new(3).expect("slot");
    let mut state = DashboardState::default();
    let mut observed = Vec::new();
    timeout(Duration::from_secs(5), async {
        while let Some(event) = events_rx.recv().await {
            let closed = matches!(event, ConnectionEvent::Closed(_));
            let is_frame = matches!(event, ConnectionEvent::Frame(_));
            state.handle(event);
            if is_frame {
                observed.push(state.snapshot().map(|snapshot| {
                    (
                        snapshot.serial.clone(),
                        snapshot.occupied().count(),
                        snapshot.module(slot).map(|m| (m.name.clone(), m.error_level)),
                    )
                }));
            }
            if closed {
                break;
            }
        }
    })
    .await
    .expect("trace should complete");

    assert_eq!(
        observed,
        vec![
            Some(("KT4N3".to_string(), 0, None)),
            Some((
                "KT4N3".to_string(),
                1,
                Some(("Timer".to_string(), ErrorLevel::None))
            )),
            Some((
                "KT4N3".to_string(),
                1,
                Some(("Timer".to_string(), ErrorLevel::Major))
            )),
            Some((
                "KT4N3".to_string(),
                1,
                Some(("Timer".to_string(), ErrorLevel::Major))
            )),
            None,
        ]
    );

    let log: Vec<String> = state.log().iter().map(ToString::to_string).collect();
    assert_eq!(log.first().map(String::as_str), Some("[INFO] The server is shutting down"));
    assert!(log.contains(&"[MAJOR] Timer: x".to_string()));
    assert!(log.contains(&"[INFO] Timer: y".to_string()));
}
