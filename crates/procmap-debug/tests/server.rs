use std::sync::Arc;

use procmap_debug::{
    DebugClient, DebugCommand, DebugHandler, DebugResponse, DebugServer, ResponseData, TileInfo,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

struct FixedTiles {
    tiles: Vec<TileInfo>,
    moves: Vec<[f32; 3]>,
}

impl DebugHandler for FixedTiles {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
        match cmd {
            DebugCommand::Ping => DebugResponse::pong(),
            DebugCommand::GetTiles => DebugResponse::ok(ResponseData::Tiles {
                tiles: self.tiles.clone(),
            }),
            DebugCommand::SetObserver { x, y, z } => {
                self.moves.push([x, y, z]);
                DebugResponse::none()
            }
            DebugCommand::GetStreamingState => DebugResponse::error("not streaming"),
        }
    }
}

fn tile(x: i32, y: i32) -> TileInfo {
    TileInfo {
        x,
        y,
        name: format!("Chunk ({}, {})", x, y),
        world_origin: [x as f32 * 12.0, 0.0, y as f32 * 12.0],
        min_height: 0.5,
        max_height: 4.0,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handler = Arc::new(Mutex::new(FixedTiles {
        tiles: vec![tile(0, 0), tile(1, 0)],
        moves: Vec::new(),
    }));
    let _server = DebugServer::start_with_listener(handler.clone(), listener);

    let (pong, tiles, moved, state) = tokio::task::spawn_blocking(move || {
        let mut client = DebugClient::connect(port).unwrap();
        let pong = client.send(&DebugCommand::Ping).unwrap();
        let tiles = client.get_tiles().unwrap();
        let moved = client
            .send(&DebugCommand::SetObserver { x: 12.0, y: 0.0, z: -24.0 })
            .unwrap();
        let state = client.send(&DebugCommand::GetStreamingState).unwrap();
        (pong, tiles, moved, state)
    })
    .await
    .unwrap();

    assert_eq!(pong, DebugResponse::pong());
    assert_eq!(tiles, vec![tile(0, 0), tile(1, 0)]);
    assert_eq!(moved, DebugResponse::none());
    assert_eq!(state, DebugResponse::error("not streaming"));
    assert_eq!(handler.lock().await.moves, vec![[12.0, 0.0, -24.0]]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_json_gets_error_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handler = Arc::new(Mutex::new(FixedTiles { tiles: Vec::new(), moves: Vec::new() }));
    let _server = DebugServer::start_with_listener(handler, listener);

    let line = tokio::task::spawn_blocking(move || {
        use std::io::{BufRead, BufReader, Write};
        let mut stream = std::net::TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream.write_all(b"{\"cmd\":\"Explode\"}\n").unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).unwrap();
        line
    })
    .await
    .unwrap();

    let response: DebugResponse = serde_json::from_str(&line).unwrap();
    assert!(matches!(response, DebugResponse::Error { ref message } if message.starts_with("Invalid command JSON")));
}
