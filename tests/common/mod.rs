#![allow(dead_code)]

use reversi_client::protocol::board_to_wire;
use reversi_client::{
    Board, ClientHandle, InMemoryTransport, Rows, Side, Snapshot, Transport, BOARD_SIZE,
    HEARTBEAT_FRAME,
};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};

pub const WAIT: Duration = Duration::from_secs(5);

/// Board from eight strings of `B`, `W` and `.`, one per row (top row first).
pub fn board_from_strs(rows: [&str; 8]) -> Board {
    let mut grid: Rows = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            grid[y][x] = match ch {
                'B' => Some(Side::Black),
                'W' => Some(Side::White),
                _ => None,
            };
        }
    }
    Board::from_rows(grid)
}

/// The standard opening position.
pub fn start_board() -> Board {
    board_from_strs([
        "........",
        "........",
        "........",
        "...WB...",
        "...BW...",
        "........",
        "........",
        "........",
    ])
}

pub fn game_state_json(board: &Board, current: Side, yours: Side) -> Value {
    json!({
        "type": "game_state",
        "board": board_to_wire(board),
        "current_player": current,
        "your_color": yours,
    })
}

/// Wait for a snapshot matching `pred`, failing after [`WAIT`].
pub async fn wait<F>(handle: &ClientHandle, pred: F) -> anyhow::Result<Snapshot>
where
    F: FnMut(&Snapshot) -> bool,
{
    Ok(timeout(WAIT, handle.wait_until(pred)).await??)
}

/// Server side of an in-memory connection, speaking JSON values.
pub struct FakeServer {
    transport: InMemoryTransport,
}

impl FakeServer {
    pub fn new(transport: InMemoryTransport) -> Self {
        Self { transport }
    }

    /// Next non-heartbeat frame from the client.
    pub async fn expect(&mut self) -> anyhow::Result<Value> {
        loop {
            let frame = timeout(WAIT, self.transport.recv())
                .await??
                .ok_or_else(|| anyhow::anyhow!("client closed the connection"))?;
            if frame != HEARTBEAT_FRAME {
                return Ok(serde_json::from_str(&frame)?);
            }
        }
    }

    /// `true` when the client sends nothing but heartbeats for `dur`.
    pub async fn is_silent_for(&mut self, dur: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + dur;
        loop {
            match tokio::time::timeout_at(deadline, self.transport.recv()).await {
                Err(_) => return true,
                Ok(Ok(Some(frame))) if frame == HEARTBEAT_FRAME => continue,
                Ok(_) => return false,
            }
        }
    }

    pub async fn send(&mut self, value: Value) -> anyhow::Result<()> {
        self.transport.send(value.to_string()).await
    }

    pub async fn send_raw(&mut self, frame: &str) -> anyhow::Result<()> {
        self.transport.send(frame.to_string()).await
    }

    pub async fn success(&mut self, message: &str) -> anyhow::Result<()> {
        self.send(json!({ "type": "success", "message": message }))
            .await
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.transport.close().await
    }
}
