// Debug logging module for asynchronous decision logging
//
// Fire-and-forget JSONL logging of each turn's decision so the
// request/response cycle never waits on the filesystem. The resulting file
// is the input format of the replay engine.

use log::error;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;

use crate::config::DebugConfig;
use crate::types::{Board, Direction, SafetyMap};

/// A single decision record: the snapshot, the surviving directions, and
/// the move that was ultimately chosen
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    chosen_move: String,
    safe_moves: Vec<String>,
    you_id: String,
    board: Board,
    timestamp: String,
}

/// Shared debug logger state
/// The file handle is shared across spawned writer tasks behind a mutex
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a debug logger from configuration
    /// When enabled, the log file is created (truncating any previous run)
    pub fn from_config(config: &DebugConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", config.log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!(
                    "Failed to create debug log file '{}': {}",
                    config.log_file_path, e
                );
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// Serialization and the file write happen on a blocking task off the
    /// request path; write failures are logged, never propagated
    pub fn log_move(
        &self,
        turn: i32,
        board: &Board,
        you_id: &str,
        safety: &SafetyMap,
        chosen_move: Direction,
    ) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let board = board.clone();
        let you_id = you_id.to_string();
        let safe_moves = safety
            .safe_directions()
            .iter()
            .map(|d| d.as_str().to_string())
            .collect();
        let chosen_move = chosen_move.as_str().to_string();

        tokio::task::spawn_blocking(move || {
            Self::write_entry(file_handle, turn, board, you_id, safe_moves, chosen_move);
        });
    }

    /// Performs the actual serialized write, one JSON object per line
    fn write_entry(
        file_handle: Arc<Mutex<Option<File>>>,
        turn: i32,
        board: Board,
        you_id: String,
        safe_moves: Vec<String>,
        chosen_move: String,
    ) {
        let mut file_guard = file_handle.lock();

        if let Some(file) = file_guard.as_mut() {
            let entry = DebugLogEntry {
                turn,
                chosen_move,
                safe_moves,
                you_id,
                board,
                timestamp: chrono::Utc::now().to_rfc3339(),
            };

            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    if let Err(e) = writeln!(file, "{}", json_line) {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush() {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}
