//! Adapter module - drive a tile-match session over a JSON line protocol
//!
//! External presentation layers and automated players talk to the engine through a
//! **line-delimited JSON protocol**, over TCP or stdin/stdout.
//!
//! 1. **Connection**: client connects (default: 127.0.0.1:7878) or pipes stdio
//! 2. **Handshake**: client sends `hello`, server responds with `welcome` and an observation
//! 3. **Commanding**: `select`, `swap`, `settle`, `reset`, `observe`
//! 4. **Replies**: `outcome` for selections and swaps, then an `observation`
//!
//! Every connection owns a private session. The adapter never renders or animates; a
//! committed `outcome` lists each cascade round (matched cells, falls, spawns) and the
//! client decides how to show them.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: `seq`, `client {name, version}`, `protocol_version`
//! - **select**: `seq`, `row`, `col`
//! - **swap**: `seq`, `from {row, col}`, `to {row, col}`
//! - **settle** / **reset** / **observe**: `seq`
//!
//! ## Server → Client
//!
//! - **welcome**: grid size, palette with hex swatches, move budget, base points
//! - **outcome**: `pending`, `reselected`, `reverted`, `committed`, `rejected`, `fault`
//! - **observation**: score, moves left, phase flags, selection, board colors and ids
//! - **error**: `handshake_required`, `invalid_message`, `protocol_mismatch`
//!
//! # Environment Variables
//!
//! - `TILE_MATCH_HOST`: bind address (default: "127.0.0.1")
//! - `TILE_MATCH_PORT`: port number (default: 7878)
//! - `TILE_MATCH_STDIO`: set to "1" or "true" to serve stdin/stdout instead of TCP
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","grid_size":8,...}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000000,"score":0,"moves_left":30,...}
//! Client -> Server: {"type":"swap","seq":2,"from":{"row":2,"col":3},"to":{"row":2,"col":4}}
//! Server -> Client: {"type":"outcome","seq":2,"ts":1700000000001,"outcome":{"kind":"committed","score_delta":30,...}}
//! Server -> Client: {"type":"observation","seq":2,"ts":1700000000001,"score":30,"moves_left":29,...}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod server;

pub use tile_match_core as core;
pub use tile_match_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::*;
