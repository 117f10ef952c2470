//! Protocol module - JSON message types for the tile-match adapter
//!
//! Line-delimited JSON: one object per line, tagged by `type`. Every server message
//! carries `seq` (echo of the client message it answers) and `ts` (milliseconds).

use serde::{Deserialize, Serialize};

use crate::core::{CascadeReport, Compaction, GameConfig, GameSnapshot, SelectionOutcome};
use crate::types::{Color, Position, RejectReason};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Server Messages ==============

/// Client hello message (first message to establish a session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Grid coordinate on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl From<Position> for Coord {
    fn from(value: Position) -> Self {
        Self {
            row: value.row,
            col: value.col,
        }
    }
}

impl From<Coord> for Position {
    fn from(value: Coord) -> Self {
        Position::new(value.row, value.col)
    }
}

/// Click on one cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectMessage {
    pub seq: u64,
    pub row: u8,
    pub col: u8,
}

impl SelectMessage {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Direct swap of two cells
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwapMessage {
    pub seq: u64,
    pub from: Coord,
    pub to: Coord,
}

/// Messages that carry nothing but `seq` (`settle`, `reset`, `observe`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeqMessage {
    pub seq: u64,
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeType {
    #[serde(rename = "outcome")]
    Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "invalid_message")]
    InvalidMessage,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
}

/// Palette color on the wire (lowercase name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLower {
    Red,
    Blue,
    Green,
    Amber,
    Purple,
    Pink,
}

impl From<Color> for ColorLower {
    fn from(value: Color) -> Self {
        match value {
            Color::Red => Self::Red,
            Color::Blue => Self::Blue,
            Color::Green => Self::Green,
            Color::Amber => Self::Amber,
            Color::Purple => Self::Purple,
            Color::Pink => Self::Pink,
        }
    }
}

impl From<ColorLower> for Color {
    fn from(value: ColorLower) -> Self {
        match value {
            ColorLower::Red => Color::Red,
            ColorLower::Blue => Color::Blue,
            ColorLower::Green => Color::Green,
            ColorLower::Amber => Color::Amber,
            ColorLower::Purple => Color::Purple,
            ColorLower::Pink => Color::Pink,
        }
    }
}

/// Palette entry with the reference swatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swatch {
    pub name: ColorLower,
    pub hex: String,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub game_id: String,
    pub grid_size: u8,
    pub palette: Vec<Swatch>,
    pub move_budget: u32,
    pub base_points: u32,
}

/// Result of a `select` or `swap`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: OutcomeType,
    pub seq: u64,
    pub ts: u64,
    pub outcome: OutcomeBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeBody {
    Pending,
    Reselected,
    Reverted,
    Committed {
        score_delta: u32,
        combo_count: u32,
        rounds: Vec<RoundSummary>,
    },
    Rejected {
        reason: RejectReasonLower,
    },
    Fault {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReasonLower {
    NotAdjacent,
    SessionOver,
    Busy,
    OutOfBounds,
}

impl From<RejectReason> for RejectReasonLower {
    fn from(value: RejectReason) -> Self {
        match value {
            RejectReason::NotAdjacent => Self::NotAdjacent,
            RejectReason::SessionOver => Self::SessionOver,
            RejectReason::Busy => Self::Busy,
            RejectReason::OutOfBounds => Self::OutOfBounds,
        }
    }
}

/// One cascade round, enough for a client to animate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub combo_index: u32,
    pub cleared: usize,
    pub points: u32,
    pub matched: Vec<Coord>,
    pub falls: Vec<FallInfo>,
    pub spawns: Vec<SpawnInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallInfo {
    pub id: u32,
    pub from: Coord,
    pub to: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnInfo {
    pub id: u32,
    pub color: ColorLower,
    pub at: Coord,
}

/// Session state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub playable: bool,
    pub score: u32,
    pub moves_left: u32,
    pub game_over: bool,
    pub busy: bool,
    pub faulted: bool,
    pub last_combo: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Coord>,
    /// Rows of color names, row 0 at the top
    pub board: Vec<Vec<ColorLower>>,
    /// Rows of cell ids, same layout as `board`
    pub ids: Vec<Vec<u32>>,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Select(SelectMessage),
    Swap(SwapMessage),
    Settle(SeqMessage),
    Reset(SeqMessage),
    Observe(SeqMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

const KNOWN_TYPES: [&str; 6] = ["hello", "select", "swap", "settle", "reset", "observe"];

/// Parse a JSON message from a string.
///
/// A well-formed object with an unrecognized `type` is returned as
/// [`ParsedMessage::Unknown`]; anything else that fails to decode is an error.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Select(SelectMessage),
        Swap(SwapMessage),
        Settle(SeqMessage),
        Reset(SeqMessage),
        Observe(SeqMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Select(m)) => Ok(ParsedMessage::Select(m)),
        Ok(InboundMessage::Swap(m)) => Ok(ParsedMessage::Swap(m)),
        Ok(InboundMessage::Settle(m)) => Ok(ParsedMessage::Settle(m)),
        Ok(InboundMessage::Reset(m)) => Ok(ParsedMessage::Reset(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some(t) if !KNOWN_TYPES.contains(&t.as_str()) => {
                    Ok(ParsedMessage::Unknown(UnknownMessage {
                        seq: envelope.seq.unwrap_or(0),
                        msg_type: t,
                    }))
                }
                _ => Err(e),
            }
        }
    }
}

/// Pull `seq` out of a line that failed to parse, so the error can still echo it
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// True when a client version shares our major version
pub fn is_compatible_version(client: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    major(client.trim()).is_some() && major(client.trim()) == major(PROTOCOL_VERSION)
}

// ============== Utility Functions ==============

/// Create a hello message.
///
/// Client-side helper: the server only receives `hello`, it never sends one.
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        seq,
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

/// Create a welcome message describing the session's fixed configuration
pub fn create_welcome(seq: u64, protocol_version: &str, config: &GameConfig) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        game_id: "tile-match".to_string(),
        grid_size: config.grid_size,
        palette: config
            .palette
            .iter()
            .map(|c| Swatch {
                name: c.into(),
                hex: c.hex().to_string(),
            })
            .collect(),
        move_budget: config.move_budget,
        base_points: config.base_points,
    }
}

fn round_summaries(report: Option<&CascadeReport>) -> Vec<RoundSummary> {
    let Some(report) = report else {
        return Vec::new();
    };
    report
        .rounds
        .iter()
        .map(|round| {
            let Compaction {
                cleared,
                falls,
                spawns,
            } = &round.compaction;
            RoundSummary {
                combo_index: round.combo_index,
                cleared: *cleared,
                points: round.points,
                matched: round.matched.positions().map(Coord::from).collect(),
                falls: falls
                    .iter()
                    .map(|f| FallInfo {
                        id: f.id.get(),
                        from: f.from.into(),
                        to: f.to.into(),
                    })
                    .collect(),
                spawns: spawns
                    .iter()
                    .map(|s| SpawnInfo {
                        id: s.id.get(),
                        color: s.color.into(),
                        at: s.at.into(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Create an outcome message. `cascade` supplies the rounds of a committed swap.
pub fn create_outcome(
    seq: u64,
    outcome: &SelectionOutcome,
    cascade: Option<&CascadeReport>,
) -> OutcomeMessage {
    let body = match outcome {
        SelectionOutcome::Pending => OutcomeBody::Pending,
        SelectionOutcome::Reselected => OutcomeBody::Reselected,
        SelectionOutcome::Reverted => OutcomeBody::Reverted,
        SelectionOutcome::Committed {
            score_delta,
            combo_count,
            ..
        } => OutcomeBody::Committed {
            score_delta: *score_delta,
            combo_count: *combo_count,
            rounds: round_summaries(cascade),
        },
        SelectionOutcome::Rejected { reason } => OutcomeBody::Rejected {
            reason: (*reason).into(),
        },
        SelectionOutcome::Fault(fault) => OutcomeBody::Fault {
            message: fault.to_string(),
        },
    };

    OutcomeMessage {
        msg_type: OutcomeType::Outcome,
        seq,
        ts: current_timestamp_ms(),
        outcome: body,
    }
}

/// Create an observation from a session snapshot
pub fn create_observation(seq: u64, snap: &GameSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        episode_id: snap.episode_id,
        playable: snap.playable(),
        score: snap.score,
        moves_left: snap.moves_left,
        game_over: snap.game_over,
        busy: snap.busy,
        faulted: snap.faulted,
        last_combo: snap.last_combo,
        selection: snap.selection.map(Coord::from),
        board: snap
            .colors
            .iter()
            .map(|row| row.iter().map(|&c| c.into()).collect())
            .collect(),
        ids: snap
            .ids
            .iter()
            .map(|row| row.iter().map(|id| id.get()).collect())
            .collect(),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Session};
    use crate::types::Color::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"client":{"name":"test-ai","version":"1.0.0"},"protocol_version":"1.0.0"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "test-ai");
                assert_eq!(msg.protocol_version, "1.0.0");
            }
            other => panic!("Expected Hello message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_select_and_swap() {
        match parse_message(r#"{"type":"select","seq":2,"row":3,"col":4}"#).unwrap() {
            ParsedMessage::Select(msg) => assert_eq!(msg.position(), Position::new(3, 4)),
            other => panic!("Expected Select message, got {:?}", other),
        }

        let json = r#"{"type":"swap","seq":3,"from":{"row":2,"col":3},"to":{"row":2,"col":4}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Swap(msg) => {
                assert_eq!(Position::from(msg.from), Position::new(2, 3));
                assert_eq!(Position::from(msg.to), Position::new(2, 4));
            }
            other => panic!("Expected Swap message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_seq_only_messages() {
        assert!(matches!(
            parse_message(r#"{"type":"settle","seq":4}"#).unwrap(),
            ParsedMessage::Settle(SeqMessage { seq: 4 })
        ));
        assert!(matches!(
            parse_message(r#"{"type":"reset","seq":5}"#).unwrap(),
            ParsedMessage::Reset(SeqMessage { seq: 5 })
        ));
        assert!(matches!(
            parse_message(r#"{"type":"observe","seq":6}"#).unwrap(),
            ParsedMessage::Observe(SeqMessage { seq: 6 })
        ));
    }

    #[test]
    fn test_parse_unknown_and_malformed() {
        match parse_message(r#"{"type":"dance","seq":9}"#).unwrap() {
            ParsedMessage::Unknown(msg) => {
                assert_eq!(msg.seq, 9);
                assert_eq!(msg.msg_type, "dance");
            }
            other => panic!("Expected Unknown message, got {:?}", other),
        }

        // Known type with a bad field is a real error.
        assert!(parse_message(r#"{"type":"select","seq":2,"row":-1,"col":0}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"select"}"#), None);
        assert_eq!(extract_seq_best_effort(r#"{"seq":"x"}"#), None);
    }

    #[test]
    fn test_version_compatibility() {
        assert!(is_compatible_version("1.0.0"));
        assert!(is_compatible_version("1.4"));
        assert!(!is_compatible_version("2.0.0"));
        assert!(!is_compatible_version(""));
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, PROTOCOL_VERSION, &GameConfig::default());
        assert_eq!(welcome.msg_type, WelcomeType::Welcome);
        assert_eq!(welcome.grid_size, 8);
        assert_eq!(welcome.move_budget, 30);
        assert_eq!(welcome.palette.len(), 6);
        assert_eq!(welcome.palette[0].name, ColorLower::Red);
        assert_eq!(welcome.palette[0].hex, "#ef4444");

        let v = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["palette"][1]["name"], "blue");
    }

    #[test]
    fn test_outcome_serialization() {
        let rejected = create_outcome(
            7,
            &SelectionOutcome::Rejected {
                reason: RejectReason::OutOfBounds,
            },
            None,
        );
        let v = serde_json::to_value(&rejected).unwrap();
        assert_eq!(v["type"], "outcome");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["outcome"]["kind"], "rejected");
        assert_eq!(v["outcome"]["reason"], "out_of_bounds");

        let v = serde_json::to_value(create_outcome(8, &SelectionOutcome::Pending, None)).unwrap();
        assert_eq!(v["outcome"]["kind"], "pending");
    }

    #[test]
    fn test_committed_outcome_carries_rounds() {
        let board = Board::from_rows(&[
            vec![Red, Red, Blue, Red],
            vec![Blue, Green, Amber, Green],
            vec![Green, Amber, Green, Amber],
            vec![Amber, Green, Amber, Green],
        ])
        .unwrap();
        let mut session =
            Session::with_board(GameConfig::default().with_grid_size(4), board).unwrap();

        let outcome = session.swap(Position::new(0, 2), Position::new(0, 3));
        let msg = create_outcome(3, &outcome, session.last_cascade());

        let OutcomeBody::Committed {
            score_delta,
            combo_count,
            rounds,
        } = msg.outcome
        else {
            panic!("expected commit");
        };
        assert_eq!(rounds.len() as u32, combo_count);
        assert_eq!(rounds[0].cleared, 3);
        assert_eq!(rounds[0].points, 30);
        assert_eq!(
            rounds[0].matched,
            vec![
                Coord { row: 0, col: 0 },
                Coord { row: 0, col: 1 },
                Coord { row: 0, col: 2 },
            ]
        );
        // Row 0 is the top: nothing falls, three cells spawn.
        assert!(rounds[0].falls.is_empty());
        assert_eq!(rounds[0].spawns.len(), 3);
        assert_eq!(
            score_delta,
            rounds.iter().map(|r| r.points).sum::<u32>()
        );
    }

    #[test]
    fn test_create_observation() {
        let session = Session::new(GameConfig::default()).unwrap();
        let obs = create_observation(2, &session.snapshot());

        assert_eq!(obs.seq, 2);
        assert_eq!(obs.board.len(), 8);
        assert_eq!(obs.ids[0][0], 0);
        assert_eq!(obs.ids[7][7], 63);
        assert!(obs.playable);
        assert_eq!(obs.selection, None);

        let v = serde_json::to_value(&obs).unwrap();
        assert_eq!(v["type"], "observation");
        assert!(v.get("selection").is_none());
    }

    #[test]
    fn test_create_error() {
        let error = create_error(5, ErrorCode::HandshakeRequired, "Send hello first");
        assert_eq!(error.msg_type, ErrorType::Error);
        let v = serde_json::to_value(&error).unwrap();
        assert_eq!(v["code"], "handshake_required");
    }
}
