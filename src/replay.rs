//! 棋譜の再生。
//!
//! 開始局面と棋譜から、指定した手数まで進めた局面を導出する。
//! 同じ入力からは常に同じ局面が得られ、途中の局面から残りの棋譜を再生しても結果は変わらない。

use anyhow::bail;
use serde_json::Value;

use crate::error::RuleError;
use crate::json::{MoveRecord, StateJson};
use crate::mylog;
use crate::position::{MoveOutcome, Position};
use crate::sfen::sfen_decode_position;
use crate::shogi::Move;

/// 開始局面の指定。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InitialState {
    /// 平手初期局面。
    Startpos,
    /// sfen 文字列。
    Sfen(String),
    /// 局面そのもの。
    Position(Position),
    /// JSON の構造化表現。
    Json(StateJson),
}

impl Default for InitialState {
    fn default() -> Self {
        Self::Startpos
    }
}

impl From<Position> for InitialState {
    fn from(pos: Position) -> Self {
        Self::Position(pos)
    }
}

impl From<StateJson> for InitialState {
    fn from(sj: StateJson) -> Self {
        Self::Json(sj)
    }
}

impl InitialState {
    /// JSON 値から開始局面の指定を作る。`null` は平手、文字列は sfen、オブジェクトは構造化表現とみなす。
    pub fn from_json_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Null => Ok(Self::Startpos),
            Value::String(s) => Ok(Self::Sfen(s.clone())),
            Value::Object(_) => Ok(Self::Json(serde_json::from_value(value.clone())?)),
            _ => bail!("invalid initial state: {}", value),
        }
    }

    /// 開始局面を作る。
    pub fn to_position(&self) -> anyhow::Result<Position> {
        match self {
            Self::Startpos => Ok(Position::startpos()),
            Self::Sfen(sfen) => sfen_decode_position(sfen),
            Self::Position(pos) => Ok(pos.clone()),
            Self::Json(sj) => Position::try_from(sj),
        }
    }
}

/// 不正な棋譜の 1 手の扱い。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReplayPolicy {
    /// 読み飛ばして次の手に進む(ログは出す)。
    Lenient,
    /// その手で再生を打ち切り、エラーを返す。
    Strict,
}

impl Default for ReplayPolicy {
    fn default() -> Self {
        Self::Lenient
    }
}

/// 棋譜の 1 手が適用できなかった理由。
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Undecodable: {0}")]
    Decode(String),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// 厳格な再生のエラー。
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("invalid initial state: {0}")]
    InitialState(String),
    /// `index` は棋譜中の位置 (0 始まり)。`last_valid` はその直前までの局面。
    #[error("move record #{} rejected", .index + 1)]
    Record {
        index: usize,
        last_valid: Box<Position>,
        #[source]
        cause: RecordError,
    },
}

/// 読み飛ばした棋譜の 1 手。
#[derive(Debug)]
pub struct Skipped {
    /// 棋譜中の位置 (0 始まり)。
    pub index: usize,
    pub record: MoveRecord,
    pub cause: RecordError,
}

/// 再生結果。
#[derive(Debug)]
pub struct Replay {
    pub position: Position,
    /// 実際に適用された指し手(強制成りを反映)。
    pub applied: Vec<Move>,
    pub skipped: Vec<Skipped>,
}

/// 棋譜の 1 手を局面に適用する。
pub fn apply_record(pos: &Position, record: &MoveRecord) -> Result<MoveOutcome, RecordError> {
    let mv = record
        .decode()
        .map_err(|e| RecordError::Decode(format!("{:#}", e)))?;

    Ok(pos.apply(mv)?)
}

/// 開始局面から棋譜の先頭 `up_to_ply` 手(棋譜がそれより短ければ全て)を再生する。
///
/// `Lenient` では適用できない手を読み飛ばし、開始局面が不正なら平手初期局面から再生する。
/// 読み飛ばした手は手数に数えない。
pub fn derive_state_with_policy(
    initial: &InitialState,
    records: &[MoveRecord],
    up_to_ply: usize,
    policy: ReplayPolicy,
) -> Result<Replay, ReplayError> {
    let start = match initial.to_position() {
        Ok(pos) => pos,
        Err(e) => match policy {
            ReplayPolicy::Lenient => {
                mylog::log_replay_fallback_to_startpos(&e);
                Position::startpos()
            }
            ReplayPolicy::Strict => return Err(ReplayError::InitialState(format!("{:#}", e))),
        },
    };

    mylog::log_replay_start(records.len(), up_to_ply);

    let mut replay = Replay {
        position: start,
        applied: Vec::new(),
        skipped: Vec::new(),
    };

    for (index, record) in records.iter().take(up_to_ply).enumerate() {
        match apply_record(&replay.position, record) {
            Ok(outcome) => {
                mylog::log_replay_applied(index, outcome.applied_move());
                replay.applied.push(outcome.applied_move());
                replay.position = outcome.into_position();
            }
            Err(cause) => match policy {
                ReplayPolicy::Lenient => {
                    mylog::log_replay_skipped(index, record, &cause);
                    replay.skipped.push(Skipped {
                        index,
                        record: record.clone(),
                        cause,
                    });
                }
                ReplayPolicy::Strict => {
                    return Err(ReplayError::Record {
                        index,
                        last_valid: Box::new(replay.position),
                        cause,
                    });
                }
            },
        }
    }

    mylog::log_replay_end(replay.applied.len(), replay.skipped.len());

    Ok(replay)
}

/// 開始局面から棋譜の先頭 `up_to_ply` 手を再生した局面を返す。適用できない手は読み飛ばす。
pub fn derive_state(initial: &InitialState, records: &[MoveRecord], up_to_ply: usize) -> Position {
    match derive_state_with_policy(initial, records, up_to_ply, ReplayPolicy::Lenient) {
        Ok(replay) => replay.position,
        // Lenient では発生しない。
        Err(_) => Position::startpos(),
    }
}

/// 開始局面から棋譜の先頭 `up_to_ply` 手を再生した局面を返す。適用できない手があればエラー。
pub fn derive_state_strict(
    initial: &InitialState,
    records: &[MoveRecord],
    up_to_ply: usize,
) -> Result<Position, ReplayError> {
    derive_state_with_policy(initial, records, up_to_ply, ReplayPolicy::Strict)
        .map(|replay| replay.position)
}
