//! 外部とやり取りする JSON 表現。
//!
//! 盤面は `board[段][列]` の 9x9 配列で、`board[0][0]` が９一。
//! 駒種名は "pawn", "promoted_pawn", "horse" のような snake_case、陣営名は "sente"/"gote"。

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, ensure, Context as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::position::{MoveOutcome, Position};
use crate::shogi::*;
use crate::usi::{parse_usi, usi_encode_move};

/// 陣営名を返す。
pub const fn side_name(side: Side) -> &'static str {
    match side {
        Side::Sente => "sente",
        Side::Gote => "gote",
    }
}

/// 陣営名を解釈する。sfen の "b"/"w" も受け付ける。
pub fn parse_side_name(s: &str) -> anyhow::Result<Side> {
    match s {
        "sente" | "b" => Ok(Side::Sente),
        "gote" | "w" => Ok(Side::Gote),
        _ => bail!("invalid side name: {}", s),
    }
}

/// 駒種名を返す。
pub const fn piece_kind_name(pk: PieceKind) -> &'static str {
    match pk {
        PieceKind::Pawn => "pawn",
        PieceKind::Lance => "lance",
        PieceKind::Knight => "knight",
        PieceKind::Silver => "silver",
        PieceKind::Gold => "gold",
        PieceKind::Bishop => "bishop",
        PieceKind::Rook => "rook",
        PieceKind::King => "king",
        PieceKind::ProPawn => "promoted_pawn",
        PieceKind::ProLance => "promoted_lance",
        PieceKind::ProKnight => "promoted_knight",
        PieceKind::ProSilver => "promoted_silver",
        PieceKind::Horse => "horse",
        PieceKind::Dragon => "dragon",
    }
}

/// 駒種名を解釈する。大文字小文字は区別しない。USI の駒文字 ("P", "+B" など) も受け付ける。
pub fn parse_piece_kind_name(s: &str) -> anyhow::Result<PieceKind> {
    let name = s.to_ascii_lowercase();

    if let Some(pk) = PieceKind::iter().find(|&pk| piece_kind_name(pk) == name) {
        return Ok(pk);
    }

    let (promo, letter) = match name.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, name.as_str()),
    };
    let pk = match letter {
        "p" => PieceKind::Pawn,
        "l" => PieceKind::Lance,
        "n" => PieceKind::Knight,
        "s" => PieceKind::Silver,
        "g" => PieceKind::Gold,
        "b" => PieceKind::Bishop,
        "r" => PieceKind::Rook,
        "k" => PieceKind::King,
        _ => bail!("invalid piece kind name: {}", s),
    };

    if promo {
        pk.to_promoted()
            .ok_or_else(|| anyhow!("not promotable piece kind: {}", s))
    } else {
        Ok(pk)
    }
}

/// 盤上の駒。
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PieceJson {
    /// 駒種名。成駒は成った後の名前 ("horse" など)。
    pub piece: String,
    pub owner: String,
    /// 入力では、成る前の駒種名と `true` の組も成駒として受け付ける。
    #[serde(default)]
    pub promoted: bool,
}

impl From<Piece> for PieceJson {
    fn from(pc: Piece) -> Self {
        Self {
            piece: piece_kind_name(pc.kind()).to_owned(),
            owner: side_name(pc.side()).to_owned(),
            promoted: pc.is_promoted(),
        }
    }
}

impl TryFrom<&PieceJson> for Piece {
    type Error = anyhow::Error;

    fn try_from(pj: &PieceJson) -> anyhow::Result<Self> {
        let side = parse_side_name(&pj.owner)?;
        let pk = parse_piece_kind_name(&pj.piece)?;

        let pk = if pj.promoted && !pk.is_promoted() {
            pk.to_promoted()
                .with_context(|| format!("not promotable piece: {}", pj.piece))?
        } else {
            pk
        };

        Ok(Piece::new(side, pk))
    }
}

/// 一方の陣営の手駒。駒種名から枚数への写像。0 枚の駒種は含めない。
pub type HandJson = BTreeMap<String, u32>;

/// 両陣営の手駒。
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct HandsJson {
    #[serde(default)]
    pub sente: HandJson,
    #[serde(default)]
    pub gote: HandJson,
}

fn hand_to_json(hand: &Hand) -> HandJson {
    hand.iter()
        .map(|(pk, n)| (piece_kind_name(pk).to_owned(), n))
        .collect()
}

fn hand_from_json(hj: &HandJson) -> anyhow::Result<Hand> {
    let mut hand = Hand::empty();

    for (name, &n) in hj {
        let pk = parse_piece_kind_name(name)?;
        // 玉は手駒にならないので読み飛ばす。
        if pk == PieceKind::King {
            continue;
        }
        ensure!(pk.is_hand(), "promoted piece in hand: {}", name);
        let count = hand
            .count(pk)
            .checked_add(n)
            .with_context(|| format!("hand overflow: {}", name))?;
        hand.set(pk, count);
    }

    Ok(hand)
}

fn default_current_player() -> String {
    side_name(Side::Sente).to_owned()
}

/// 局面。
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateJson {
    pub board: Vec<Vec<Option<PieceJson>>>,
    #[serde(default, alias = "capturedPieces", alias = "hands")]
    pub hand: HandsJson,
    #[serde(default = "default_current_player", alias = "current_player")]
    pub current_player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ply: Option<u32>,
}

impl From<&Position> for StateJson {
    fn from(pos: &Position) -> Self {
        let board = (0..9)
            .map(|row| {
                (0..9)
                    .map(|col| pos.board()[Square::from_row_col(row, col)].map(PieceJson::from))
                    .collect()
            })
            .collect();

        Self {
            board,
            hand: HandsJson {
                sente: hand_to_json(pos.hand(Side::Sente)),
                gote: hand_to_json(pos.hand(Side::Gote)),
            },
            current_player: side_name(pos.side_to_move()).to_owned(),
            ply: Some(pos.ply()),
        }
    }
}

impl TryFrom<&StateJson> for Position {
    type Error = anyhow::Error;

    fn try_from(sj: &StateJson) -> anyhow::Result<Self> {
        ensure!(
            sj.board.len() == 9,
            "board must have exactly 9 rows, but got {}",
            sj.board.len()
        );

        let mut board = Board::empty();
        for (row, cells) in (0..).zip(&sj.board) {
            ensure!(
                cells.len() == 9,
                "board row {} must have exactly 9 columns, but got {}",
                row,
                cells.len()
            );
            for (col, cell) in (0..).zip(cells) {
                board[Square::from_row_col(row, col)] = cell
                    .as_ref()
                    .map(Piece::try_from)
                    .transpose()
                    .with_context(|| format!("invalid piece at ({}, {})", row, col))?;
            }
        }

        let mut hands = Hands::default();
        hands[Side::Sente] = hand_from_json(&sj.hand.sente).context("invalid sente hand")?;
        hands[Side::Gote] = hand_from_json(&sj.hand.gote).context("invalid gote hand")?;

        let side_to_move = parse_side_name(&sj.current_player)?;

        Ok(Position::new(side_to_move, board, hands).with_ply(sj.ply.unwrap_or(1)))
    }
}

/// 着手結果。着手後の局面に加え、王手/詰み/取った駒を含む。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcomeJson {
    #[serde(flatten)]
    pub state: StateJson,
    /// 実際に適用された指し手(強制成りを反映)。
    pub usi: String,
    pub captured: Option<PieceJson>,
    pub is_check: bool,
    pub is_checkmate: bool,
}

impl From<&MoveOutcome> for MoveOutcomeJson {
    fn from(outcome: &MoveOutcome) -> Self {
        Self {
            state: StateJson::from(outcome.position()),
            usi: usi_encode_move(outcome.applied_move()),
            captured: outcome.captured().map(PieceJson::from),
            is_check: outcome.is_check(),
            is_checkmate: outcome.is_checkmate(),
        }
    }
}

/// 盤面上の座標 (段, 列)。いずれも 0..=8。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CoordJson {
    pub row: i64,
    pub col: i64,
}

/// 棋譜の 1 手。
///
/// 型の合わないフィールドを含む要素も `Malformed` として読み込み、棋譜全体は失敗させない。
/// `Malformed` の要素は `decode` で常にエラーになる。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveRecord {
    Fields(MoveFields),
    Malformed(Value),
}

impl MoveRecord {
    /// USI 形式の指し手文字列から棋譜の 1 手を作る。
    pub fn from_usi(usi: impl Into<String>) -> Self {
        Self::Fields(MoveFields {
            usi: Some(usi.into()),
            ..MoveFields::default()
        })
    }

    /// 指し手から棋譜の 1 手を作る。
    pub fn from_move(mv: Move) -> Self {
        Self::from_usi(usi_encode_move(mv))
    }

    /// 指し手を取り出す。構文のみチェックし、合法性チェックは一切行わない。
    pub fn decode(&self) -> anyhow::Result<Move> {
        match self {
            Self::Fields(fields) => fields.decode(),
            Self::Malformed(value) => bail!("malformed move record: {}", value),
        }
    }
}

/// 棋譜の 1 手の各フィールド。
///
/// 通常は `usi` を持つ。旧形式として、座標 (`from_row` 等、または `from`/`to`)、
/// 成りフラグ (`promote` または `is_promote`)、駒打ちの駒種 (`piece_type`) も受け付ける。
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_row: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_col: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_row: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_col: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<CoordJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<CoordJson>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub promote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_promote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_type: Option<String>,
}

impl MoveFields {
    /// 指し手を取り出す。構文のみチェックし、合法性チェックは一切行わない。
    ///
    /// `usi` があればそれを優先する。`usi` が解釈できず旧形式の座標もない場合はエラー。
    pub fn decode(&self) -> anyhow::Result<Move> {
        let usi_err = match &self.usi {
            Some(usi) => match parse_usi(usi) {
                Ok(mv) => return Ok(mv),
                Err(e) => Some(e),
            },
            None => None,
        };

        match self.decode_legacy() {
            Ok(mv) => Ok(mv),
            Err(e) => Err(usi_err.unwrap_or(e)),
        }
    }

    fn decode_legacy(&self) -> anyhow::Result<Move> {
        let dst = match (self.to_row, self.to_col, self.to) {
            (Some(row), Some(col), _) | (_, _, Some(CoordJson { row, col })) => {
                coord_to_square(row, col)?
            }
            _ => bail!("move record has neither usi nor destination"),
        };

        let src = match (self.from_row, self.from_col, self.from) {
            (Some(row), Some(col), _) | (_, _, Some(CoordJson { row, col })) => {
                Some(coord_to_square(row, col)?)
            }
            _ => None,
        };

        match (src, &self.piece_type) {
            (Some(src), _) => {
                let promo = self.promote.or(self.is_promote).unwrap_or(false);
                Ok(if promo {
                    Move::new_walk_promotion(src, dst)
                } else {
                    Move::new_walk(src, dst)
                })
            }
            (None, Some(name)) => Ok(Move::new_drop(parse_piece_kind_name(name)?, dst)),
            (None, None) => bail!("move record has neither source nor piece_type"),
        }
    }
}

fn coord_to_square(row: i64, col: i64) -> anyhow::Result<Square> {
    u8::try_from(row)
        .ok()
        .zip(u8::try_from(col).ok())
        .and_then(|(r, c)| Square::new(r, c))
        .ok_or_else(|| anyhow!("coordinate out of board: ({}, {})", row, col))
}
