//! 局面。
//!
//! `Position` は値として扱う。着手は新しい `Position` を返し、元の局面には一切触れない。
//! 盤面は 81 マスの配列を丸ごとコピーするだけなので、履歴を持つ側は局面をそのまま積めばよい。

use crate::effect::*;
use crate::error::RuleError;
use crate::movegen::*;
use crate::sfen::sfen_encode_position;
use crate::shogi::*;
use crate::usi::parse_usi;

/// 局面。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    board: Board,
    hands: Hands,
    side_to_move: Side,
    ply: u32, // 常に 1 から始まるものとする。
}

/// 着手の結果。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MoveOutcome {
    position: Position,
    mv: Move,
    captured: Option<Piece>,
    checked: bool,
    checkmated: bool,
}

impl MoveOutcome {
    /// 着手後の局面への参照を返す。
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// 着手後の局面を返す。
    pub fn into_position(self) -> Position {
        self.position
    }

    /// 実際に適用された指し手を返す。行きどころのない駒の強制成りはここに反映される。
    pub fn applied_move(&self) -> Move {
        self.mv
    }

    /// 取った駒を返す(成駒は成ったまま)。
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// 着手により相手玉に王手がかかったか。
    pub fn is_check(&self) -> bool {
        self.checked
    }

    /// 着手により相手が詰んだか。
    pub fn is_checkmate(&self) -> bool {
        self.checkmated
    }
}

impl Position {
    /// 手番、盤面、両陣営の手駒を指定して局面を作る。手数は 1。
    /// 合法性チェックは一切行わない(玉がなくてもよい)。
    pub fn new(side_to_move: Side, board: Board, hands: Hands) -> Self {
        Self {
            board,
            hands,
            side_to_move,
            ply: 1,
        }
    }

    /// 手数を指定する。0 は 1 とみなす。
    pub fn with_ply(mut self, ply: u32) -> Self {
        self.ply = ply.max(1);
        self
    }

    /// 平手初期局面を返す。
    pub fn startpos() -> Self {
        Self::new(Side::Sente, Board::startpos(), Hands::default())
    }

    /// 手数を返す。
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// 手番を返す。
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 盤面への参照を返す。
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 両陣営の手駒への参照を返す。
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// 指定した陣営の手駒への参照を返す。
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side]
    }

    /// 指定した陣営が王手をかけられているかどうかを返す。
    pub fn is_checked(&self, us: Side) -> bool {
        is_in_check(&self.board, us)
    }

    /// 手番の側が詰んでいるかどうかを返す。打ち歩詰めは考慮しない。
    pub fn is_checkmated(&self) -> bool {
        is_checkmate(&self.board, &self.hands, self.side_to_move)
    }

    /// 手番の側の合法手を全て返す。
    pub fn legal_moves(&self) -> MoveArray {
        generate_moves(self)
    }

    /// 盤上の駒を動かす。
    ///
    /// 以下の順に検査し、最初に該当したエラーを返す:
    ///
    /// 1. `src` に手番側の駒がない: `InvalidMove`
    /// 2. `dst` がその駒の移動先に含まれない: `CannotMoveTo`
    /// 3. 着手後に自玉に王手がかかる: `MustEscapeCheck`
    /// 4. 成りを指定したが成れない: `CannotPromote`
    ///
    /// 不成で行きどころのない駒になる場合、`promote` によらず成る。
    pub fn apply_move(
        &self,
        src: Square,
        dst: Square,
        promote: bool,
    ) -> Result<MoveOutcome, RuleError> {
        let us = self.side_to_move;

        let pc = match self.board[src] {
            Some(pc) if pc.side() == us => pc,
            _ => return Err(RuleError::InvalidMove),
        };

        if !moves_from(&self.board, src).iter().any(|d| d.dst == dst) {
            return Err(RuleError::CannotMoveTo);
        }

        if would_be_in_check_after_move(&self.board, src, dst) {
            return Err(RuleError::MustEscapeCheck);
        }

        let promo = if must_promote(pc, dst) {
            true
        } else if promote {
            if !can_promote(pc, src, dst) {
                return Err(RuleError::CannotPromote);
            }
            true
        } else {
            false
        };

        let mut board = self.board.clone();
        let mut hands = self.hands;

        let captured = board[dst].take();
        if let Some(pc_cap) = captured {
            hands[us].add(pc_cap.to_raw_kind());
        }

        board[src] = None;
        board[dst] = Some(if promo {
            pc.to_promoted().unwrap_or(pc)
        } else {
            pc
        });

        let mv = if promo {
            Move::new_walk_promotion(src, dst)
        } else {
            Move::new_walk(src, dst)
        };

        Ok(self.advance(board, hands, mv, captured))
    }

    /// 手駒を打つ。
    ///
    /// 以下の順に検査し、最初に該当したエラーを返す:
    ///
    /// 1. 手番側の手駒に `pk` がない: `NoPieceInHand`
    /// 2. `dst` に打てない(駒がある、二歩、行きどころのない駒): `CannotDropTo`
    /// 3. 打った後に自玉に王手がかかる: `MustEscapeCheck`
    pub fn apply_drop(&self, dst: Square, pk: PieceKind) -> Result<MoveOutcome, RuleError> {
        let us = self.side_to_move;

        if self.hands[us].count(pk) == 0 {
            return Err(RuleError::NoPieceInHand);
        }

        if !drops_for(&self.board, pk, us).contains(&dst) {
            return Err(RuleError::CannotDropTo);
        }

        if would_be_in_check_after_drop(&self.board, pk, us, dst) {
            return Err(RuleError::MustEscapeCheck);
        }

        let mut board = self.board.clone();
        let mut hands = self.hands;

        hands[us].remove(pk);
        board[dst] = Some(Piece::new(us, pk));

        Ok(self.advance(board, hands, Move::new_drop(pk, dst), None))
    }

    /// 指し手を適用する。`apply_move()` または `apply_drop()` に振り分けるだけ。
    pub fn apply(&self, mv: Move) -> Result<MoveOutcome, RuleError> {
        match mv {
            Move::Walk { src, dst, promo } => self.apply_move(src, dst, promo),
            Move::Drop { pk, dst } => self.apply_drop(dst, pk),
        }
    }

    /// USI 形式の指し手文字列を解釈して適用する。
    pub fn apply_usi(&self, s: impl AsRef<str>) -> anyhow::Result<MoveOutcome> {
        let mv = parse_usi(s)?;

        Ok(self.apply(mv)?)
    }

    /// 局面を sfen 文字列(盤面、手番、手駒、手数)に変換する。
    pub fn to_sfen(&self) -> String {
        sfen_encode_position(self)
    }

    /// 着手後の盤面と手駒から次の局面を作り、王手/詰みを判定する。
    fn advance(
        &self,
        board: Board,
        hands: Hands,
        mv: Move,
        captured: Option<Piece>,
    ) -> MoveOutcome {
        let them = self.side_to_move.inv();

        let position = Self {
            board,
            hands,
            side_to_move: them,
            ply: self.ply.saturating_add(1),
        };

        let checked = position.is_checked(them);
        let checkmated = checked && position.is_checkmated();

        MoveOutcome {
            position,
            mv,
            captured,
            checked,
            checkmated,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "後手 手駒: {}", self.hands[Side::Gote])?;
        write!(f, "{}", self.board)?;
        writeln!(f, "先手 手駒: {}", self.hands[Side::Sente])?;
        writeln!(f, "手番: {} ({}手目)", self.side_to_move, self.ply)?;

        Ok(())
    }
}
