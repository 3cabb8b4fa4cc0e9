//! 利き情報関連。
//!
//! 王手判定は全て盤面を愚直に走査して行う。

use crate::movegen::{drops_for, moves_from};
use crate::shogi::*;

/// 盤面上の各マスの利き数を保持する。一方の陣営のみ。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct EffectCountBoard([u8; 81]);

impl EffectCountBoard {
    /// 全マスの利き数が 0 の `EffectCountBoard` を返す。
    pub const fn empty() -> Self {
        Self([0; 81])
    }

    /// 盤面上の `side` 側の全ての駒の利きを数える。
    pub fn from_board(board: &Board, side: Side) -> Self {
        let mut this = Self::empty();

        for (src, _) in board.pieces().filter(|&(_, pc)| pc.side() == side) {
            for dst in moves_from(board, src) {
                this[dst.dst] += 1;
            }
        }

        this
    }
}

impl std::ops::Index<Square> for EffectCountBoard {
    type Output = u8;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[usize::from(sq)]
    }
}

impl std::ops::IndexMut<Square> for EffectCountBoard {
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[usize::from(sq)]
    }
}

impl std::fmt::Display for EffectCountBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use std::fmt::Write as _;

        const CHARS: [char; 16] = [
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
        ];

        for row in 0..9 {
            for col in 0..9 {
                let n = usize::from(self[Square::from_row_col(row, col)]);

                if n < CHARS.len() {
                    f.write_char(CHARS[n])?;
                } else {
                    write!(f, "[{}]", n)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// `by` 側のいずれかの駒が `sq` に利いているかどうかを返す。
///
/// `sq` に `by` 側の駒がある場合、その駒への利き(ヒモ)は数えない。
pub fn is_attacked(board: &Board, sq: Square, by: Side) -> bool {
    board
        .pieces()
        .filter(|&(_, pc)| pc.side() == by)
        .any(|(src, _)| moves_from(board, src).iter().any(|d| d.dst == sq))
}

/// `side` 側の玉に王手がかかっているかどうかを返す。
///
/// 盤上に `side` 側の玉がなければ false を返す。
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .map_or(false, |sq_king| is_attacked(board, sq_king, side.inv()))
}

/// `src` の駒を `dst` へ動かした後、その駒の陣営の玉に王手がかかっているかどうかを返す。
///
/// 成/不成は自玉の安全に影響しないので区別しない。`src` が空白なら false を返す。
pub fn would_be_in_check_after_move(board: &Board, src: Square, dst: Square) -> bool {
    let pc = match board[src] {
        Some(pc) => pc,
        None => return false,
    };

    let mut after = board.clone();
    after[src] = None;
    after[dst] = Some(pc);

    is_in_check(&after, pc.side())
}

/// `side` 側が `dst` に `pk` を打った後、`side` 側の玉に王手がかかっているかどうかを返す。
pub fn would_be_in_check_after_drop(board: &Board, pk: PieceKind, side: Side, dst: Square) -> bool {
    let mut after = board.clone();
    after[dst] = Some(Piece::new(side, pk));

    is_in_check(&after, side)
}

/// `side` 側が詰んでいるかどうかを返す。
///
/// 王手がかかっており、盤上の駒の移動と駒打ちのいずれによっても王手を解除できないとき詰みとする。
/// 打ち歩詰めかどうかは考慮しない。
pub fn is_checkmate(board: &Board, hands: &Hands, side: Side) -> bool {
    if !is_in_check(board, side) {
        return false;
    }

    let can_evade_by_walk = board
        .pieces()
        .filter(|&(_, pc)| pc.side() == side)
        .any(|(src, _)| {
            moves_from(board, src)
                .iter()
                .any(|d| !would_be_in_check_after_move(board, src, d.dst))
        });
    if can_evade_by_walk {
        return false;
    }

    let can_evade_by_drop = hands[side].iter().any(|(pk, _)| {
        drops_for(board, pk, side)
            .iter()
            .any(|&dst| !would_be_in_check_after_drop(board, pk, side, dst))
    });

    !can_evade_by_drop
}
