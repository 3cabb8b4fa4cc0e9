use crate::position::{MoveOutcome, Position};
use crate::shogi::*;

/// perft の末端ノード。`perft_for_each()` のコールバックに渡される。
#[derive(Debug)]
pub struct PerftLeafNode<'a> {
    pos: &'a Position,
    mv: Option<Move>,        // 直前の指し手
    captured: Option<Piece>, // 直前の指し手で取った駒
    checked: bool,           // 手番の側に王手がかかっているか
    checkmated: bool,        // 手番の側が詰んでいるか
}

impl<'a> PerftLeafNode<'a> {
    fn root(pos: &'a Position) -> Self {
        let checked = pos.is_checked(pos.side_to_move());

        Self {
            pos,
            mv: None,
            captured: None,
            checked,
            checkmated: checked && pos.is_checkmated(),
        }
    }

    fn from_outcome(outcome: &'a MoveOutcome) -> Self {
        Self {
            pos: outcome.position(),
            mv: Some(outcome.applied_move()),
            captured: outcome.captured(),
            checked: outcome.is_check(),
            checkmated: outcome.is_checkmate(),
        }
    }

    /// 局面への参照を返す。
    pub fn position(&self) -> &Position {
        self.pos
    }

    /// 直前の指し手を返す。
    pub fn previous_move(&self) -> Option<Move> {
        self.mv
    }

    /// 直前の指し手で取った駒を返す。
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// 手番の側に王手がかかっているかどうかを返す。
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// 手番の側が詰んでいるかどうかを返す。
    pub fn is_checkmated(&self) -> bool {
        self.checkmated
    }
}

/// perft の集計結果。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PerftStats {
    pub count_all: u64,
    pub count_capture: u64,
    pub count_promote: u64,
    pub count_check: u64,
    pub count_checkmate: u64,
}

impl PerftStats {
    fn update(&mut self, leaf: &PerftLeafNode) {
        self.count_all += 1;

        if leaf.captured().is_some() {
            self.count_capture += 1;
        }
        if leaf.previous_move().map_or(false, Move::is_promotion) {
            self.count_promote += 1;
        }
        if leaf.is_checked() {
            self.count_check += 1;
        }
        if leaf.is_checkmated() {
            self.count_checkmate += 1;
        }
    }
}

/// 指定した深さの perft を行う。全ての末端ノードについてコールバックが呼ばれる。
///
/// 深さ depth の全ての合法局面が末端ノードとして列挙される。
/// 打ち歩詰めも合法手として扱うので、それが現れる局面では既知の結果と一致しない。
pub fn perft_for_each<F>(pos: &Position, depth: u32, mut f: F)
where
    F: FnMut(&PerftLeafNode),
{
    if depth == 0 {
        f(&PerftLeafNode::root(pos));
        return;
    }

    perft_dfs(pos, depth, &mut f);
}

/// perft 再帰関数。`depth` は 1 以上。
fn perft_dfs<F>(pos: &Position, depth: u32, f: &mut F)
where
    F: FnMut(&PerftLeafNode),
{
    for mv in pos.legal_moves() {
        // legal_moves() の指し手は常に適用できる。
        let outcome = match pos.apply(mv) {
            Ok(outcome) => outcome,
            Err(_) => continue,
        };

        if depth == 1 {
            f(&PerftLeafNode::from_outcome(&outcome));
        } else {
            perft_dfs(outcome.position(), depth - 1, f);
        }
    }
}

/// 指定した深さの perft を行い、末端ノードを集計する。
pub fn perft(pos: &Position, depth: u32) -> PerftStats {
    let mut stats = PerftStats::default();

    perft_for_each(pos, depth, |leaf| stats.update(leaf));

    stats
}
