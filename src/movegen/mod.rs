mod general;

pub use self::general::*;

use arrayvec::ArrayVec;

use crate::shogi::{Move, Square};

/// 盤上の駒 1 枚の移動先。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Destination {
    pub dst: Square,
    /// 移動先に敵駒があるか。
    pub capture: bool,
}

/// 盤上の駒 1 枚の移動先配列。
///
/// 最多は盤中央の馬・龍で、遠隔利き 16 マスと 1 歩の利き 4 マスの計 20。
pub type DestinationArray = ArrayVec<Destination, 20>;

/// マス配列。駒打ちの対象マスなどに使う。
pub type SquareArray = ArrayVec<Square, 81>;

/// 指し手配列。
///
/// 合法な局面の最大分岐数は 593 だが、sfen から読んだ局面は駒数の検査をしていないので
/// 上限を決めず `Vec` とする。
///
/// ref: [将棋における最大分岐数](https://www.nara-wu.ac.jp/math/personal/shinoda/bunki.html)
pub type MoveArray = Vec<Move>;
