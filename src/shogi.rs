//! 将棋の基本要素たち。
//!
//! 陣営、駒種は閉じた集合なので enum で表現し、駒ごとの処理は網羅的な `match` で書く。
//! マスは内部値を持つ newtype とする。
//!
//! マスの内部値は以下のように割り当てている:
//!
//! * 段(row)は一段目(後手側), 二段目, ..., 九段目(先手側)の順に 0..=8。
//! * 列(col)は９筋, ８筋, ..., １筋の順に 0..=8。つまり筋 = 9 - col。
//! * マスの内部値は `9 * row + col`。よって ９一, ８一, ..., １九 の順になる。

use std::iter::FusedIterator;

use crate::myarray::*;

/// 陣営。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Side {
    /// 先手。盤面の下側(九段目側)に陣取る。
    Sente,
    /// 後手。盤面の上側(一段目側)に陣取る。
    Gote,
}

impl Side {
    /// 敵陣営を返す。
    pub const fn inv(self) -> Self {
        match self {
            Self::Sente => Self::Gote,
            Self::Gote => Self::Sente,
        }
    }

    /// 前方向への段の増分を返す。先手なら -1、後手なら +1。
    pub const fn forward(self) -> i8 {
        match self {
            Self::Sente => -1,
            Self::Gote => 1,
        }
    }

    /// 陣営を昇順に列挙する。(`Sente`、`Gote` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [Self::Sente, Self::Gote].into_iter()
    }
}

impl From<Side> for usize {
    fn from(side: Side) -> Self {
        side as Self
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Sente => f.write_str("先手"),
            Self::Gote => f.write_str("後手"),
        }
    }
}

/// 盤面のマス。たとえば `SQ_76` は７六。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Square(u8);

pub const SQ_11: Square = Square::from_row_col(0, 8);
pub const SQ_12: Square = Square::from_row_col(1, 8);
pub const SQ_13: Square = Square::from_row_col(2, 8);
pub const SQ_14: Square = Square::from_row_col(3, 8);
pub const SQ_15: Square = Square::from_row_col(4, 8);
pub const SQ_16: Square = Square::from_row_col(5, 8);
pub const SQ_17: Square = Square::from_row_col(6, 8);
pub const SQ_18: Square = Square::from_row_col(7, 8);
pub const SQ_19: Square = Square::from_row_col(8, 8);
pub const SQ_21: Square = Square::from_row_col(0, 7);
pub const SQ_22: Square = Square::from_row_col(1, 7);
pub const SQ_23: Square = Square::from_row_col(2, 7);
pub const SQ_24: Square = Square::from_row_col(3, 7);
pub const SQ_25: Square = Square::from_row_col(4, 7);
pub const SQ_26: Square = Square::from_row_col(5, 7);
pub const SQ_27: Square = Square::from_row_col(6, 7);
pub const SQ_28: Square = Square::from_row_col(7, 7);
pub const SQ_29: Square = Square::from_row_col(8, 7);
pub const SQ_31: Square = Square::from_row_col(0, 6);
pub const SQ_32: Square = Square::from_row_col(1, 6);
pub const SQ_33: Square = Square::from_row_col(2, 6);
pub const SQ_34: Square = Square::from_row_col(3, 6);
pub const SQ_35: Square = Square::from_row_col(4, 6);
pub const SQ_36: Square = Square::from_row_col(5, 6);
pub const SQ_37: Square = Square::from_row_col(6, 6);
pub const SQ_38: Square = Square::from_row_col(7, 6);
pub const SQ_39: Square = Square::from_row_col(8, 6);
pub const SQ_41: Square = Square::from_row_col(0, 5);
pub const SQ_42: Square = Square::from_row_col(1, 5);
pub const SQ_43: Square = Square::from_row_col(2, 5);
pub const SQ_44: Square = Square::from_row_col(3, 5);
pub const SQ_45: Square = Square::from_row_col(4, 5);
pub const SQ_46: Square = Square::from_row_col(5, 5);
pub const SQ_47: Square = Square::from_row_col(6, 5);
pub const SQ_48: Square = Square::from_row_col(7, 5);
pub const SQ_49: Square = Square::from_row_col(8, 5);
pub const SQ_51: Square = Square::from_row_col(0, 4);
pub const SQ_52: Square = Square::from_row_col(1, 4);
pub const SQ_53: Square = Square::from_row_col(2, 4);
pub const SQ_54: Square = Square::from_row_col(3, 4);
pub const SQ_55: Square = Square::from_row_col(4, 4);
pub const SQ_56: Square = Square::from_row_col(5, 4);
pub const SQ_57: Square = Square::from_row_col(6, 4);
pub const SQ_58: Square = Square::from_row_col(7, 4);
pub const SQ_59: Square = Square::from_row_col(8, 4);
pub const SQ_61: Square = Square::from_row_col(0, 3);
pub const SQ_62: Square = Square::from_row_col(1, 3);
pub const SQ_63: Square = Square::from_row_col(2, 3);
pub const SQ_64: Square = Square::from_row_col(3, 3);
pub const SQ_65: Square = Square::from_row_col(4, 3);
pub const SQ_66: Square = Square::from_row_col(5, 3);
pub const SQ_67: Square = Square::from_row_col(6, 3);
pub const SQ_68: Square = Square::from_row_col(7, 3);
pub const SQ_69: Square = Square::from_row_col(8, 3);
pub const SQ_71: Square = Square::from_row_col(0, 2);
pub const SQ_72: Square = Square::from_row_col(1, 2);
pub const SQ_73: Square = Square::from_row_col(2, 2);
pub const SQ_74: Square = Square::from_row_col(3, 2);
pub const SQ_75: Square = Square::from_row_col(4, 2);
pub const SQ_76: Square = Square::from_row_col(5, 2);
pub const SQ_77: Square = Square::from_row_col(6, 2);
pub const SQ_78: Square = Square::from_row_col(7, 2);
pub const SQ_79: Square = Square::from_row_col(8, 2);
pub const SQ_81: Square = Square::from_row_col(0, 1);
pub const SQ_82: Square = Square::from_row_col(1, 1);
pub const SQ_83: Square = Square::from_row_col(2, 1);
pub const SQ_84: Square = Square::from_row_col(3, 1);
pub const SQ_85: Square = Square::from_row_col(4, 1);
pub const SQ_86: Square = Square::from_row_col(5, 1);
pub const SQ_87: Square = Square::from_row_col(6, 1);
pub const SQ_88: Square = Square::from_row_col(7, 1);
pub const SQ_89: Square = Square::from_row_col(8, 1);
pub const SQ_91: Square = Square::from_row_col(0, 0);
pub const SQ_92: Square = Square::from_row_col(1, 0);
pub const SQ_93: Square = Square::from_row_col(2, 0);
pub const SQ_94: Square = Square::from_row_col(3, 0);
pub const SQ_95: Square = Square::from_row_col(4, 0);
pub const SQ_96: Square = Square::from_row_col(5, 0);
pub const SQ_97: Square = Square::from_row_col(6, 0);
pub const SQ_98: Square = Square::from_row_col(7, 0);
pub const SQ_99: Square = Square::from_row_col(8, 0);

impl Square {
    /// 段と列からマスを作る。`row`, `col` は 0..=8 でなければならない。
    pub const fn from_row_col(row: u8, col: u8) -> Self {
        debug_assert!(row < 9 && col < 9);

        Self(9 * row + col)
    }

    /// 段と列からマスを作る。盤面外なら `None` を返す。
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 9 && col < 9 {
            Some(Self::from_row_col(row, col))
        } else {
            None
        }
    }

    /// 筋(1..=9)と段番号(1..=9)からマスを作る。盤面外なら `None` を返す。
    pub const fn from_file_rank(file: u8, rank: u8) -> Option<Self> {
        if 1 <= file && file <= 9 && 1 <= rank && rank <= 9 {
            Some(Self::from_row_col(rank - 1, 9 - file))
        } else {
            None
        }
    }

    /// 段(0..=8)を返す。0 が一段目。
    pub const fn row(self) -> u8 {
        self.0 / 9
    }

    /// 列(0..=8)を返す。0 が９筋。
    pub const fn col(self) -> u8 {
        self.0 % 9
    }

    /// 筋(1..=9)を返す。
    pub const fn file(self) -> u8 {
        9 - self.col()
    }

    /// 段番号(1..=9)を返す。
    pub const fn rank(self) -> u8 {
        self.row() + 1
    }

    /// 指定した陣営から見た段を返す。敵陣一段目が 0、自陣一段目が 8。
    pub const fn relative_row(self, side: Side) -> u8 {
        match side {
            Side::Sente => self.row(),
            Side::Gote => 8 - self.row(),
        }
    }

    /// マスが指定した陣営にとって敵陣(三段)かどうかを返す。
    pub const fn is_promotion_zone(self, side: Side) -> bool {
        self.relative_row(side) < 3
    }

    /// (段の増分, 列の増分) だけずらしたマスを返す。盤面外に出るなら `None` を返す。
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;

        ((0..9).contains(&row) && (0..9).contains(&col))
            .then(|| Self::from_row_col(row as u8, col as u8))
    }

    /// 全マスを昇順に列挙する。(`SQ_91`, `SQ_81`, ..., `SQ_19` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        // ExactSizeIterator にするため、配列をベタ書きする。
        #[rustfmt::skip]
        const SQS: [Square; 81] = [
            SQ_91, SQ_81, SQ_71, SQ_61, SQ_51, SQ_41, SQ_31, SQ_21, SQ_11,
            SQ_92, SQ_82, SQ_72, SQ_62, SQ_52, SQ_42, SQ_32, SQ_22, SQ_12,
            SQ_93, SQ_83, SQ_73, SQ_63, SQ_53, SQ_43, SQ_33, SQ_23, SQ_13,
            SQ_94, SQ_84, SQ_74, SQ_64, SQ_54, SQ_44, SQ_34, SQ_24, SQ_14,
            SQ_95, SQ_85, SQ_75, SQ_65, SQ_55, SQ_45, SQ_35, SQ_25, SQ_15,
            SQ_96, SQ_86, SQ_76, SQ_66, SQ_56, SQ_46, SQ_36, SQ_26, SQ_16,
            SQ_97, SQ_87, SQ_77, SQ_67, SQ_57, SQ_47, SQ_37, SQ_27, SQ_17,
            SQ_98, SQ_88, SQ_78, SQ_68, SQ_58, SQ_48, SQ_38, SQ_28, SQ_18,
            SQ_99, SQ_89, SQ_79, SQ_69, SQ_59, SQ_49, SQ_39, SQ_29, SQ_19,
        ];

        SQS.into_iter()
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> u8 {
        self.0
    }
}

impl From<Square> for usize {
    fn from(sq: Square) -> Self {
        sq.0 as Self
    }
}

impl std::fmt::Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SQ_{}{}", self.file(), self.rank())
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const FILES: [&str; 9] = ["１", "２", "３", "４", "５", "６", "７", "８", "９"];
        const RANKS: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

        f.write_str(FILES[usize::from(self.file() - 1)])?;
        f.write_str(RANKS[usize::from(self.row())])
    }
}

/// 駒種(陣営の区別なし)。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    ProPawn,
    ProLance,
    ProKnight,
    ProSilver,
    Horse,
    Dragon,
}

impl PieceKind {
    /// 成れる駒種かどうかを返す。
    pub const fn is_promotable(self) -> bool {
        matches!(
            self,
            Self::Pawn | Self::Lance | Self::Knight | Self::Silver | Self::Bishop | Self::Rook
        )
    }

    /// 成駒かどうかを返す。
    pub const fn is_promoted(self) -> bool {
        matches!(
            self,
            Self::ProPawn
                | Self::ProLance
                | Self::ProKnight
                | Self::ProSilver
                | Self::Horse
                | Self::Dragon
        )
    }

    /// 手駒となりうる駒種かどうかを返す。
    pub const fn is_hand(self) -> bool {
        self.hand_index().is_some()
    }

    /// 成った駒種を返す。成れない駒種なら `None` を返す。
    pub const fn to_promoted(self) -> Option<Self> {
        match self {
            Self::Pawn => Some(Self::ProPawn),
            Self::Lance => Some(Self::ProLance),
            Self::Knight => Some(Self::ProKnight),
            Self::Silver => Some(Self::ProSilver),
            Self::Bishop => Some(Self::Horse),
            Self::Rook => Some(Self::Dragon),
            Self::Gold
            | Self::King
            | Self::ProPawn
            | Self::ProLance
            | Self::ProKnight
            | Self::ProSilver
            | Self::Horse
            | Self::Dragon => None,
        }
    }

    /// 成っていない駒種を返す。成駒でなければそのまま返す。
    pub const fn to_raw(self) -> Self {
        match self {
            Self::ProPawn => Self::Pawn,
            Self::ProLance => Self::Lance,
            Self::ProKnight => Self::Knight,
            Self::ProSilver => Self::Silver,
            Self::Horse => Self::Bishop,
            Self::Dragon => Self::Rook,
            pk => pk,
        }
    }

    /// 手駒配列におけるインデックスを返す。手駒とならない駒種なら `None` を返す。
    const fn hand_index(self) -> Option<usize> {
        match self {
            Self::Pawn => Some(0),
            Self::Lance => Some(1),
            Self::Knight => Some(2),
            Self::Silver => Some(3),
            Self::Gold => Some(4),
            Self::Bishop => Some(5),
            Self::Rook => Some(6),
            _ => None,
        }
    }

    /// 全ての駒種を昇順に列挙する。
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [
            Self::Pawn,
            Self::Lance,
            Self::Knight,
            Self::Silver,
            Self::Gold,
            Self::Bishop,
            Self::Rook,
            Self::King,
            Self::ProPawn,
            Self::ProLance,
            Self::ProKnight,
            Self::ProSilver,
            Self::Horse,
            Self::Dragon,
        ]
        .into_iter()
    }

    /// 手駒となりうる駒種を昇順に列挙する。
    pub fn iter_hand(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        HAND_KINDS.into_iter()
    }
}

const HAND_KINDS: [PieceKind; 7] = [
    PieceKind::Pawn,
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::Bishop,
    PieceKind::Rook,
];

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Pawn => "歩",
            Self::Lance => "香",
            Self::Knight => "桂",
            Self::Silver => "銀",
            Self::Gold => "金",
            Self::Bishop => "角",
            Self::Rook => "飛",
            Self::King => "玉",
            Self::ProPawn => "と",
            Self::ProLance => "杏",
            Self::ProKnight => "圭",
            Self::ProSilver => "全",
            Self::Horse => "馬",
            Self::Dragon => "龍",
        };

        f.write_str(s)
    }
}

/// 駒(陣営の区別あり)。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
}

impl Piece {
    /// 陣営と駒種を指定して駒を作る。
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// 駒の陣営を返す。
    pub const fn side(self) -> Side {
        self.side
    }

    /// 駒種を返す。
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    /// 成駒かどうかを返す。
    pub const fn is_promoted(self) -> bool {
        self.kind.is_promoted()
    }

    /// 成った駒を返す。成れない駒なら `None` を返す。
    pub const fn to_promoted(self) -> Option<Self> {
        match self.kind.to_promoted() {
            Some(kind) => Some(Self::new(self.side, kind)),
            None => None,
        }
    }

    /// 成っていない駒種を返す。捕獲された駒を手駒に加える際に使う。
    pub const fn to_raw_kind(self) -> PieceKind {
        self.kind.to_raw()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.side {
            Side::Sente => f.write_str(" ")?,
            Side::Gote => f.write_str("v")?,
        }
        write!(f, "{}", self.kind)
    }
}

/// 指し手。
///
/// 陣営の情報は持たない。どちらの指し手かは適用先の局面の手番で決まる。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Move {
    /// 盤上の駒を動かす指し手。
    Walk { src: Square, dst: Square, promo: bool },
    /// 駒打ち。
    Drop { pk: PieceKind, dst: Square },
}

impl Move {
    /// 盤上の駒を動かして成らない指し手を作る。
    pub const fn new_walk(src: Square, dst: Square) -> Self {
        Self::Walk {
            src,
            dst,
            promo: false,
        }
    }

    /// 盤上の駒を動かして成る指し手を作る。
    pub const fn new_walk_promotion(src: Square, dst: Square) -> Self {
        Self::Walk {
            src,
            dst,
            promo: true,
        }
    }

    /// 駒打ちの指し手を作る。
    pub const fn new_drop(pk: PieceKind, dst: Square) -> Self {
        Self::Drop { pk, dst }
    }

    /// 指し手が有効かどうかを返す。盤面は考慮しない。
    ///
    /// 盤上の駒を動かす場合は移動元と移動先が相異なること、
    /// 駒打ちの場合は駒種が手駒となりうるものであることを要求する。
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Walk { src, dst, .. } => src.0 != dst.0,
            Self::Drop { pk, .. } => pk.is_hand(),
        }
    }

    /// 駒打ちかどうかを返す。
    pub const fn is_drop(self) -> bool {
        matches!(self, Self::Drop { .. })
    }

    /// 成りかどうかを返す。
    pub const fn is_promotion(self) -> bool {
        matches!(self, Self::Walk { promo: true, .. })
    }

    /// 移動先を返す。
    pub const fn dst(self) -> Square {
        match self {
            Self::Walk { dst, .. } | Self::Drop { dst, .. } => dst,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::Walk { src, dst, promo } => {
                write!(f, "{}{}", src, dst)?;
                if promo {
                    f.write_str("成")?;
                }
            }
            Self::Drop { pk, dst } => write!(f, "{}{}打", dst, pk)?,
        }

        Ok(())
    }
}

/// 盤面。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Board([Option<Piece>; 81]);

impl Board {
    /// 空の盤面を返す。
    pub const fn empty() -> Self {
        Self([None; 81])
    }

    /// 平手初期盤面を返す。
    pub const fn startpos() -> Self {
        use PieceKind::*;

        const fn s(kind: PieceKind) -> Option<Piece> {
            Some(Piece::new(Side::Sente, kind))
        }
        const fn g(kind: PieceKind) -> Option<Piece> {
            Some(Piece::new(Side::Gote, kind))
        }
        const E: Option<Piece> = None;

        #[rustfmt::skip]
        const INNER: [Option<Piece>; 81] = [
            g(Lance), g(Knight), g(Silver), g(Gold), g(King), g(Gold), g(Silver), g(Knight), g(Lance),
            E,        g(Rook),   E,         E,       E,       E,       E,         g(Bishop), E,
            g(Pawn),  g(Pawn),   g(Pawn),   g(Pawn), g(Pawn), g(Pawn), g(Pawn),   g(Pawn),   g(Pawn),
            E,        E,         E,         E,       E,       E,       E,         E,         E,
            E,        E,         E,         E,       E,       E,       E,         E,         E,
            E,        E,         E,         E,       E,       E,       E,         E,         E,
            s(Pawn),  s(Pawn),   s(Pawn),   s(Pawn), s(Pawn), s(Pawn), s(Pawn),   s(Pawn),   s(Pawn),
            E,        s(Bishop), E,         E,       E,       E,       E,         s(Rook),   E,
            s(Lance), s(Knight), s(Silver), s(Gold), s(King), s(Gold), s(Silver), s(Knight), s(Lance),
        ];

        Self(INNER)
    }

    /// 盤上の全ての駒を (マス, 駒) の形でマスの昇順に列挙する。
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| self[sq].map(|pc| (sq, pc)))
    }

    /// 指定した陣営の玉位置を返す。玉がなければ `None` を返す。
    pub fn king_square(&self, side: Side) -> Option<Square> {
        let king = Piece::new(side, PieceKind::King);

        self.pieces()
            .find_map(|(sq, pc)| (pc == king).then(|| sq))
    }
}

impl std::ops::Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[usize::from(sq)]
    }
}

impl std::ops::IndexMut<Square> for Board {
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[usize::from(sq)]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in 0..9 {
            for col in 0..9 {
                match self[Square::from_row_col(row, col)] {
                    Some(pc) => write!(f, "{}", pc)?,
                    None => f.write_str(" ・")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// 手駒。
///
/// 手駒となりうる 7 駒種の枚数のみを持つ。成駒や玉が入ることはない。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Hand([u32; 7]);

impl Hand {
    /// 空の手駒を返す。
    pub const fn empty() -> Self {
        Self([0; 7])
    }

    /// 手駒が空かどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// 指定した駒種の枚数を返す。手駒とならない駒種なら常に 0。
    pub const fn count(&self, pk: PieceKind) -> u32 {
        match pk.hand_index() {
            Some(i) => self.0[i],
            None => 0,
        }
    }

    /// 指定した駒種の枚数を設定する。手駒とならない駒種は無視する。
    pub fn set(&mut self, pk: PieceKind, n: u32) {
        if let Some(i) = pk.hand_index() {
            self.0[i] = n;
        }
    }

    /// 指定した駒種を 1 枚加える。成駒は元の駒種に戻して加える。玉は無視する。
    ///
    /// 枚数は `u32::MAX` で頭打ちになる。
    pub fn add(&mut self, pk: PieceKind) {
        if let Some(i) = pk.to_raw().hand_index() {
            self.0[i] = self.0[i].saturating_add(1);
        }
    }

    /// 指定した駒種を 1 枚減らす。手駒になければ何もせず `false` を返す。
    pub fn remove(&mut self, pk: PieceKind) -> bool {
        match pk.hand_index() {
            Some(i) if self.0[i] > 0 => {
                self.0[i] -= 1;
                true
            }
            _ => false,
        }
    }

    /// 1 枚以上ある駒種を (駒種, 枚数) の形で昇順に列挙する。
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        PieceKind::iter_hand()
            .map(|pk| (pk, self.count(pk)))
            .filter(|&(_, n)| n > 0)
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use PieceKind::*;

        const PKS: [PieceKind; 7] = [Rook, Bishop, Gold, Silver, Knight, Lance, Pawn];

        if self.is_empty() {
            return f.write_str("なし");
        }

        for pk in PKS {
            let n = self.count(pk);
            if n == 0 {
                continue;
            }

            write!(f, "{}", pk)?;
            if n >= 2 {
                write!(f, "{}", n)?;
            }
        }

        Ok(())
    }
}

/// 両陣営の手駒。`Side` でインデックスアクセスできる。
pub type Hands = MyArray1<Hand, Side, 2>;

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_square_coords() {
        assert_eq!(SQ_91.row(), 0);
        assert_eq!(SQ_91.col(), 0);
        assert_eq!(SQ_19.row(), 8);
        assert_eq!(SQ_19.col(), 8);

        assert_eq!(SQ_76.file(), 7);
        assert_eq!(SQ_76.rank(), 6);
        assert_eq!(Square::from_file_rank(7, 6), Some(SQ_76));
        assert_eq!(Square::from_file_rank(0, 6), None);
        assert_eq!(Square::from_file_rank(7, 10), None);
        assert_eq!(Square::new(9, 0), None);

        assert_eq!(Square::iter().count(), 81);
        assert!(Square::iter().enumerate().all(|(i, sq)| usize::from(sq) == i));
    }

    #[test]
    fn test_square_offset() {
        assert_eq!(SQ_55.offset(-1, 0), Some(SQ_54));
        assert_eq!(SQ_55.offset(0, 1), Some(SQ_45));
        assert_eq!(SQ_91.offset(-1, 0), None);
        assert_eq!(SQ_91.offset(0, -1), None);
        assert_eq!(SQ_19.offset(1, 0), None);
        assert_eq!(SQ_19.offset(0, 1), None);
    }

    #[test]
    fn test_square_is_promotion_zone() {
        for (sq, expected) in [(SQ_51, true), (SQ_53, true), (SQ_54, false), (SQ_59, false)] {
            assert_eq!(sq.is_promotion_zone(Side::Sente), expected, "{:?}", sq);
        }
        for (sq, expected) in [(SQ_59, true), (SQ_57, true), (SQ_56, false), (SQ_51, false)] {
            assert_eq!(sq.is_promotion_zone(Side::Gote), expected, "{:?}", sq);
        }
    }

    #[test]
    fn test_piece_kind_promotion() {
        for pk in PieceKind::iter() {
            match pk.to_promoted() {
                Some(promoted) => {
                    assert!(pk.is_promotable());
                    assert!(promoted.is_promoted());
                    assert_eq!(promoted.to_raw(), pk);
                }
                None => assert!(!pk.is_promotable()),
            }
        }

        assert_eq!(PieceKind::King.to_raw(), PieceKind::King);
        assert_eq!(PieceKind::Gold.to_promoted(), None);
        assert!(!PieceKind::King.is_hand());
        assert!(!PieceKind::Horse.is_hand());
    }

    #[test]
    fn test_board_startpos() {
        let board = Board::startpos();

        assert_eq!(board.pieces().count(), 40);
        assert_eq!(board.king_square(Side::Sente), Some(SQ_59));
        assert_eq!(board.king_square(Side::Gote), Some(SQ_51));
        assert_eq!(board[SQ_28], Some(Piece::new(Side::Sente, PieceKind::Rook)));
        assert_eq!(board[SQ_88], Some(Piece::new(Side::Sente, PieceKind::Bishop)));
        assert_eq!(board[SQ_82], Some(Piece::new(Side::Gote, PieceKind::Rook)));
        assert_eq!(board[SQ_22], Some(Piece::new(Side::Gote, PieceKind::Bishop)));
        assert_eq!(board[SQ_55], None);
    }

    #[test]
    fn test_hand() {
        let mut hand = Hand::empty();
        assert!(hand.is_empty());

        hand.add(PieceKind::Dragon);
        hand.add(PieceKind::Pawn);
        hand.add(PieceKind::Pawn);
        hand.add(PieceKind::King);

        assert_eq!(hand.count(PieceKind::Rook), 1);
        assert_eq!(hand.count(PieceKind::Pawn), 2);
        assert_eq!(hand.count(PieceKind::Dragon), 0);
        assert_eq!(hand.count(PieceKind::King), 0);
        assert_eq!(hand.to_string(), "飛歩2");

        assert!(hand.remove(PieceKind::Rook));
        assert!(!hand.remove(PieceKind::Rook));
        assert_eq!(
            hand.iter().collect::<Vec<_>>(),
            vec![(PieceKind::Pawn, 2)]
        );
    }

    #[test]
    fn test_hand_add_saturates() {
        let mut hand = Hand::empty();
        hand.set(PieceKind::Pawn, u32::MAX);

        hand.add(PieceKind::ProPawn);

        assert_eq!(hand.count(PieceKind::Pawn), u32::MAX);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new_walk(SQ_77, SQ_76).to_string(), "７七７六");
        assert_eq!(
            Move::new_walk_promotion(SQ_88, SQ_22).to_string(),
            "８八２二成"
        );
        assert_eq!(
            Move::new_drop(PieceKind::Gold, SQ_52).to_string(),
            "５二金打"
        );
    }
}
