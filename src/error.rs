//! 着手の拒否理由。
//!
//! 表示用の文言は持たない。呼び出し側がコードを見て適宜メッセージに変換する。

/// 指し手/駒打ちが受理されなかった理由。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum RuleError {
    /// 移動元に駒がない、または手番側の駒でない。
    #[error("InvalidMove")]
    InvalidMove,

    /// 移動先がその駒の移動可能マスに含まれない。
    #[error("CannotMoveTo")]
    CannotMoveTo,

    /// 打つマスが打てるマスに含まれない(駒がある、二歩、行きどころのない駒)。
    #[error("CannotDropTo")]
    CannotDropTo,

    /// 打とうとした駒が手駒にない。
    #[error("NoPieceInHand")]
    NoPieceInHand,

    /// 成りを指定したが成れない。
    #[error("CannotPromote")]
    CannotPromote,

    /// 着手後に自玉に王手がかかっている。
    #[error("MustEscapeCheck")]
    MustEscapeCheck,
}

impl RuleError {
    /// エラーコードを返す。`Display` と同じ文字列。
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidMove => "InvalidMove",
            Self::CannotMoveTo => "CannotMoveTo",
            Self::CannotDropTo => "CannotDropTo",
            Self::NoPieceInHand => "NoPieceInHand",
            Self::CannotPromote => "CannotPromote",
            Self::MustEscapeCheck => "MustEscapeCheck",
        }
    }
}
