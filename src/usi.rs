//! USI 形式の指し手文字列。
//!
//! 受理するのは以下の 3 形式のみ:
//!
//! * 盤上の駒の移動: "7g7f"
//! * 成り: "8h2b+"
//! * 駒打ち: "P*5e" (駒種は大文字。先後は区別しない)
//!
//! 筋は '1'..='9'、段は 'a'..='i' (一段目が 'a')。

use anyhow::{anyhow, Context as _};

use crate::shogi::*;

/// USI 指し手文字列を解釈する。構文はチェックするが、合法性チェックは一切行わない。
///
/// 前後の空白も含め、上記の形式に一致しない文字列はエラーとなる。
pub fn parse_usi(s: impl AsRef<str>) -> anyhow::Result<Move> {
    let s = s.as_ref();

    parse_usi_walk(s)
        .or_else(|| parse_usi_drop(s))
        .ok_or_else(|| anyhow!("invalid usi move string: {:?}", s))
}

fn parse_usi_walk(s: &str) -> Option<Move> {
    let mut it = s.chars();

    let src = parse_usi_square(it.next()?, it.next()?)?;
    let dst = parse_usi_square(it.next()?, it.next()?)?;

    let promo = match it.next() {
        Some('+') => true,
        Some(_) => return None,
        None => false,
    };

    it.next().is_none().then(|| {
        if promo {
            Move::new_walk_promotion(src, dst)
        } else {
            Move::new_walk(src, dst)
        }
    })
}

fn parse_usi_drop(s: &str) -> Option<Move> {
    let mut it = s.chars();

    let pk = parse_usi_drop_piece_kind(it.next()?)?;

    if it.next()? != '*' {
        return None;
    }

    let dst = parse_usi_square(it.next()?, it.next()?)?;

    it.next().is_none().then(|| Move::new_drop(pk, dst))
}

fn parse_usi_square(c_file: char, c_rank: char) -> Option<Square> {
    let file = c_file.to_digit(10)?;
    let rank = match c_rank {
        'a'..='i' => u32::from(c_rank) - u32::from('a') + 1,
        _ => return None,
    };

    Square::from_file_rank(u8::try_from(file).ok()?, u8::try_from(rank).ok()?)
}

fn parse_usi_drop_piece_kind(c: char) -> Option<PieceKind> {
    match c {
        'R' => Some(PieceKind::Rook),
        'B' => Some(PieceKind::Bishop),
        'G' => Some(PieceKind::Gold),
        'S' => Some(PieceKind::Silver),
        'N' => Some(PieceKind::Knight),
        'L' => Some(PieceKind::Lance),
        'P' => Some(PieceKind::Pawn),
        _ => None,
    }
}

/// 盤上の駒の移動を USI 文字列にする。
pub fn build_usi_move(src: Square, dst: Square, promote: bool) -> String {
    let mut s = String::with_capacity(5);

    push_usi_square(src, &mut s);
    push_usi_square(dst, &mut s);
    if promote {
        s.push('+');
    }

    s
}

/// 駒打ちを USI 文字列にする。
///
/// `pk` は手駒になる駒種であることを想定している。成駒を渡した場合は成る前の駒種で表す。
pub fn build_usi_drop(pk: PieceKind, dst: Square) -> String {
    let mut s = String::with_capacity(4);

    s.push(usi_piece_char(pk.to_raw()));
    s.push('*');
    push_usi_square(dst, &mut s);

    s
}

/// 指し手を USI 文字列にする。
pub fn usi_encode_move(mv: Move) -> String {
    match mv {
        Move::Walk { src, dst, promo } => build_usi_move(src, dst, promo),
        Move::Drop { pk, dst } => build_usi_drop(pk, dst),
    }
}

/// USI 指し手文字列の列を解釈する。最初に解釈できなかった文字列の位置をエラーに含める。
pub fn parse_usi_moves<I, S>(strs: I) -> anyhow::Result<Vec<Move>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strs.into_iter()
        .enumerate()
        .map(|(i, s)| parse_usi(s).with_context(|| format!("move #{}", i + 1)))
        .collect()
}

fn push_usi_square(sq: Square, s: &mut String) {
    s.push(char::from(b'0' + sq.file()));
    s.push(char::from(b'a' + sq.row()));
}

fn usi_piece_char(pk: PieceKind) -> char {
    match pk {
        PieceKind::Rook => 'R',
        PieceKind::Bishop => 'B',
        PieceKind::Gold => 'G',
        PieceKind::Silver => 'S',
        PieceKind::Knight => 'N',
        PieceKind::Lance => 'L',
        PieceKind::Pawn => 'P',
        _ => 'K',
    }
}
