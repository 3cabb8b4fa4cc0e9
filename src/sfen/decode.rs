use std::iter::Peekable;

use anyhow::{bail, ensure, Context as _};

use crate::position::Position;
use crate::shogi::*;
use crate::usi::parse_usi;

/// sfen 文字列をデコードし、(開始局面, 指し手の配列) を返す。
/// 構文はチェックするが、合法性チェックは一切行わない。
///
/// 以下のいずれの形式も受け付ける:
///
/// * `[position] startpos [moves ...]`
/// * `[position] sfen <盤面> <手番> [<手駒> [<手数>]] [moves ...]`
/// * `<盤面> <手番> [<手駒> [<手数>]] [moves ...]`
///
/// 文字列の先頭と末尾の空白は無視される。
pub fn sfen_decode(s: impl AsRef<str>) -> anyhow::Result<(Position, Vec<Move>)> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace().peekable();

    let pos = sfen_decode_position_from_iter(&mut tokens)?;

    let mvs = if let Some(moves_magic) = tokens.next() {
        ensure!(
            moves_magic == "moves",
            r#""moves" expected, but got {}"#,
            moves_magic
        );
        tokens
            .map(|token| parse_usi(token).with_context(|| format!("invalid move: {}", token)))
            .collect::<Result<_, _>>()?
    } else {
        vec![]
    };

    Ok((pos, mvs))
}

/// sfen 局面文字列をデコードし、その局面を返す。
/// 構文はチェックするが、合法性チェックは一切行わない。
///
/// `sfen_decode()` と同じ形式を受け付けるが、指し手を続けることはできない。
pub fn sfen_decode_position(s: impl AsRef<str>) -> anyhow::Result<Position> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace().peekable();

    let pos = sfen_decode_position_from_iter(&mut tokens)?;

    if let Some(token) = tokens.next() {
        bail!("position string has redundant token: {}", token);
    }

    Ok(pos)
}

fn sfen_decode_position_from_iter<'a, I>(it: &mut Peekable<I>) -> anyhow::Result<Position>
where
    I: Iterator<Item = &'a str>,
{
    // 最初のトークンが "position" なら単に無視する。
    // 外部アプリは "position" を付けたり付けなかったりまちまちなので、それへの対処。
    if it.peek() == Some(&"position") {
        it.next();
    }

    if it.peek() == Some(&"startpos") {
        it.next();
        return Ok(Position::startpos());
    }

    // "sfen" は省略可能。
    if it.peek() == Some(&"sfen") {
        it.next();
    }

    let board = sfen_decode_board(it.next().context("board string not found")?)?;
    let side_to_move = sfen_decode_side(it.next().context("side string not found")?)?;

    // 手駒と手数は省略可能。
    let hands = match it.next_if(|&token| token != "moves") {
        Some(token) => sfen_decode_hands(token)?,
        None => Hands::default(),
    };
    let ply = match it.next_if(|&token| token != "moves") {
        Some(token) => sfen_decode_ply(token),
        None => 1,
    };

    Ok(Position::new(side_to_move, board, hands).with_ply(ply))
}

/// sfen 盤面文字列をデコードし、その盤面を返す。合法性チェックは一切行わない。
fn sfen_decode_board(s: &str) -> anyhow::Result<Board> {
    let mut board = Board::empty();

    let rows: Vec<_> = s.split('/').collect();
    ensure!(
        rows.len() == 9,
        "board string must have exactly 9 rows, but got {}",
        rows.len()
    );

    for (row, row_s) in (0..).zip(rows) {
        sfen_decode_board_row(row_s, row, &mut board)
            .with_context(|| format!("invalid board row {}: {}", row + 1, row_s))?;
    }

    Ok(board)
}

fn sfen_decode_board_row(s: &str, row: u8, board: &mut Board) -> anyhow::Result<()> {
    #[derive(Debug)]
    struct State<'a> {
        board: &'a mut Board,
        row: u8,
        col: u8,
        promo: bool,
    }
    impl<'a> State<'a> {
        fn new(board: &'a mut Board, row: u8) -> Self {
            Self {
                board,
                row,
                col: 0,
                promo: false,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '+' => {
                    ensure!(!self.promo, "double '+' is not allowed");
                    self.check_row_overflow(1)?;
                    self.promo = true;
                }
                '1'..='9' => {
                    ensure!(!self.promo, "'+' cannot be placed before digit");
                    let n = c as u8 - b'0';
                    self.check_row_overflow(n)?;
                    self.col += n;
                }
                _ => {
                    let pc = sfen_decode_board_piece(c)?;
                    self.check_row_overflow(1)?;
                    let pc = if self.promo {
                        self.promo = false;
                        pc.to_promoted()
                            .with_context(|| format!("not promotable piece: {}", c))?
                    } else {
                        pc
                    };
                    self.board[Square::from_row_col(self.row, self.col)] = Some(pc);
                    self.col += 1;
                }
            }
            Ok(())
        }
        fn finalize(&self) -> anyhow::Result<()> {
            ensure!(!self.promo, "remaining promotion flag");
            ensure!(self.col == 9, "board row must have exactly 9 columns");
            Ok(())
        }
        fn check_row_overflow(&self, n: u8) -> anyhow::Result<()> {
            ensure!(self.col + n <= 9, "row overflow");
            Ok(())
        }
    }

    let mut state = State::new(board, row);
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(())
}

fn sfen_decode_board_piece(c: char) -> anyhow::Result<Piece> {
    let side = if c.is_ascii_uppercase() {
        Side::Sente
    } else {
        Side::Gote
    };

    let pk = match c.to_ascii_uppercase() {
        'K' => PieceKind::King,
        'R' => PieceKind::Rook,
        'B' => PieceKind::Bishop,
        'G' => PieceKind::Gold,
        'S' => PieceKind::Silver,
        'N' => PieceKind::Knight,
        'L' => PieceKind::Lance,
        'P' => PieceKind::Pawn,
        _ => bail!("invalid piece char: {}", c),
    };

    Ok(Piece::new(side, pk))
}

/// sfen 手番文字列をデコードし、手番の陣営を返す。
fn sfen_decode_side(s: &str) -> anyhow::Result<Side> {
    match s {
        "b" => Ok(Side::Sente),
        "w" => Ok(Side::Gote),
        _ => bail!("invalid side string: {}", s),
    }
}

/// sfen 手駒文字列をデコードし、両陣営の手駒を返す。合法性チェックは一切行わない。
///
/// 玉は手駒にならないので、玉の文字は(枚数指定ごと)読み飛ばす。
fn sfen_decode_hands(s: &str) -> anyhow::Result<Hands> {
    if s == "-" {
        return Ok(Hands::default());
    }

    #[derive(Debug)]
    struct State {
        hands: Hands,
        count: u32,
    }
    impl State {
        fn new() -> Self {
            Self {
                hands: Hands::default(),
                count: 0,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '0'..='9' => {
                    ensure!(
                        !(c == '0' && self.count == 0),
                        "leading zero is not allowed"
                    );
                    let d = u32::from(c as u8 - b'0');
                    self.count = self
                        .count
                        .checked_mul(10)
                        .and_then(|count| count.checked_add(d))
                        .context("count is too large")?;
                }
                _ => {
                    let pc = sfen_decode_board_piece(c)?;
                    let n = if self.count == 0 { 1 } else { self.count };
                    self.count = 0;
                    if pc.kind() == PieceKind::King {
                        return Ok(());
                    }
                    let hand = &mut self.hands[pc.side()];
                    let total = hand
                        .count(pc.kind())
                        .checked_add(n)
                        .context("hand overflow")?;
                    hand.set(pc.kind(), total);
                }
            }
            Ok(())
        }
        fn finalize(&self) -> anyhow::Result<()> {
            ensure!(self.count == 0, "remaining count specifier");
            Ok(())
        }
    }

    let mut state = State::new();
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(state.hands)
}

/// sfen 手数文字列をデコードし、その手数を返す。正の整数として読めなければ 1 とする。
fn sfen_decode_ply(s: &str) -> u32 {
    s.parse::<u32>().ok().filter(|&ply| ply >= 1).unwrap_or(1)
}

/// sfen 指し手文字列(USI 形式)をデコードし、その指し手を返す。
/// 構文はチェックするが、合法性チェックは一切行わない。
///
/// 文字列の先頭と末尾の空白は無視される。
pub fn sfen_decode_move(s: impl AsRef<str>) -> anyhow::Result<Move> {
    parse_usi(s.as_ref().trim())
}
