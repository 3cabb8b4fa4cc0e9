use std::fmt::Write as _;

use crate::position::Position;
use crate::shogi::*;
use crate::usi::usi_encode_move;

/// (開始局面, 指し手の配列) を USI の position コマンド形式の文字列にエンコードする。
/// 合法性チェックは一切行わない。
///
/// 開始局面が平手初期局面の場合、局面文字列は "startpos" になる。
pub fn sfen_encode<T>(pos: &Position, mvs: T) -> String
where
    T: AsRef<[Move]>,
{
    let mut s = sfen_encode_position_command(pos);

    s.push_str(" moves");

    for &mv in mvs.as_ref() {
        s.push(' ');
        s.push_str(&usi_encode_move(mv));
    }

    s
}

/// 局面を position コマンドの局面部分にエンコードする。
///
/// 局面が平手初期局面(手数 1)の場合、"startpos" を返す。さもなくば "sfen " を前置する。
pub fn sfen_encode_position_command(pos: &Position) -> String {
    if *pos == Position::startpos() {
        return "startpos".to_owned();
    }

    format!("sfen {}", sfen_encode_position(pos))
}

/// 局面を sfen 局面文字列 "<盤面> <手番> <手駒> <手数>" にエンコードする。
/// 合法性チェックは一切行わない。
pub fn sfen_encode_position(pos: &Position) -> String {
    let mut s = String::new();

    sfen_encode_board(pos.board(), &mut s);
    s.push(' ');

    sfen_encode_side(pos.side_to_move(), &mut s);
    s.push(' ');

    sfen_encode_hands(pos.hands(), &mut s);
    s.push(' ');

    write!(s, "{}", pos.ply()).ok();

    s
}

/// 盤面を sfen 盤面文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_board(board: &Board, s: &mut String) {
    for row in 0..9 {
        if row != 0 {
            s.push('/');
        }
        sfen_encode_board_row(board, row, s);
    }
}

fn sfen_encode_board_row(board: &Board, row: u8, s: &mut String) {
    #[derive(Debug)]
    struct State<'a> {
        s: &'a mut String,
        run_blank: u8,
    }
    impl<'a> State<'a> {
        fn new(s: &'a mut String) -> Self {
            Self { s, run_blank: 0 }
        }
        fn update(&mut self, pc: Option<Piece>) {
            match pc {
                None => self.run_blank += 1,
                Some(pc) => {
                    self.flush_run();
                    sfen_encode_board_piece(pc, self.s);
                }
            }
        }
        fn flush_run(&mut self) {
            if self.run_blank > 0 {
                self.s.push(char::from(b'0' + self.run_blank));
                self.run_blank = 0;
            }
        }
    }

    let mut state = State::new(s);
    for col in 0..9 {
        state.update(board[Square::from_row_col(row, col)]);
    }
    state.flush_run();
}

fn sfen_encode_board_piece(pc: Piece, s: &mut String) {
    if pc.is_promoted() {
        s.push('+');
    }

    s.push(sfen_piece_char(pc.side(), pc.to_raw_kind()));
}

/// 陣営と成っていない駒種に対応する文字を返す。先手は大文字、後手は小文字。
fn sfen_piece_char(side: Side, pk: PieceKind) -> char {
    let c = match pk {
        PieceKind::King => 'K',
        PieceKind::Rook => 'R',
        PieceKind::Bishop => 'B',
        PieceKind::Gold => 'G',
        PieceKind::Silver => 'S',
        PieceKind::Knight => 'N',
        PieceKind::Lance => 'L',
        _ => 'P',
    };

    match side {
        Side::Sente => c,
        Side::Gote => c.to_ascii_lowercase(),
    }
}

/// 手番の陣営を sfen 手番文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_side(side_to_move: Side, s: &mut String) {
    match side_to_move {
        Side::Sente => s.push('b'),
        Side::Gote => s.push('w'),
    }
}

/// 両陣営の手駒を sfen 手駒文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_hands(hands: &Hands, s: &mut String) {
    // sfen の仕様では手駒の順番を以下のように規定している:
    //
    // * 全ての先手の手駒、全ての後手の手駒の順に並べる。
    // * 駒種は飛、角、金、銀、桂、香、歩の順に並べる。
    //
    // ref: https://web.archive.org/web/20080131070731/http://www.glaurungchess.com/shogi/usi.html

    const PKS: [PieceKind; 7] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    if hands.iter().all(Hand::is_empty) {
        s.push('-');
        return;
    }

    for side in Side::iter() {
        for pk in PKS {
            let n = hands[side].count(pk);
            if n == 0 {
                continue;
            }

            if n >= 2 {
                write!(s, "{}", n).ok();
            }
            s.push(sfen_piece_char(side, pk));
        }
    }
}

/// 指し手を sfen 指し手文字列(USI 形式)にエンコードする。
/// 合法性チェックは一切行わない。
pub fn sfen_encode_move(mv: Move) -> String {
    usi_encode_move(mv)
}
