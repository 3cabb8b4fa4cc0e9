//! 指し手生成。
//!
//! `moves_from()` と `drops_for()` は自玉の安全を考慮しない(自殺手を含む)。
//! 自殺手を除いた合法手の列挙は `generate_moves()` で行う。
//! 打ち歩詰めは合法手として扱う。

use crate::effect::{would_be_in_check_after_drop, would_be_in_check_after_move};
use crate::position::Position;
use crate::shogi::*;

use super::{Destination, DestinationArray, MoveArray, SquareArray};

/// (段の増分, 列の増分)。先手から見た値で、前方向は段が減る向き。
type Offset = (i8, i8);

const PAWN_STEPS: [Offset; 1] = [(-1, 0)];
const KNIGHT_STEPS: [Offset; 2] = [(-2, -1), (-2, 1)];
const SILVER_STEPS: [Offset; 5] = [(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1)];
const GOLD_STEPS: [Offset; 6] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0)];
#[rustfmt::skip]
const KING_STEPS: [Offset; 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];
const ORTHOGONAL: [Offset; 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const DIAGONAL: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const FORWARD: [Offset; 1] = [(-1, 0)];

/// 駒種ごとの (1 歩だけ動ける方向たち, 遠隔に動ける方向たち) を返す。
const fn movement(pk: PieceKind) -> (&'static [Offset], &'static [Offset]) {
    match pk {
        PieceKind::Pawn => (&PAWN_STEPS, &[]),
        PieceKind::Lance => (&[], &FORWARD),
        PieceKind::Knight => (&KNIGHT_STEPS, &[]),
        PieceKind::Silver => (&SILVER_STEPS, &[]),
        PieceKind::Gold
        | PieceKind::ProPawn
        | PieceKind::ProLance
        | PieceKind::ProKnight
        | PieceKind::ProSilver => (&GOLD_STEPS, &[]),
        PieceKind::Bishop => (&[], &DIAGONAL),
        PieceKind::Rook => (&[], &ORTHOGONAL),
        PieceKind::King => (&KING_STEPS, &[]),
        PieceKind::Horse => (&ORTHOGONAL, &DIAGONAL),
        PieceKind::Dragon => (&DIAGONAL, &ORTHOGONAL),
    }
}

/// 指定したマスにある駒の移動先を全て返す。マスが空なら空配列を返す。
///
/// 自駒のあるマスは含まない。遠隔利きは最初にぶつかった駒で止まり、
/// それが敵駒なら駒取りとして含める。成り/不成の区別はしない。
pub fn moves_from(board: &Board, src: Square) -> DestinationArray {
    let mut dsts = DestinationArray::new();

    let pc = match board[src] {
        Some(pc) => pc,
        None => return dsts,
    };
    let us = pc.side();

    // 後手は段の増分の符号を反転する(左右対称な駒しかないので列はそのまま)。
    let flip = if us == Side::Sente { 1 } else { -1 };

    let (steps, rays) = movement(pc.kind());

    for &(dr, dc) in steps {
        let dst = match src.offset(flip * dr, dc) {
            Some(dst) => dst,
            None => continue,
        };
        match board[dst] {
            None => dsts.push(Destination {
                dst,
                capture: false,
            }),
            Some(pc_dst) if pc_dst.side() != us => dsts.push(Destination { dst, capture: true }),
            Some(_) => {}
        }
    }

    for &(dr, dc) in rays {
        let mut cur = src;
        while let Some(dst) = cur.offset(flip * dr, dc) {
            match board[dst] {
                None => {
                    dsts.push(Destination {
                        dst,
                        capture: false,
                    });
                    cur = dst;
                }
                Some(pc_dst) => {
                    if pc_dst.side() != us {
                        dsts.push(Destination { dst, capture: true });
                    }
                    break;
                }
            }
        }
    }

    dsts
}

/// 指定した陣営が指定した駒種を打てるマスを全て返す。
///
/// 空白マスのうち、以下を除いたもの:
///
/// * 歩: 自分の成っていない歩がある筋(二歩)。
/// * 歩、香: 敵陣一段目。
/// * 桂: 敵陣一段目と二段目。
///
/// 手駒とならない駒種を渡した場合は空配列を返す。
pub fn drops_for(board: &Board, pk: PieceKind, side: Side) -> SquareArray {
    if !pk.is_hand() {
        return SquareArray::new();
    }

    // relative_row がこれ未満のマスには打てない。
    let row_min = match pk {
        PieceKind::Pawn | PieceKind::Lance => 1,
        PieceKind::Knight => 2,
        _ => 0,
    };

    // 二歩になる列。
    let mut pawn_cols = [false; 9];
    if pk == PieceKind::Pawn {
        let pawn = Piece::new(side, PieceKind::Pawn);
        for (sq, _) in board.pieces().filter(|&(_, pc)| pc == pawn) {
            pawn_cols[usize::from(sq.col())] = true;
        }
    }

    Square::iter()
        .filter(|&sq| board[sq].is_none())
        .filter(|&sq| sq.relative_row(side) >= row_min)
        .filter(|&sq| !pawn_cols[usize::from(sq.col())])
        .collect()
}

/// 駒 `pc` が `src` から `dst` へ動くとき成れるかどうかを返す。
///
/// 成れる駒種であり、かつ移動元または移動先が敵陣であることが条件。
pub fn can_promote(pc: Piece, src: Square, dst: Square) -> bool {
    let us = pc.side();

    pc.kind().is_promotable() && (src.is_promotion_zone(us) || dst.is_promotion_zone(us))
}

/// 駒 `pc` が `dst` へ動いたとき必ず成らねばならない(行きどころのない駒になる)かどうかを返す。
pub fn must_promote(pc: Piece, dst: Square) -> bool {
    let row = dst.relative_row(pc.side());

    match pc.kind() {
        PieceKind::Pawn | PieceKind::Lance => row < 1,
        PieceKind::Knight => row < 2,
        _ => false,
    }
}

/// 指定した局面における全ての合法手を生成する。
///
/// 成れる場合は成りと不成を別の指し手として生成する(不成で行きどころのない駒になる場合を除く)。
/// 打ち歩詰めは除外しない。
pub fn generate_moves(pos: &Position) -> MoveArray {
    let us = pos.side_to_move();
    let board = pos.board();

    let mut mvs = MoveArray::new();

    for (src, pc) in board.pieces().filter(|&(_, pc)| pc.side() == us) {
        for Destination { dst, .. } in moves_from(board, src) {
            if would_be_in_check_after_move(board, src, dst) {
                continue;
            }
            if can_promote(pc, src, dst) {
                mvs.push(Move::new_walk_promotion(src, dst));
            }
            if !must_promote(pc, dst) {
                mvs.push(Move::new_walk(src, dst));
            }
        }
    }

    for (pk, _) in pos.hand(us).iter() {
        for dst in drops_for(board, pk, us) {
            if !would_be_in_check_after_drop(board, pk, us, dst) {
                mvs.push(Move::new_drop(pk, dst));
            }
        }
    }

    mvs
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sfen::sfen_decode_position;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    fn board_of(sfen: &str) -> Board {
        sfen_decode_position(sfen).unwrap().board().clone()
    }

    fn dsts_of(board: &Board, src: Square) -> Vec<(Square, bool)> {
        let mut res: Vec<_> = moves_from(board, src)
            .into_iter()
            .map(|d| (d.dst, d.capture))
            .collect();
        res.sort();
        res
    }

    fn sorted(mut sqs: Vec<Square>) -> Vec<Square> {
        sqs.sort();
        sqs
    }

    #[test]
    fn test_moves_from_empty_square() {
        let board = Board::startpos();
        assert!(moves_from(&board, SQ_55).is_empty());
    }

    #[test]
    fn test_moves_from_startpos() {
        let board = Board::startpos();

        assert_eq!(dsts_of(&board, SQ_77), vec![(SQ_76, false)]);
        assert_eq!(dsts_of(&board, SQ_33), vec![(SQ_34, false)]);
        // 初期配置の角は動けない。
        assert!(moves_from(&board, SQ_88).is_empty());
        assert_eq!(
            dsts_of(&board, SQ_28),
            sorted(vec![SQ_18, SQ_38, SQ_48, SQ_58, SQ_68, SQ_78])
                .into_iter()
                .map(|sq| (sq, false))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            dsts_of(&board, SQ_59),
            sorted(vec![SQ_48, SQ_58, SQ_68])
                .into_iter()
                .map(|sq| (sq, false))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_moves_from_knight() {
        let board = board_of("4k4/9/9/9/4N4/9/9/9/4K4 b - 1");
        assert_eq!(dsts_of(&board, SQ_55), vec![(SQ_63, false), (SQ_43, false)]);

        let board = board_of("4k4/9/9/9/4n4/9/9/9/4K4 b - 1");
        assert_eq!(dsts_of(&board, SQ_55), vec![(SQ_67, false), (SQ_47, false)]);

        // 端の桂は片側にしか跳べない。
        let board = board_of("4k4/9/9/9/N8/9/9/9/4K4 b - 1");
        assert_eq!(dsts_of(&board, SQ_95), vec![(SQ_83, false)]);
    }

    #[test]
    fn test_moves_from_slider_stops_at_piece() {
        // 香の前方に敵の歩、その先に自分の歩。
        let board = board_of("4k4/9/4P4/9/4p4/9/9/4L4/4K4 b - 1");
        assert_eq!(
            dsts_of(&board, SQ_58),
            vec![(SQ_55, true), (SQ_56, false), (SQ_57, false)]
        );

        // 飛車は自駒の手前で止まる。
        let board = board_of("4k4/9/9/9/1R2P4/9/9/9/4K4 b - 1");
        let dsts = dsts_of(&board, SQ_85);
        assert!(dsts.contains(&(SQ_65, false)));
        assert!(!dsts.contains(&(SQ_55, false)));
        assert!(!dsts.contains(&(SQ_45, false)));
        assert_eq!(dsts.len(), 8 + 1 + 2);
    }

    #[test]
    fn test_moves_from_horse_dragon() {
        let board = board_of("4k4/9/9/9/4+B4/9/9/9/4K4 b - 1");
        // 斜めの遠隔利き 16 マスと上下左右の 4 マス。
        let dsts = dsts_of(&board, SQ_55);
        assert!(dsts.contains(&(SQ_54, false)));
        assert!(dsts.contains(&(SQ_65, false)));
        assert!(dsts.contains(&(SQ_11, false)));
        assert!(!dsts.contains(&(SQ_53, false)));
        assert_eq!(dsts.len(), 20);

        let board = board_of("4k4/9/9/9/4+R4/9/9/9/4K4 b - 1");
        let dsts = dsts_of(&board, SQ_55);
        assert!(dsts.contains(&(SQ_51, true)));
        assert!(dsts.contains(&(SQ_64, false)));
        assert!(!dsts.contains(&(SQ_59, false)));
        assert!(!dsts.contains(&(SQ_73, false)));
        assert_eq!(dsts.len(), 4 + 3 + 4 + 4 + 4);
    }

    #[test]
    fn test_moves_from_gold_like() {
        let gold = board_of("4k4/9/9/9/4G4/9/9/9/4K4 b - 1");
        let tokin = board_of("4k4/9/9/9/4+P4/9/9/9/4K4 b - 1");
        let pro_silver = board_of("4k4/9/9/9/4+S4/9/9/9/4K4 b - 1");

        let expected = vec![SQ_64, SQ_54, SQ_44, SQ_65, SQ_45, SQ_56];
        let expected: Vec<_> = sorted(expected).into_iter().map(|sq| (sq, false)).collect();

        assert_eq!(dsts_of(&gold, SQ_55), expected);
        assert_eq!(dsts_of(&tokin, SQ_55), expected);
        assert_eq!(dsts_of(&pro_silver, SQ_55), expected);

        // 後手の金は下向き。
        let gote_gold = board_of("4k4/9/9/9/4g4/9/9/9/4K4 b - 1");
        let expected = vec![SQ_66, SQ_56, SQ_46, SQ_65, SQ_45, SQ_54];
        let expected: Vec<_> = sorted(expected).into_iter().map(|sq| (sq, false)).collect();
        assert_eq!(dsts_of(&gote_gold, SQ_55), expected);
    }

    #[test]
    fn test_moves_from_is_pure() {
        let board = Board::startpos();
        let before = board.clone();

        for sq in Square::iter() {
            assert_eq!(moves_from(&board, sq), moves_from(&board, sq));
        }
        for pk in PieceKind::iter_hand() {
            for side in Side::iter() {
                assert_eq!(drops_for(&board, pk, side), drops_for(&board, pk, side));
            }
        }

        assert_eq!(board, before);
    }

    #[test]
    fn test_drops_for_pawn() {
        // 先手の歩が５筋にある。５筋の後手の歩、成った歩は二歩の判定に関係しない。
        let board = board_of("4k4/9/4p4/9/9/3+P5/4P4/9/4K4 b - 1");

        let sqs = drops_for(&board, PieceKind::Pawn, Side::Sente);
        assert!(sqs.iter().all(|sq| sq.file() != 5));
        assert!(sqs.iter().all(|sq| sq.rank() != 1));
        assert!(sqs.contains(&SQ_62));
        assert!(sqs.contains(&SQ_12));
        assert!(!sqs.contains(&SQ_61));

        // 後手から見ると５筋の歩は後手のものなので５筋には打てず、六筋の と は関係ない。
        let sqs = drops_for(&board, PieceKind::Pawn, Side::Gote);
        assert!(sqs.iter().all(|sq| sq.file() != 5));
        assert!(sqs.iter().all(|sq| sq.rank() != 9));
        assert!(sqs.contains(&SQ_68));
    }

    #[test]
    fn test_drops_for_dead_squares() {
        let board = Board::empty();

        let lance = drops_for(&board, PieceKind::Lance, Side::Sente);
        assert_eq!(lance.len(), 72);
        assert!(lance.iter().all(|sq| sq.rank() >= 2));

        let knight = drops_for(&board, PieceKind::Knight, Side::Sente);
        assert_eq!(knight.len(), 63);
        assert!(knight.iter().all(|sq| sq.rank() >= 3));

        let knight = drops_for(&board, PieceKind::Knight, Side::Gote);
        assert_eq!(knight.len(), 63);
        assert!(knight.iter().all(|sq| sq.rank() <= 7));

        let gold = drops_for(&board, PieceKind::Gold, Side::Gote);
        assert_eq!(gold.len(), 81);

        assert!(drops_for(&board, PieceKind::King, Side::Sente).is_empty());
        assert!(drops_for(&board, PieceKind::Dragon, Side::Sente).is_empty());
    }

    #[test]
    fn test_promotion_rules() {
        let pawn = Piece::new(Side::Sente, PieceKind::Pawn);
        assert!(can_promote(pawn, SQ_54, SQ_53));
        assert!(!can_promote(pawn, SQ_55, SQ_54));
        assert!(must_promote(pawn, SQ_51));
        assert!(!must_promote(pawn, SQ_52));

        let knight = Piece::new(Side::Gote, PieceKind::Knight);
        assert!(must_promote(knight, SQ_58));
        assert!(must_promote(knight, SQ_59));
        assert!(!must_promote(knight, SQ_57));

        // 敵陣から出る指し手でも成れる。
        let silver = Piece::new(Side::Sente, PieceKind::Silver);
        assert!(can_promote(silver, SQ_53, SQ_64));

        let gold = Piece::new(Side::Sente, PieceKind::Gold);
        assert!(!can_promote(gold, SQ_54, SQ_53));

        let horse = Piece::new(Side::Sente, PieceKind::Horse);
        assert!(!can_promote(horse, SQ_54, SQ_53));
    }

    #[test]
    fn test_generate_moves_startpos() {
        let pos = Position::startpos();
        assert_eq!(generate_moves(&pos).len(), 30);
    }

    #[test]
    fn test_generate_moves_excludes_pinned_piece() {
        // ５八の金は飛車にピンされている。
        let pos = sfen_decode_position("4k4/9/9/9/4r4/9/9/4G4/4K4 b - 1").unwrap();
        let mvs = generate_moves(&pos);

        assert!(mvs.iter().all(|mv| !matches!(mv, Move::Walk { src, .. } if *src == SQ_58)
            || mv.dst().file() == 5));
        assert!(mvs.contains(&Move::new_walk(SQ_58, SQ_57)));
        assert!(!mvs.contains(&Move::new_walk(SQ_58, SQ_48)));
    }
}
