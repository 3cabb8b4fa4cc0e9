use itertools::iproduct;
#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};

use shogi_rules::*;

fn pos_of(sfen: &str) -> Position {
    sfen_decode_position(sfen).unwrap()
}

fn squares() -> Vec<Square> {
    Square::iter().collect()
}

fn kinds() -> Vec<PieceKind> {
    PieceKind::iter().collect()
}

fn hand_kinds() -> Vec<PieceKind> {
    PieceKind::iter_hand().collect()
}

#[test]
fn test_opening_pawn_push() {
    let pos = Position::startpos();
    let outcome = pos.apply_usi("7g7f").unwrap();

    assert_eq!(outcome.position().side_to_move(), Side::Gote);
    assert!(!outcome.is_check());
    assert!(!outcome.is_checkmate());
}

#[test]
fn test_drop_mate() {
    let pos = pos_of("9/9/9/9/9/9/9/9/k1K6 b R 1");
    assert!(!is_checkmate(pos.board(), pos.hands(), Side::Gote));

    let outcome = pos.apply_drop(SQ_91, PieceKind::Rook).unwrap();
    let after = outcome.position();
    assert!(is_checkmate(after.board(), after.hands(), Side::Gote));
    assert!(outcome.is_checkmate());
}

#[test]
fn test_forced_promotion() {
    let pos = pos_of("k8/4P4/9/9/9/9/9/9/4K4 b - 1");
    let outcome = pos.apply_move(SQ_52, SQ_51, false).unwrap();

    assert_eq!(
        outcome.position().board()[SQ_51],
        Some(Piece::new(Side::Sente, PieceKind::ProPawn))
    );

    // 不成の指し手は合法手として生成されない。
    let mvs = pos.legal_moves();
    assert!(mvs.contains(&Move::new_walk_promotion(SQ_52, SQ_51)));
    assert!(!mvs.contains(&Move::new_walk(SQ_52, SQ_51)));
}

/// 着手が失敗した場合、元の局面は変わらない。成功した場合も元の局面は変わらない。
#[test]
fn test_apply_is_pure() {
    let pos = pos_of("4k4/9/9/9/4r4/9/9/4G4/4K4 b Pp 7");
    let before = pos.clone();

    for (src, dst, promote) in iproduct!(squares(), squares(), [false, true]) {
        let _ = pos.apply_move(src, dst, promote);
    }
    for (dst, pk) in iproduct!(squares(), kinds()) {
        let _ = pos.apply_drop(dst, pk);
    }

    assert_eq!(pos, before);
}

/// 着手が成功するのは、ちょうど合法手として生成される指し手のときに限る。
#[test]
fn test_apply_agrees_with_legal_moves() {
    for sfen in [
        "startpos",
        "4k4/9/9/9/4r4/9/9/4G4/4K4 b Pp 7",
        "lnsgkgsnl/1r5b1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL b - 3",
        "k8/4P4/2N6/9/9/9/9/9/4K4 b L 1",
    ] {
        let pos = pos_of(sfen);
        let legal = pos.legal_moves();

        for (src, dst, promote) in iproduct!(squares(), squares(), [false, true]) {
            let ok = pos.apply_move(src, dst, promote).is_ok();

            // 強制成りの場合、不成を指定しても成りとして受理される。
            let forced = pos.board()[src].map_or(false, |pc| must_promote(pc, dst));
            let expected = if promote || forced {
                legal.contains(&Move::new_walk_promotion(src, dst))
            } else {
                legal.contains(&Move::new_walk(src, dst))
            };
            assert_eq!(ok, expected, "{}: {:?} -> {:?} promote={}", sfen, src, dst, promote);
        }

        for (dst, pk) in iproduct!(squares(), hand_kinds()) {
            let ok = pos.apply_drop(dst, pk).is_ok();
            assert_eq!(
                ok,
                legal.contains(&Move::new_drop(pk, dst)),
                "{}: {:?} {:?}",
                sfen,
                pk,
                dst
            );
        }
    }
}

#[test]
fn test_error_codes() {
    let pos = pos_of("4k4/9/9/9/4r4/9/9/4G4/4K4 b P 1");

    let code = |r: Result<MoveOutcome, RuleError>| r.map(|_| ()).map_err(RuleError::code);

    assert_eq!(code(pos.apply_move(SQ_11, SQ_12, false)), Err("InvalidMove"));
    assert_eq!(code(pos.apply_move(SQ_55, SQ_56, false)), Err("InvalidMove"));
    assert_eq!(code(pos.apply_move(SQ_58, SQ_38, false)), Err("CannotMoveTo"));
    assert_eq!(code(pos.apply_move(SQ_58, SQ_48, false)), Err("MustEscapeCheck"));
    assert_eq!(code(pos.apply_move(SQ_58, SQ_57, true)), Err("CannotPromote"));
    assert_eq!(code(pos.apply_drop(SQ_58, PieceKind::Pawn)), Err("CannotDropTo"));
    assert_eq!(code(pos.apply_drop(SQ_57, PieceKind::Gold)), Err("NoPieceInHand"));
    assert_eq!(code(pos.apply_drop(SQ_47, PieceKind::Pawn)), Ok(()));
}

#[test]
fn test_hands_never_hold_promoted_pieces() {
    // 成駒を取ると元の駒種として手駒になる。
    let pos = pos_of("4k4/9/9/9/4+p4/4G4/9/9/4K4 b - 1");
    let outcome = pos.apply_move(SQ_56, SQ_55, false).unwrap();

    assert_eq!(
        outcome.captured(),
        Some(Piece::new(Side::Gote, PieceKind::ProPawn))
    );
    let hand = outcome.position().hand(Side::Sente);
    assert_eq!(hand.count(PieceKind::Pawn), 1);
    assert!(hand.iter().all(|(pk, _)| pk.is_hand()));
}

#[test]
fn test_usi_round_trip_all_squares() {
    for (src, dst) in iproduct!(squares(), squares()) {
        for promote in [false, true] {
            let s = build_usi_move(src, dst, promote);
            let expected = if promote {
                Move::new_walk_promotion(src, dst)
            } else {
                Move::new_walk(src, dst)
            };
            assert_eq!(parse_usi(&s).unwrap(), expected);
        }
    }

    for (pk, dst) in iproduct!(hand_kinds(), squares()) {
        let s = build_usi_drop(pk, dst);
        assert_eq!(parse_usi(&s).unwrap(), Move::new_drop(pk, dst));
    }
}

#[test]
fn test_drops_for_never_allows_nifu() {
    let pos = pos_of("4k4/9/p1p6/9/9/9/P3P4/9/4K4 b P 1");

    for side in Side::iter() {
        let pawn_files: Vec<_> = pos
            .board()
            .pieces()
            .filter(|&(_, pc)| pc == Piece::new(side, PieceKind::Pawn))
            .map(|(sq, _)| sq.file())
            .collect();

        for sq in drops_for(pos.board(), PieceKind::Pawn, side) {
            assert!(!pawn_files.contains(&sq.file()), "{:?} {:?}", side, sq);
        }
    }
}
