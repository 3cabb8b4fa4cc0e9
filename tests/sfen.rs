use std::path::PathBuf;

#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};
use walkdir::WalkDir;

use shogi_rules::{sfen_decode, sfen_decode_position, sfen_encode, Position};

const SFEN_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/asset/sfen");

fn get_sfen_paths() -> impl Iterator<Item = PathBuf> {
    WalkDir::new(SFEN_DIR)
        .into_iter()
        .map(|entry| entry.expect("invalid directory entry").into_path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "sfen"))
}

fn get_sfens() -> impl Iterator<Item = String> {
    get_sfen_paths()
        .map(|path| std::fs::read_to_string(path).expect("cannot read sfen file"))
        .flat_map(|body| {
            body.lines()
                .map(|line| line.trim().to_owned())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
        })
}

#[test]
fn test_sfen_roundtrip() {
    let mut n = 0;

    for sfen in get_sfens() {
        let (pos, mvs) = sfen_decode(&sfen).unwrap();
        let sfen_encoded = sfen_encode(&pos, &mvs);
        assert_eq!(sfen, sfen_encoded);
        n += 1;
    }

    assert!(n > 0, "no sfen found in {}", SFEN_DIR);
}

/// 全ての棋譜の指し手が規則どおり適用でき、局面の sfen も往復できることを確認する。
#[test]
fn test_sfen_moves_are_legal() {
    for sfen in get_sfens() {
        let (mut pos, mvs) = sfen_decode(&sfen).unwrap();

        for mv in mvs {
            pos = pos
                .apply(mv)
                .unwrap_or_else(|e| panic!("{}: {} rejected: {}", sfen, mv, e))
                .into_position();

            let sfen_pos = pos.to_sfen();
            assert_eq!(sfen_decode_position(&sfen_pos).unwrap(), pos);
        }
    }
}

#[test]
fn test_startpos_aliases() {
    let (pos, mvs) = sfen_decode("position startpos").unwrap();

    assert_eq!(pos, Position::startpos());
    assert!(mvs.is_empty());
    assert_eq!(sfen_encode(&pos, &mvs), "startpos moves");
}
