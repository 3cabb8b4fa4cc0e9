//! ログ出力。
//!
//! ライブラリ側は `log` のマクロを呼ぶだけで、出力先はバイナリ側で設定する。

use log::{debug, info, warn};

use crate::json::MoveRecord;
use crate::position::Position;
use crate::replay::RecordError;
use crate::shogi::*;

/// 与えられた局面をログ出力する。
pub fn log_position(pos: &Position) {
    info!("手番: {} ({}手目)", pos.side_to_move(), pos.ply());
    info!("");
    info!("後手 手駒: {}", pos.hand(Side::Gote));
    info!("");
    info!("{}", pos.board());
    info!("先手 手駒: {}", pos.hand(Side::Sente));
    info!("");
}

/// 棋譜再生開始ログを出力する。
pub fn log_replay_start(record_count: usize, up_to_ply: usize) {
    info!(
        "# 棋譜再生開始: {} 手中 {} 手まで",
        record_count,
        up_to_ply.min(record_count)
    );
}

/// 開始局面が読めず平手初期局面で代替したログを出力する。
pub fn log_replay_fallback_to_startpos(err: &anyhow::Error) {
    warn!("開始局面が不正なため平手初期局面を使う: {:#}", err);
}

/// 棋譜の 1 手を適用したログを出力する。
pub fn log_replay_applied(index: usize, mv: Move) {
    debug!("#{}: {}", index + 1, mv);
}

/// 棋譜の 1 手を読み飛ばしたログを出力する。
pub fn log_replay_skipped(index: usize, record: &MoveRecord, cause: &RecordError) {
    warn!("#{}: 棋譜の指し手を読み飛ばす ({}): {:?}", index + 1, cause, record);
}

/// 棋譜再生終了ログを出力する。
pub fn log_replay_end(applied: usize, skipped: usize) {
    info!("# 棋譜再生終了: 適用 {} 手, 読み飛ばし {} 手", applied, skipped);
}
