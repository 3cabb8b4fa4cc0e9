//! JSON 形式の棋譜を再生し、指定した手数の局面を出力する。
//!
//! 入力は以下の形のオブジェクト:
//!
//! ```json
//! {
//!   "initial": null,
//!   "moves": [{ "usi": "7g7f" }, { "from_row": 2, "from_col": 6, "to_row": 3, "to_col": 6 }]
//! }
//! ```
//!
//! `initial` は null (平手)、sfen 文字列、構造化された局面のいずれか。省略時は平手。

use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::arg_enum;
use serde::Deserialize;
use serde_json::Value;
use structopt::StructOpt;

use shogi_rules::*;

arg_enum! {
    /// 局面の出力形式。
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum Format {
        Json,
        Sfen,
        Text,
    }
}

#[derive(Debug, StructOpt)]
struct Opt {
    /// 再生する手数。省略時は最後まで。
    #[structopt(long)]
    ply: Option<usize>,

    /// 不正な指し手があればエラーにする(デフォルトは読み飛ばす)。
    #[structopt(long)]
    strict: bool,

    /// 局面の出力形式。
    #[structopt(
        long,
        possible_values = &Format::variants(),
        case_insensitive = true,
        default_value = "Json"
    )]
    format: Format,

    /// 各手の再生ログを出力する。
    #[structopt(short, long)]
    verbose: bool,

    /// 棋譜ファイル。省略時は標準入力から読む。
    #[structopt(parse(from_os_str))]
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct GameRecord {
    #[serde(default)]
    initial: Value,
    #[serde(default)]
    moves: Vec<MoveRecord>,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    let body = match &opt.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };
    let record: GameRecord = serde_json::from_str(&body).context("invalid game record")?;

    let initial = InitialState::from_json_value(&record.initial)?;
    let up_to_ply = opt.ply.unwrap_or(usize::MAX);
    let policy = if opt.strict {
        ReplayPolicy::Strict
    } else {
        ReplayPolicy::Lenient
    };

    let replay = derive_state_with_policy(&initial, &record.moves, up_to_ply, policy)?;

    if opt.verbose {
        mylog::log_position(&replay.position);
    }

    match opt.format {
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&StateJson::from(&replay.position))?
        ),
        Format::Sfen => println!("{}", replay.position.to_sfen()),
        Format::Text => println!("{}", replay.position),
    }

    Ok(())
}
