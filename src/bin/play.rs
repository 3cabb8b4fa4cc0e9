//! 二人で指すためのシェル。全ての指し手は規則どおりに検査される。

use std::ops::ControlFlow;

use anyhow::{bail, Context as _};
use structopt::StructOpt;

use shogi_rules::*;

#[derive(Debug, StructOpt)]
struct Opt {
    /// 開始局面 (sfen または "startpos"。"moves ..." を続けてもよい)。
    #[structopt(long, default_value = "startpos")]
    sfen: String,

    /// ログを詳しく出力する。
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    init_logger(opt.verbose)?;

    let mut shell = Shell::new(&opt.sfen)?;

    shell.interact()?;

    Ok(())
}

fn init_logger(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

#[derive(Debug)]
struct Shell {
    history: Vec<Position>,
    mvs: Vec<Move>,
}

impl Shell {
    fn new(sfen: &str) -> anyhow::Result<Self> {
        let (pos, mvs) = sfen_decode(sfen)?;

        let mut this = Self {
            history: vec![pos],
            mvs: Vec::new(),
        };

        for (i, mv) in mvs.into_iter().enumerate() {
            this.do_move(mv)
                .with_context(|| format!("cannot apply initial move #{}", i + 1))?;
        }

        Ok(this)
    }

    fn position(&self) -> &Position {
        // history は常に開始局面を含む。
        &self.history[self.history.len() - 1]
    }

    fn interact(&mut self) -> anyhow::Result<()> {
        use std::io::Write as _;

        self.print_position();

        loop {
            println!();
            print!("play shell > ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                break;
            }

            let tokens: Vec<_> = line.split_ascii_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let cmd = tokens[0];
            let args = &tokens[1..];

            match self.do_command(cmd, args) {
                Ok(ControlFlow::Break(_)) => break,
                Err(e) => println!("error: {:#}", e),
                _ => {}
            }
        }

        Ok(())
    }

    fn do_command(&mut self, cmd: &str, args: &[&str]) -> anyhow::Result<ControlFlow<()>> {
        match cmd {
            "quit" => return Ok(ControlFlow::Break(())),
            "move" => self.do_command_move(args)?,
            "undo" => self.do_command_undo(args)?,
            "print" => self.do_command_print(args)?,
            "moves" => self.do_command_moves(args)?,
            _ => bail!("unknown command: {}", cmd),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn do_move(&mut self, mv: Move) -> anyhow::Result<MoveOutcome> {
        let outcome = self.position().apply(mv)?;

        self.mvs.push(outcome.applied_move());
        self.history.push(outcome.position().clone());

        Ok(outcome)
    }

    fn do_command_move(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let mv_s = args.get(0).context("move is not specified")?;
        let mv = parse_usi(mv_s)?;

        let outcome = self.do_move(mv)?;

        self.print_position();

        if outcome.is_checkmate() {
            println!("詰み: {}の勝ち", outcome.position().side_to_move().inv());
        } else if outcome.is_check() {
            println!("王手");
        }

        Ok(())
    }

    fn do_command_undo(&mut self, _args: &[&str]) -> anyhow::Result<()> {
        if self.mvs.pop().is_none() {
            bail!("history is empty");
        }
        self.history.pop();

        self.print_position();

        Ok(())
    }

    fn do_command_moves(&mut self, _args: &[&str]) -> anyhow::Result<()> {
        let strs: Vec<_> = self
            .position()
            .legal_moves()
            .into_iter()
            .map(usi_encode_move)
            .collect();

        println!("{} 手: {}", strs.len(), strs.join(" "));

        Ok(())
    }

    fn do_command_print(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let obj_s = *args.get(0).context("object name is not specified")?;

        match obj_s {
            "position" => self.print_position(),
            "sfen" => println!("{}", sfen_encode(&self.history[0], &self.mvs)),
            "json" => println!(
                "{}",
                serde_json::to_string_pretty(&StateJson::from(self.position()))?
            ),
            "record" => {
                // replay コマンドにそのまま渡せる形式。
                let moves: Vec<_> = self.mvs.iter().copied().map(MoveRecord::from_move).collect();
                let record = serde_json::json!({
                    "initial": StateJson::from(&self.history[0]),
                    "moves": moves,
                });
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            "effect" => {
                for side in Side::iter() {
                    let ecb = EffectCountBoard::from_board(self.position().board(), side);
                    println!("{} 利き数:", side);
                    print!("{}", ecb);
                }
            }
            _ => bail!("unknown object name: {}", obj_s),
        }

        Ok(())
    }

    fn print_position(&self) {
        print!("{}", self.position());
    }
}
