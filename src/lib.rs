mod effect;
mod error;
mod json;
mod movegen;
pub mod myarray;
pub mod mylog;
mod perft;
mod position;
mod replay;
mod sfen;
mod shogi;
mod usi;

pub use self::effect::*;
pub use self::error::*;
pub use self::json::*;
pub use self::movegen::*;
pub use self::perft::*;
pub use self::position::*;
pub use self::replay::*;
pub use self::sfen::*;
pub use self::shogi::*;
pub use self::usi::*;
