//! sfen 文字列の読み書き。
//!
//! ref: [USI プロトコル](http://shogidokoro.starfree.jp/usi.html)

mod decode;
mod encode;

pub use self::decode::*;
pub use self::encode::*;
