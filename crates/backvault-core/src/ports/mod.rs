//! Ports - 抽象化レイヤー
//!
//! 外部のもの（時計、ダンプツール、端末、データベース）への
//! インターフェースを trait として定義し、実装の詳細を隠蔽します。

pub mod clock;
pub mod dump_runner;
pub mod prompter;
pub mod sql_session;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::dump_runner::DumpRunner;
pub use self::prompter::{Prompter, Selection, parse_selection};
pub use self::sql_session::{SqlSession, StatementError};
