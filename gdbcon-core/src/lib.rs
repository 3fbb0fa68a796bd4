//! gdbcon のコア機能
//!
//! このクレートは、対話型コンソール（gdb）との行単位のやり取りと、その応答の解析を提供します。
//! プロンプトによる応答の区切り、コマンドの送受信、スレッド・フレーム・レジスタ・変数の
//! 各出力の解析、そしてそれらをまとめたセッションを扱います。

pub mod channel;
pub mod command;
pub mod error;
pub mod frame;
pub mod location;
pub mod parse;
pub mod prompt;
pub mod register;
pub mod session;
pub mod thread;
pub mod variable;

mod listing;

pub use channel::{format_command, CommandArgs, CommandChannel};
pub use command::Command;
pub use error::{ConsoleError, RecordKind};
pub use frame::{parse_backtrace, FrameNum, FrameRecord};
pub use location::Location;
pub use prompt::{read_until_prompt, Transaction};
pub use register::{parse_register_dump, RegisterRecord};
pub use session::{Gdb, KillOutcome, RunOutcome};
pub use thread::{parse_thread_listing, ThreadNum, ThreadRecord};
pub use variable::{parse_variables, VariableRecord};

// 他のクレートから使用するために再エクスポート
pub use gdbcon_target::{ConsoleConfig, ConsoleProcess, StreamTransport, Transport};

/// コンソール操作の結果型
pub type Result<T> = std::result::Result<T, ConsoleError>;
