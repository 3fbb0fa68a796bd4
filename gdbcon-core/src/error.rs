//! エラー型

use std::fmt;
use thiserror::Error;

/// 解析対象のレコードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Thread,
    Frame,
    Register,
    Variable,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Thread => "thread",
            RecordKind::Frame => "frame",
            RecordKind::Register => "register",
            RecordKind::Variable => "variable",
        };
        f.write_str(name)
    }
}

/// コンソール操作のエラー
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// コンソールプロセスを起動できなかった
    #[error("Failed to launch console: {0}")]
    Launch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// パイプの読み書きに失敗した
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// プロンプトが出る前にコンソールの出力が終端した
    #[error("Console exited before printing its prompt (partial output: {partial:?})")]
    Disconnected { partial: String },

    /// 行が文法に一致しなかった
    #[error("Malformed {kind} line: {line:?}")]
    Parse { kind: RecordKind, line: String },

    /// コンソールがアタッチに失敗したと報告した
    #[error("{0}")]
    AttachRefused(String),
}

impl ConsoleError {
    pub(crate) fn parse(kind: RecordKind, line: &str) -> Self {
        ConsoleError::Parse {
            kind,
            line: line.to_string(),
        }
    }
}
