//! gdbcon コンソールプロセス制御
//!
//! このクレートは、対話型コンソール（gdb）を子プロセスとして起動し、
//! 標準入出力をパイプ越しにバイト単位で読み書きするための低レベル機能を提供します。
//! 標準エラー出力は標準出力と同じパイプにまとめられます。

pub mod config;
pub mod process;
pub mod transport;

pub use config::ConsoleConfig;
pub use process::ConsoleProcess;
pub use transport::{StreamTransport, Transport};

/// ターゲット制御の結果型
pub type Result<T> = anyhow::Result<T>;
