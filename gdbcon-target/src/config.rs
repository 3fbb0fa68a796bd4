//! コンソール起動設定

use std::path::PathBuf;

/// gdbのデフォルトプロンプト
pub const DEFAULT_PROMPT: &str = "(gdb) ";

/// gdbのデフォルト実行ファイル名
pub const DEFAULT_PROGRAM: &str = "gdb";

/// コンソールプロセスの起動設定
///
/// `program` と `args` で起動するコマンドラインを、`prompt` で
/// コンソールがアイドル時に出力するプロンプト文字列を指定します。
/// プロンプトは対象のgdbのバージョンが出力するものと完全に一致している必要があります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// 起動するプログラム
    pub program: PathBuf,
    /// プログラムに渡す引数
    pub args: Vec<String>,
    /// 応答の終端を示すプロンプト
    pub prompt: String,
}

impl ConsoleConfig {
    /// 起動するプログラムを設定する
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// プログラムに渡す引数を設定する
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// プロンプト文字列を設定する
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

impl Default for ConsoleConfig {
    /// `gdb -n -q` を `(gdb) ` プロンプトで起動する設定
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            args: vec!["-n".to_string(), "-q".to_string()],
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}
