//! REPLコマンド

/// REPLコマンド
///
/// 解析済みのレコードを表示するローカルコマンドと、
/// gdbへそのまま渡すコマンド行を区別します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// スレッド一覧表示
    Threads,
    /// バックトレース表示
    Backtrace,
    /// レジスタ表示（名前指定で1つだけ）
    Registers(Option<String>),
    /// ローカル変数表示
    Locals,
    /// 引数表示
    Args,
    /// フレーム選択
    Frame(Option<u32>),
    /// 1つ外側のフレームへ
    Up,
    /// 1つ内側のフレームへ
    Down,
    /// ヘルプ表示
    Help,
    /// 終了
    Quit,
    /// gdbへそのまま送るコマンド行
    Raw(String),
}

impl Command {
    /// コマンド文字列をパースする
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return None;
        }

        let command = match (parts[0], parts.len()) {
            ("threads", 1) => Command::Threads,
            ("backtrace" | "bt", 1) => Command::Backtrace,
            ("regs", 1) => Command::Registers(None),
            ("regs", 2) => Command::Registers(Some(parts[1].to_string())),
            ("locals", 1) => Command::Locals,
            ("args", 1) => Command::Args,
            ("frame" | "f", 1) => Command::Frame(None),
            ("frame" | "f", 2) => match parts[1].parse() {
                Ok(num) => Command::Frame(Some(num)),
                Err(_) => Command::Raw(input.to_string()),
            },
            ("up", 1) => Command::Up,
            ("down", 1) => Command::Down,
            ("help" | "?", 1) => Command::Help,
            ("quit" | "q" | "exit", 1) => Command::Quit,
            _ => Command::Raw(input.to_string()),
        };
        Some(command)
    }
}
