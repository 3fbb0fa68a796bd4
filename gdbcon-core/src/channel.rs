//! コマンドチャネル
//!
//! コマンドを1行送信し、そのコマンドの応答だけをプロンプトまで読み取ります。
//! 同時に処理中のコマンドは常に1つだけです。

use crate::prompt::{read_until_prompt, Transaction};
use gdbcon_target::Transport;
use std::io;
use tracing::debug;

/// コマンドの引数
///
/// スカラーは文字列化され、コレクションは空白1つで連結されます。
/// エスケープは行いません。描画結果が空の場合は引数なしとして扱います。
pub trait CommandArgs {
    /// 引数を文字列に描画する（引数なしなら `None`）
    fn render(&self) -> Option<String>;
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl CommandArgs for () {
    fn render(&self) -> Option<String> {
        None
    }
}

impl CommandArgs for str {
    fn render(&self) -> Option<String> {
        non_empty(self.to_string())
    }
}

impl CommandArgs for String {
    fn render(&self) -> Option<String> {
        self.as_str().render()
    }
}

impl<S: AsRef<str>> CommandArgs for [S] {
    fn render(&self) -> Option<String> {
        let parts: Vec<&str> = self.iter().map(AsRef::as_ref).collect();
        non_empty(parts.join(" "))
    }
}

impl<S: AsRef<str>> CommandArgs for Vec<S> {
    fn render(&self) -> Option<String> {
        self.as_slice().render()
    }
}

impl<T: CommandArgs> CommandArgs for Option<T> {
    fn render(&self) -> Option<String> {
        self.as_ref().and_then(CommandArgs::render)
    }
}

impl<T: CommandArgs + ?Sized> CommandArgs for &T {
    fn render(&self) -> Option<String> {
        (**self).render()
    }
}

macro_rules! scalar_args {
    ($($ty:ty),*) => {
        $(
            impl CommandArgs for $ty {
                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

scalar_args!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// コマンド名と引数から1行のコマンドを組み立てる（改行は含まない）
pub fn format_command<A: CommandArgs + ?Sized>(command: &str, args: &A) -> String {
    match args.render() {
        Some(args) => format!("{} {}", command, args),
        None => command.to_string(),
    }
}

/// コマンドチャネル
pub struct CommandChannel<T> {
    transport: T,
    prompt: String,
}

impl<T: Transport> CommandChannel<T> {
    /// 新しいコマンドチャネルを作成する
    pub fn new(transport: T, prompt: impl Into<String>) -> Self {
        Self {
            transport,
            prompt: prompt.into(),
        }
    }

    /// コマンドを1行送信する（応答は読まない）
    ///
    /// `line + "\n"` を1回の書き込みで送信します。
    pub fn send(&mut self, line: &str) -> io::Result<()> {
        debug!("$ {}", line);
        let mut cmd_line = String::with_capacity(line.len() + 1);
        cmd_line.push_str(line);
        cmd_line.push('\n');
        self.transport.write_all(cmd_line.as_bytes())
    }

    /// 次のプロンプトまで読み取る
    pub fn read_until_prompt(&mut self) -> io::Result<Transaction> {
        read_until_prompt(&mut self.transport, &self.prompt)
    }

    /// コマンドを送信し、その応答を読み取る
    pub fn communicate(&mut self, line: &str) -> io::Result<Transaction> {
        self.send(line)?;
        self.read_until_prompt()
    }

    /// トランスポートへの参照を取得する
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// トランスポートを可変参照で取得する
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
