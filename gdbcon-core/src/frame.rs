//! スタックフレームの解析
//!
//! ```text
//! #2  0x6840 in expand_token (obs=0x0, t=177664, td=0xf7fffb08) at macro.c:71
//! ```

use crate::listing::{collect_records, fold_continuations};
use crate::location::{location_pattern, Location};
use crate::parse::starts_with_any;
use crate::variable::VariableRecord;
use crate::{ConsoleError, Gdb, RecordKind, Result};
use gdbcon_target::Transport;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static FRAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^#(?P<num>\d+)\s+{}", location_pattern()))
        .expect("frame line pattern must compile")
});

/// スタックがないことを示す応答
const NO_STACK: &[&str] = &["No stack."];

/// フレーム番号
pub type FrameNum = u32;

/// スタックフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    /// フレーム番号（0が最も内側）
    pub number: FrameNum,
    /// 実行位置
    pub location: Location,
}

impl FrameRecord {
    /// フレーム行を解析する
    ///
    /// `frame` や `up` の応答のように複数行のテキストが渡された場合は、先頭行を解析します。
    pub fn parse(text: &str) -> Result<Self> {
        let line = text.lines().next().unwrap_or("");
        let err = || ConsoleError::parse(RecordKind::Frame, line);
        let caps = FRAME_LINE.captures(line).ok_or_else(err)?;

        Ok(Self {
            number: caps["num"].parse().map_err(|_| err())?,
            location: Location::from_captures(&caps).ok_or_else(err)?,
        })
    }

    /// このフレームの詳細（`info frame N`）を取得する
    pub fn info<T: Transport>(&self, gdb: &mut Gdb<T>) -> Result<String> {
        gdb.info_frame(self.number)
    }

    /// このフレームを選択して引数を取得する
    pub fn args<T: Transport>(
        &self,
        gdb: &mut Gdb<T>,
    ) -> Result<BTreeMap<String, VariableRecord>> {
        gdb.select_frame(self.number)?;
        gdb.info_args()
    }

    /// このフレームを選択してローカル変数を取得する
    pub fn locals<T: Transport>(
        &self,
        gdb: &mut Gdb<T>,
    ) -> Result<BTreeMap<String, VariableRecord>> {
        gdb.select_frame(self.number)?;
        gdb.info_locals()
    }
}

/// `backtrace` の応答を解析する
pub fn parse_backtrace(text: &str) -> Result<BTreeMap<FrameNum, FrameRecord>> {
    if starts_with_any(text, NO_STACK) {
        return Ok(BTreeMap::new());
    }
    let lines = fold_continuations(text);
    collect_records(lines.iter().map(String::as_str), FrameRecord::parse, |f| f.number)
}
