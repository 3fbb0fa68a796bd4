//! スレッド一覧の解析
//!
//! ```text
//! * 1 process 2332 thread 0x20b  0x950aa9e6 in mach_msg_trap ()
//! * 1 process 3197 local thread 0x2d03  main (argc=1, argv=0xbffff590) at main.c:75
//! ```

use crate::listing::collect_records;
use crate::location::{location_pattern, Location};
use crate::parse::starts_with_any;
use crate::{ConsoleError, Gdb, RecordKind, Result};
use gdbcon_target::Transport;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static THREAD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<cur>\*)?\s+(?P<num>\d+) process (?P<pid>\d+).+thread (?P<tid>0x[\dA-Fa-f]+)\s+{}",
        location_pattern()
    ))
    .expect("thread line pattern must compile")
});

/// スレッドがないことを示す応答
const NO_THREADS: &[&str] = &["No threads.", "No registers."];

/// スレッド番号
pub type ThreadNum = u32;

/// スレッド一覧の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    /// 現在選択中のスレッドか（`*` 付き）
    pub current: bool,
    /// gdb上のスレッド番号
    pub number: ThreadNum,
    /// プロセスID
    pub pid: u32,
    /// スレッドID（`0x...`）
    pub tid: String,
    /// 実行位置
    pub location: Location,
}

impl ThreadRecord {
    /// スレッド一覧の1行を解析する
    pub fn parse(line: &str) -> Result<Self> {
        let err = || ConsoleError::parse(RecordKind::Thread, line);
        let caps = THREAD_LINE.captures(line).ok_or_else(err)?;

        Ok(Self {
            current: caps.name("cur").is_some(),
            number: caps["num"].parse().map_err(|_| err())?,
            pid: caps["pid"].parse().map_err(|_| err())?,
            tid: caps["tid"].to_string(),
            location: Location::from_captures(&caps).ok_or_else(err)?,
        })
    }

    /// このスレッドの詳細（`info thread N`）を取得する
    pub fn info<T: Transport>(&self, gdb: &mut Gdb<T>) -> Result<String> {
        gdb.info_thread(self.number)
    }
}

/// `info threads` の応答を解析する
pub fn parse_thread_listing(text: &str) -> Result<BTreeMap<ThreadNum, ThreadRecord>> {
    if starts_with_any(text, NO_THREADS) {
        return Ok(BTreeMap::new());
    }
    collect_records(text.lines(), ThreadRecord::parse, |t| t.number)
}
