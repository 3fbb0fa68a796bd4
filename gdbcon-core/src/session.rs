//! gdbセッション
//!
//! コンソールの各コマンドを1つのメソッドとして公開します。
//! 各メソッドはコマンド行を組み立ててチャネルに送り、必要なら応答を解析します。

use crate::channel::{format_command, CommandArgs, CommandChannel};
use crate::frame::{parse_backtrace, FrameNum, FrameRecord};
use crate::register::{has_no_registers, parse_register_dump, RegisterRecord};
use crate::thread::{parse_thread_listing, ThreadNum, ThreadRecord};
use crate::variable::{parse_variables, VariableRecord};
use crate::{ConsoleError, Result};
use gdbcon_target::{ConsoleConfig, ConsoleProcess, Transport};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 既に実行中のプログラムを再起動しようとしたときの応答
const ALREADY_STARTED: &str = "The program being debugged has been started already.";

/// プログラムが実行されていないときの `kill` の応答
const NOT_BEING_RUN: &str = "The program is not being run.";

/// `run` / `start` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// プログラムを起動した
    Started(String),
    /// 既に実行中だったため、確認に答えて再起動した
    Restarted(String),
}

impl RunOutcome {
    /// コンソールの出力を取得する
    pub fn output(&self) -> &str {
        match self {
            RunOutcome::Started(text) | RunOutcome::Restarted(text) => text,
        }
    }
}

/// `kill` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// プログラムは実行されていなかった
    NotRunning,
    /// 確認に答えてプログラムを終了させた
    Killed(String),
}

/// gdbセッション
pub struct Gdb<T: Transport = ConsoleProcess> {
    channel: CommandChannel<T>,
}

impl Gdb<ConsoleProcess> {
    /// gdbを起動してセッションを開始する
    ///
    /// 起動メッセージは最初のプロンプトまで読み捨てます。
    pub fn launch(config: &ConsoleConfig) -> Result<Self> {
        let process = ConsoleProcess::spawn(config).map_err(|e| ConsoleError::Launch(e.into()))?;
        Self::with_transport(process, config.prompt.clone())
    }
}

impl<T: Transport> Gdb<T> {
    /// 任意のトランスポート上でセッションを開始する
    pub fn with_transport(transport: T, prompt: impl Into<String>) -> Result<Self> {
        let mut channel = CommandChannel::new(transport, prompt);
        let banner = channel.read_until_prompt()?;
        if !banner.complete {
            return Err(ConsoleError::Disconnected {
                partial: banner.output,
            });
        }
        Ok(Self { channel })
    }

    /// コマンドを送信して応答のテキストを取得する
    fn cmd<A: CommandArgs + ?Sized>(&mut self, command: &str, args: &A) -> Result<String> {
        let line = format_command(command, args);
        let tx = self.channel.communicate(&line)?;
        if !tx.complete {
            return Err(ConsoleError::Disconnected { partial: tx.output });
        }
        Ok(tx.output)
    }

    /// コマンド行をそのまま送信して応答を取得する
    pub fn execute(&mut self, line: &str) -> Result<String> {
        self.cmd(line, &())
    }

    /// gdbを終了させる
    ///
    /// `q` を送信した後は応答を待たず、トランスポートを閉じます。
    pub fn quit(mut self) -> Result<()> {
        self.channel.send("q")?;
        self.channel.transport_mut().shutdown()?;
        Ok(())
    }

    /// 確認の問い合わせに `y` と答える
    fn confirm(&mut self) -> Result<String> {
        self.cmd("y", &())
    }

    // ---------------------------------------------------------------
    // ファイルとターゲット

    /// 実行ファイルを読み込む
    pub fn file(&mut self, filename: &str) -> Result<String> {
        self.cmd("file", filename)
    }

    /// ヘルプを表示する
    pub fn help(&mut self) -> Result<String> {
        self.cmd("h", &())
    }

    /// コアファイルをターゲットにする
    pub fn target_core(&mut self, filename: &str) -> Result<String> {
        self.cmd("target core", filename)
    }

    /// 実行ファイルをターゲットにする
    pub fn target_exec(&mut self, filename: &str) -> Result<String> {
        self.cmd("target exec", filename)
    }

    // ---------------------------------------------------------------
    // フレーム

    /// バックトレースを取得する
    pub fn backtrace(&mut self) -> Result<BTreeMap<FrameNum, FrameRecord>> {
        let txt = self.cmd("backtrace", &())?;
        parse_backtrace(&txt)
    }

    /// 1つ内側のフレームへ移動する（最も内側なら `None`）
    pub fn down(&mut self, count: Option<u32>) -> Result<Option<FrameRecord>> {
        let txt = self.cmd("down", &count)?;
        if txt.starts_with("Bottom") {
            return Ok(None);
        }
        FrameRecord::parse(&txt).map(Some)
    }

    /// 1つ外側のフレームへ移動する（最も外側なら `None`）
    pub fn up(&mut self, count: Option<u32>) -> Result<Option<FrameRecord>> {
        let txt = self.cmd("up", &count)?;
        if txt.starts_with("Initial") {
            return Ok(None);
        }
        FrameRecord::parse(&txt).map(Some)
    }

    /// フレームを選択して表示する（省略時は現在のフレーム）
    pub fn frame(&mut self, frame: Option<FrameNum>) -> Result<FrameRecord> {
        let txt = self.cmd("frame", &frame)?;
        FrameRecord::parse(&txt)
    }

    /// 現在の関数から戻る
    ///
    /// gdbの確認に `y` と答え、戻った先のフレームを返します。
    pub fn return_from_frame(&mut self, value: Option<&str>) -> Result<FrameRecord> {
        let _confirm = self.cmd("return", &value)?;
        let txt = self.confirm()?;
        FrameRecord::parse(&txt)
    }

    /// フレームを表示せずに選択する
    pub fn select_frame(&mut self, frame: FrameNum) -> Result<()> {
        self.cmd("select-frame", &frame)?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // 実行制御

    /// プロセスにアタッチする
    ///
    /// gdbが `Unable` で始まるメッセージを返した場合は `AttachRefused` になります。
    pub fn attach<A: CommandArgs + ?Sized>(&mut self, target: &A) -> Result<String> {
        let txt = self.cmd("attach", target)?;
        if txt.starts_with("Unable") {
            warn!("Attach refused: {}", txt.trim_end());
            return Err(ConsoleError::AttachRefused(txt));
        }
        if let Some(line) = txt.lines().nth(1) {
            if line.starts_with("Unable") {
                warn!("Attach refused: {}", line);
                return Err(ConsoleError::AttachRefused(line.to_string()));
            }
        }
        Ok(txt)
    }

    /// 実行を継続する
    pub fn continue_execution(&mut self, ignore_count: Option<u32>) -> Result<String> {
        self.cmd("continue", &ignore_count)
    }

    /// プロセスからデタッチする
    pub fn detach(&mut self) -> Result<String> {
        self.cmd("detach", &())
    }

    /// 指定位置へジャンプする
    pub fn jump(&mut self, location: Option<&str>) -> Result<String> {
        self.cmd("jump", &location)
    }

    /// プログラムを終了させる
    pub fn kill(&mut self) -> Result<KillOutcome> {
        let txt = self.cmd("kill", &())?;
        if txt.starts_with(NOT_BEING_RUN) {
            return Ok(KillOutcome::NotRunning);
        }
        self.confirm().map(KillOutcome::Killed)
    }

    /// 次の行まで実行する（関数呼び出しはまたぐ）
    pub fn next(&mut self, count: Option<u32>) -> Result<String> {
        self.cmd("next", &count)
    }

    /// 次の命令まで実行する（関数呼び出しはまたぐ）
    pub fn nexti(&mut self, count: Option<u32>) -> Result<String> {
        self.cmd("nexti", &count)
    }

    /// プログラムを実行する
    pub fn run(&mut self, args: Option<&str>) -> Result<RunOutcome> {
        let txt = self.cmd("run", &args)?;
        self.process_run(txt)
    }

    /// mainで一時停止するようにプログラムを実行する
    pub fn start(&mut self, args: Option<&str>) -> Result<RunOutcome> {
        let txt = self.cmd("start", &args)?;
        self.process_run(txt)
    }

    /// 既に実行中だった場合は再起動の確認に答える
    fn process_run(&mut self, txt: String) -> Result<RunOutcome> {
        if txt.starts_with(ALREADY_STARTED) {
            debug!("Program already started; confirming restart");
            return self.confirm().map(RunOutcome::Restarted);
        }
        Ok(RunOutcome::Started(txt))
    }

    /// 次の行まで実行する（関数呼び出しに入る）
    pub fn step(&mut self, count: Option<u32>) -> Result<String> {
        self.cmd("step", &count)
    }

    /// 次の命令まで実行する（関数呼び出しに入る）
    pub fn stepi(&mut self, count: Option<u32>) -> Result<String> {
        self.cmd("stepi", &count)
    }

    /// スレッドを切り替える
    pub fn thread(&mut self, num: ThreadNum) -> Result<String> {
        self.cmd("thread", &num)
    }

    /// スレッドを再開する
    pub fn thread_resume(&mut self) -> Result<String> {
        self.cmd("thread resume", &())
    }

    /// スレッドを停止する
    pub fn thread_suspend(&mut self) -> Result<String> {
        self.cmd("thread suspend", &())
    }

    /// 指定位置（省略時は現在のループの後）まで実行する
    pub fn until(&mut self, location: Option<&str>) -> Result<String> {
        self.cmd("until", &location)
    }

    // ---------------------------------------------------------------
    // ブレークポイント

    /// ブレークポイントを設定する
    pub fn set_breakpoint(&mut self, location: Option<&str>) -> Result<String> {
        self.cmd("break", &location)
    }

    /// キャッチポイントを設定する
    pub fn catch(&mut self, event: Option<&str>) -> Result<String> {
        self.cmd("catch", &event)
    }

    /// 指定位置のブレークポイントを削除する
    pub fn clear(&mut self, location: Option<&str>) -> Result<String> {
        self.cmd("clear", &location)
    }

    /// ブレークポイントに条件を設定する
    pub fn condition(&mut self, args: Option<&str>) -> Result<String> {
        self.cmd("condition", &args)
    }

    /// ブレークポイントを番号で削除する
    pub fn delete(&mut self, breakpoints: Option<&str>) -> Result<String> {
        self.cmd("delete", &breakpoints)
    }

    /// ブレークポイントを無効化する
    pub fn disable(&mut self, breakpoints: Option<&str>) -> Result<String> {
        self.cmd("disable", &breakpoints)
    }

    /// ブレークポイントを有効化する
    pub fn enable(&mut self, breakpoints: Option<&str>) -> Result<String> {
        self.cmd("enable", &breakpoints)
    }

    /// ウォッチポイントを設定する
    pub fn watch(&mut self, expression: Option<&str>) -> Result<String> {
        self.cmd("watch", &expression)
    }

    // ---------------------------------------------------------------
    // 情報表示

    /// 選択中のフレームの引数を取得する
    pub fn info_args(&mut self) -> Result<BTreeMap<String, VariableRecord>> {
        let txt = self.cmd("info args", &())?;
        parse_variables(&txt)
    }

    /// 選択中のフレームのローカル変数を取得する
    pub fn info_locals(&mut self) -> Result<BTreeMap<String, VariableRecord>> {
        let txt = self.cmd("info locals", &())?;
        parse_variables(&txt)
    }

    /// フレームの詳細を取得する
    pub fn info_frame(&mut self, num: FrameNum) -> Result<String> {
        self.cmd("info frame", &num)
    }

    /// 関数の一覧を取得する
    pub fn info_functions(&mut self) -> Result<String> {
        self.cmd("info functions", &())
    }

    /// すべてのレジスタを取得する
    pub fn info_registers(&mut self) -> Result<BTreeMap<String, RegisterRecord>> {
        let txt = self.cmd("info registers", &())?;
        parse_register_dump(&txt)
    }

    /// 1つのレジスタを取得する（プログラムが実行されていなければ `None`）
    pub fn info_register(&mut self, name: &str) -> Result<Option<RegisterRecord>> {
        let txt = self.cmd("info registers", name)?;
        if has_no_registers(&txt) {
            return Ok(None);
        }
        RegisterRecord::parse(&txt).map(Some)
    }

    /// スレッドの詳細を取得する
    pub fn info_thread(&mut self, num: ThreadNum) -> Result<String> {
        self.cmd("info thread", &num)
    }

    /// スレッドの一覧を取得する
    pub fn info_threads(&mut self) -> Result<BTreeMap<ThreadNum, ThreadRecord>> {
        let txt = self.cmd("info threads", &())?;
        parse_thread_listing(&txt)
    }
}
