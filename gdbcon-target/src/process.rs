//! コンソールプロセス制御機能

use crate::transport::{read_one, Transport};
use crate::{ConsoleConfig, Result};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::signal::{kill, Signal};
use nix::unistd::{pipe2, Pid};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// 子プロセスとして起動したコンソール
///
/// 標準入力はパイプ、標準出力と標準エラー出力は同じパイプの書き込み側に接続されます。
/// これにより2つのストリームの出力順序がそのまま保たれます。
/// ドロップ時には必ずプロセスを終了させて回収します。
pub struct ConsoleProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    output: BufReader<File>,
    exit_status: Option<ExitStatus>,
}

impl ConsoleProcess {
    /// 設定に従ってコンソールを起動する
    pub fn spawn(config: &ConsoleConfig) -> Result<Self> {
        // 標準出力と標準エラー出力で共有するパイプ
        let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC)?;
        let stderr_end = write_end.try_clone()?;

        // Commandは一時値なので、親側の書き込み端はこの文の終わりで閉じられる
        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(write_end))
            .stderr(Stdio::from(stderr_end))
            .spawn()
            .map_err(|e| {
                anyhow::anyhow!("Failed to launch {}: {}", config.program.display(), e)
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to get stdin of the console process"))?;

        info!(
            "Spawned console {} {:?} (pid {})",
            config.program.display(),
            config.args,
            child.id()
        );

        Ok(Self {
            child,
            stdin: Some(stdin),
            output: BufReader::new(File::from(read_end)),
            exit_status: None,
        })
    }

    /// プロセスIDを取得する
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// 終了済みであれば終了ステータスを取得する
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// 標準入力を閉じてプロセスの終了を待つ
    ///
    /// gdbは標準入力の終端を読むと終了します。
    pub fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        self.stdin.take();
        let status = self.child.wait()?;
        debug!("Console process {} exited: {}", self.child.id(), status);
        self.exit_status = Some(status);
        Ok(status)
    }

    /// プロセスを終了させる
    ///
    /// 標準入力を閉じ、まだ動いていればSIGTERMを送ってから回収します。
    pub fn terminate(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        self.stdin.take();

        if self.child.try_wait()?.is_none() {
            let pid = Pid::from_raw(self.child.id() as i32);
            match kill(pid, Signal::SIGTERM) {
                // ESRCHは送信直前に終了していた場合
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let status = self.child.wait()?;
        info!("Terminated console process {}: {}", self.child.id(), status);
        self.exit_status = Some(status);
        Ok(status)
    }
}

impl Transport for ConsoleProcess {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_one(&mut self.output)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "console input is already closed")
        })?;
        stdin.write_all(bytes)?;
        stdin.flush()
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.wait().map(|_| ()).map_err(io::Error::other)
    }
}

impl Drop for ConsoleProcess {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            warn!("Failed to terminate console process {}: {:#}", self.child.id(), e);
        }
    }
}
