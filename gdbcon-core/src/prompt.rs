//! プロンプト同期
//!
//! コンソールの出力には長さの情報も区切りもないため、応答の終わりは
//! バッファ末尾にプロンプトが現れたことでしか判定できません。
//! 1バイト読むごとに末尾を検査します。

use gdbcon_target::Transport;
use std::io;
use tracing::{debug, warn};

/// 1コマンド分の応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// プロンプトを除いた出力
    pub output: String,
    /// プロンプトで終端したか（false ならストリーム終端で打ち切られた）
    pub complete: bool,
}

/// プロンプトが現れるまで読み取る
///
/// バッファ末尾がプロンプトと一致した時点で、プロンプトを取り除いた内容を返します。
/// ストリーム終端に達した場合は、それまでに溜まった内容を `complete: false` で返します。
/// 正当な出力の末尾がたまたまプロンプトと同じ文字列だった場合は区別できません。
pub fn read_until_prompt<T: Transport + ?Sized>(
    transport: &mut T,
    prompt: &str,
) -> io::Result<Transaction> {
    let sentinel = prompt.as_bytes();
    let mut buf = Vec::new();

    loop {
        let Some(byte) = transport.read_byte()? else {
            warn!("Console output ended before the prompt ({} bytes)", buf.len());
            return Ok(Transaction {
                output: String::from_utf8_lossy(&buf).into_owned(),
                complete: false,
            });
        };

        buf.push(byte);
        if buf.len() < sentinel.len() {
            continue;
        }

        if buf.ends_with(sentinel) {
            buf.truncate(buf.len() - sentinel.len());
            debug!("Received {} bytes before the prompt", buf.len());
            return Ok(Transaction {
                output: String::from_utf8_lossy(&buf).into_owned(),
                complete: true,
            });
        }
    }
}
