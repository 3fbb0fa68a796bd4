//! バイト単位の入出力

use std::io::{self, Read, Write};

/// コンソールとのバイト単位の入出力
///
/// 読み取りは1バイトずつ行い、ストリーム終端では `None` を返します。
pub trait Transport {
    /// 1バイト読み取る（ストリーム終端なら `None`）
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// バイト列をすべて書き込み、フラッシュする
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// 入出力を閉じて資源を解放する
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 任意の `Read` と `Write` の組によるトランスポート
///
/// 子プロセス以外の経路でコンソールに接続する場合や、
/// メモリ上の応答でテストする場合に使用します。
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    /// 新しいトランスポートを作成する
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// 書き込み側への参照を取得する
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: Read, W: Write> Transport for StreamTransport<R, W> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_one(&mut self.reader)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }
}

/// リーダーから1バイト読み取る
pub(crate) fn read_one<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
