//! 複数行の応答をレコードのマップに変換する

use crate::Result;
use std::collections::BTreeMap;

/// 応答の各行を解析し、識別子をキーとするマップを構築する
///
/// 空行は読み飛ばします。同じ識別子が複数回現れた場合は後の行が優先されます。
/// 1行でも文法に一致しなければ全体がエラーになります。
pub(crate) fn collect_records<'a, K, R, I>(
    lines: I,
    parse: impl Fn(&str) -> Result<R>,
    key: impl Fn(&R) -> K,
) -> Result<BTreeMap<K, R>>
where
    K: Ord,
    I: IntoIterator<Item = &'a str>,
{
    let mut records = BTreeMap::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse(line)?;
        records.insert(key(&record), record);
    }
    Ok(records)
}

/// 折り返された継続行を直前の行に連結する
///
/// gdbは長いフレーム行の ` at file:line` を次の行に字下げして出力します。
pub(crate) fn fold_continuations(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let is_continuation = line.starts_with(char::is_whitespace) && !line.trim().is_empty();
        match lines.last_mut() {
            Some(prev) if is_continuation => {
                prev.push(' ');
                prev.push_str(line.trim_start());
            }
            _ => lines.push(line.to_string()),
        }
    }
    lines
}
