//! パース関連のユーティリティ関数

/// アドレス文字列をu64にパース
///
/// 16進数（0xプレフィックス付き）または10進数をサポート。
/// `<main+4>` のような記号的な値は `None` になります。
///
/// # Examples
/// ```
/// use gdbcon_core::parse::parse_address;
///
/// assert_eq!(parse_address("0x950aa9e6"), Some(0x950aa9e6));
/// assert_eq!(parse_address("1234"), Some(1234));
/// assert_eq!(parse_address("<mach_msg_trap+10>"), None);
/// ```
pub fn parse_address(s: &str) -> Option<u64> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse::<u64>().ok()
    }
}

/// 行頭がいずれかの定型句で始まるか判定する
pub(crate) fn starts_with_any(text: &str, phrases: &[&str]) -> bool {
    let text = text.trim_start();
    phrases.iter().any(|phrase| text.starts_with(phrase))
}
