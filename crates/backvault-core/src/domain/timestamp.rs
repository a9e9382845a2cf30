//! KST タイムスタンプ
//!
//! サーバーのロケールに関係なく、すべてのバックアップ時刻は KST（UTC+9）で扱います。
//! ファイル名に使うため `:` と `.` はハイフンに置き換えた形式にします。

use chrono::{DateTime, FixedOffset, Utc};

const KST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("KST offset out of range"),
};

/// Korea Standard Time offset.
pub fn kst() -> FixedOffset {
    KST
}

pub fn to_kst(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.with_timezone(&kst())
}

/// `YYYY-MM-DDTHH-mm-ss` in KST, safe for file names.
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    to_kst(at).format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Human readable KST time for menus and summaries.
pub fn display_timestamp(at: DateTime<Utc>) -> String {
    to_kst(at).format("%Y-%m-%d %H:%M:%S KST").to_string()
}
