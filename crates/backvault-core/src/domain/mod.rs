//! Domain model (tiers, artifacts, timestamps, restore tallies, ...).
//!
//! - tier: Tier と RetentionPolicy
//! - timestamp: KST タイムスタンプ
//! - artifact: BackupArtifact
//! - outcome: RestoreOutcome
//! - tokenizer / classifier: リストア用の純粋関数
//! - errors: BackupError

pub mod artifact;
pub mod classifier;
pub mod errors;
pub mod outcome;
pub mod tier;
pub mod timestamp;
pub mod tokenizer;

pub use self::artifact::{BackupArtifact, is_backup_file_name};
pub use self::classifier::{ErrorClass, classify, is_ignorable};
pub use self::errors::BackupError;
pub use self::outcome::RestoreOutcome;
pub use self::tier::{ParseTierError, RetentionPolicy, Tier};
pub use self::timestamp::{display_timestamp, file_timestamp, kst, to_kst};
pub use self::tokenizer::tokenize;
