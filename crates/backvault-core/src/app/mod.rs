//! App - アプリケーション層
//!
//! ports を組み合わせてバックアップ / リストアの流れを実装します。
//!
//! # 書き込み経路（無人）
//! RotationScheduler → DumpExecutor → retention::prune
//!
//! # 読み取り・修復経路（運用者が起動）
//! selector → tokenizer → restore → classifier

pub mod catalog;
pub mod dump;
pub mod layout;
pub mod restore;
pub mod retention;
pub mod rotation;
pub mod scheduler;
pub mod selector;
pub mod service;
pub mod status;

pub use self::catalog::{Catalog, TierListing, list_artifacts};
pub use self::dump::DumpExecutor;
pub use self::layout::BackupLayout;
pub use self::restore::{read_dump, restore};
pub use self::retention::{PruneSummary, prune};
pub use self::rotation::{CycleReport, RotationJob, RotationScheduler};
pub use self::scheduler::{Cadence, Scheduler};
pub use self::selector::{Resolution, resolve_target_file};
pub use self::service::BackupService;
pub use self::status::TierCounts;
