//! Restore selector - リストア対象ファイルの決定
//!
//! CLI 引数で明示されたファイル、または 2 段メニュー（Tier → ファイル）で選んだファイルを
//! 値として返します。モジュールレベルの可変状態は持ちません。
//!
//! - 不正な入力（範囲外・数値以外）は即エラー。再入力ループはない
//! - 破壊的操作の前に、リテラル `yes` による確認を必ず求める
//! - `0` や `yes` 以外の回答はキャンセル（エラーではない）

use std::path::{Path, PathBuf};

use super::catalog::{Catalog, TierListing};
use crate::domain::{BackupArtifact, BackupError, display_timestamp};
use crate::ports::{Prompter, Selection};

/// Files older than the newest 20 of a tier are summarized, not selectable.
pub const MAX_LISTED_FILES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Restore(PathBuf),
    Cancelled,
}

/// Decide which dump file to restore, asking the operator where needed.
///
/// `target` describes the database about to be overwritten (`host:port/db`).
pub fn resolve_target_file(
    explicit: Option<&Path>,
    catalog: &Catalog,
    prompter: &dyn Prompter,
    target: &str,
) -> Result<Resolution, BackupError> {
    let chosen = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(BackupError::FileNotFound(path.to_path_buf()));
            }
            path.to_path_buf()
        }
        None => match select_interactively(catalog, prompter)? {
            Some(artifact) => artifact.path,
            None => {
                prompter.say("Restore cancelled.");
                return Ok(Resolution::Cancelled);
            }
        },
    };

    prompter.say("");
    prompter.say("WARNING: this replays the dump against a live database.");
    prompter.say(&format!("  target : {target}"));
    prompter.say(&format!("  file   : {}", chosen.display()));
    prompter.say("Existing objects may be modified or duplicated.");
    if !prompter.ask_yes_no("Type 'yes' to continue: ")? {
        prompter.say("Restore cancelled.");
        return Ok(Resolution::Cancelled);
    }
    Ok(Resolution::Restore(chosen))
}

/// Two-level menu. `Ok(None)` means the operator cancelled.
pub fn select_interactively(
    catalog: &Catalog,
    prompter: &dyn Prompter,
) -> Result<Option<BackupArtifact>, BackupError> {
    let tiers = catalog.non_empty();
    if tiers.is_empty() {
        return Err(BackupError::NoBackups);
    }

    prompter.say("Available backup tiers:");
    for (i, listing) in tiers.iter().enumerate() {
        prompter.say(&tier_line(i + 1, listing));
    }
    prompter.say("  0. Cancel");
    let listing = match prompter.ask_selection("Select a tier: ", tiers.len())? {
        Selection::Cancel => return Ok(None),
        Selection::Index(i) => tiers[i],
    };

    let shown = &listing.artifacts[..listing.artifacts.len().min(MAX_LISTED_FILES)];
    prompter.say("");
    prompter.say(&format!("{} backups (newest first):", listing.tier));
    for (i, artifact) in shown.iter().enumerate() {
        prompter.say(&format!(
            "  {:>2}. {}  {}  {}",
            i + 1,
            artifact.filename,
            display_timestamp(artifact.created_at),
            artifact.display_size()
        ));
    }
    let hidden = listing.artifacts.len() - shown.len();
    if hidden > 0 {
        prompter.say(&format!("  ... and {hidden} older backups not shown"));
    }
    prompter.say("   0. Cancel");

    match prompter.ask_selection("Select a backup file: ", shown.len())? {
        Selection::Cancel => Ok(None),
        Selection::Index(i) => Ok(Some(shown[i].clone())),
    }
}

fn tier_line(number: usize, listing: &TierListing) -> String {
    let latest = listing
        .artifacts
        .first()
        .map(|artifact| display_timestamp(artifact.created_at))
        .unwrap_or_default();
    format!(
        "  {number}. {:<8} {:>3} files  latest {latest}  ({})",
        listing.tier,
        listing.artifacts.len(),
        listing.dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;
    use crate::impls::ScriptedPrompter;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn listing(tier: Tier, count: usize) -> TierListing {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let dir = PathBuf::from("/backup").join(tier.dir_name());
        // newest first
        let artifacts = (0..count)
            .map(|i| {
                let filename = format!("backup-{tier}-{i:02}-KST.sql");
                BackupArtifact {
                    tier,
                    path: dir.join(&filename),
                    filename,
                    created_at: base - TimeDelta::hours(i as i64),
                    size_bytes: 2048,
                }
            })
            .collect();
        TierListing {
            tier,
            dir,
            artifacts,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_listings(vec![
            listing(Tier::Hourly, 0),
            listing(Tier::Daily, 3),
            listing(Tier::Weekly, 25),
        ])
    }

    #[test]
    fn picks_file_from_chosen_tier_after_confirmation() {
        let prompter = ScriptedPrompter::new(["1", "2", "yes"]);
        let resolution = resolve_target_file(None, &catalog(), &prompter, "db:5432/hr").unwrap();
        assert_eq!(
            resolution,
            Resolution::Restore(PathBuf::from("/backup/daily/backup-daily-01-KST.sql"))
        );
        let transcript = prompter.transcript().join("\n");
        assert!(transcript.contains("db:5432/hr"));
        // empty tiers are not offered
        assert!(!transcript.contains("hourly"));
    }

    #[test]
    fn zero_cancels_without_error() {
        let prompter = ScriptedPrompter::new(["0"]);
        let resolution = resolve_target_file(None, &catalog(), &prompter, "db").unwrap();
        assert_eq!(resolution, Resolution::Cancelled);

        let prompter = ScriptedPrompter::new(["2", "0"]);
        let resolution = resolve_target_file(None, &catalog(), &prompter, "db").unwrap();
        assert_eq!(resolution, Resolution::Cancelled);
    }

    #[test]
    fn anything_but_yes_cancels() {
        for answer in ["no", "YES", "y", ""] {
            let prompter = ScriptedPrompter::new(["1", "1", answer]);
            let resolution = resolve_target_file(None, &catalog(), &prompter, "db").unwrap();
            assert_eq!(resolution, Resolution::Cancelled, "answer {answer:?}");
        }
    }

    #[test]
    fn invalid_tier_choice_is_an_error() {
        for answer in ["3", "abc", "-1"] {
            let prompter = ScriptedPrompter::new([answer]);
            let err = resolve_target_file(None, &catalog(), &prompter, "db").unwrap_err();
            assert!(matches!(err, BackupError::InvalidSelection(_)), "answer {answer:?}");
        }
    }

    #[test]
    fn only_twenty_newest_files_are_selectable() {
        let prompter = ScriptedPrompter::new(["2", "21"]);
        let err = resolve_target_file(None, &catalog(), &prompter, "db").unwrap_err();
        assert!(matches!(err, BackupError::InvalidSelection(_)));
        assert!(
            prompter
                .transcript()
                .iter()
                .any(|line| line.contains("5 older backups not shown"))
        );

        let prompter = ScriptedPrompter::new(["2", "20", "yes"]);
        let resolution = resolve_target_file(None, &catalog(), &prompter, "db").unwrap();
        assert_eq!(
            resolution,
            Resolution::Restore(PathBuf::from("/backup/weekly/backup-weekly-19-KST.sql"))
        );
    }

    #[test]
    fn empty_catalog_means_no_backups() {
        let prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = resolve_target_file(None, &Catalog::default(), &prompter, "db").unwrap_err();
        assert!(matches!(err, BackupError::NoBackups));
    }

    #[test]
    fn explicit_file_skips_menu_but_still_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("restore-me.sql");
        std::fs::write(&file, "SELECT 1;").unwrap();

        let prompter = ScriptedPrompter::new(["yes"]);
        let resolution =
            resolve_target_file(Some(&file), &Catalog::default(), &prompter, "db").unwrap();
        assert_eq!(resolution, Resolution::Restore(file));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let prompter = ScriptedPrompter::new(["yes"]);
        let err = resolve_target_file(
            Some(Path::new("/definitely/not/here.sql")),
            &catalog(),
            &prompter,
            "db",
        )
        .unwrap_err();
        assert!(matches!(err, BackupError::FileNotFound(_)));
    }
}
