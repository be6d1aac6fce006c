use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ranking::RichList;

pub const DEFAULT_OUTPUT: &str = "data/kss_richlist.json";

/// Pretty JSON (2-space indent) exactly as written to disk.
pub fn to_json_bytes(list: &RichList) -> io::Result<Vec<u8>> {
    serde_json::to_vec_pretty(list).map_err(io::Error::other)
}

/// Write the artifact, creating the parent directory when needed.
///
/// The file is written next to the target and renamed over it, so readers
/// serving `data/` see either the previous list or the new one.
pub fn write_artifact(path: &Path, list: &RichList) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let bytes = to_json_bytes(list)?;
    let tmp = temp_path(path);
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Holder;
    use rust_decimal_macros::dec;

    fn list() -> RichList {
        RichList {
            last_updated: "2024-05-01T12:00:00Z".into(),
            holders: vec![Holder {
                address: "3N".to_string() + &"a".repeat(33),
                balance: dec!(2.5),
            }],
            total_balance: dec!(2.5),
            holder_count: 1,
        }
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("kss_richlist.json");
        write_artifact(&path, &list()).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_json_layout() {
        let text = String::from_utf8(to_json_bytes(&list()).unwrap()).unwrap();
        let expected = format!(
            "{{\n  \"last_updated\": \"2024-05-01T12:00:00Z\",\n  \"holders\": [\n    {{\n      \"address\": \"3N{}\",\n      \"balance\": 2.5\n    }}\n  ],\n  \"total_balance\": 2.5,\n  \"holder_count\": 1\n}}",
            "a".repeat(33)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kss_richlist.json");
        std::fs::write(&path, "stale").unwrap();
        write_artifact(&path, &list()).unwrap();
        let back: RichList = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back.holder_count, 1);
        assert_eq!(back.total_balance, dec!(2.5));
    }

    #[test]
    fn test_balances_are_json_numbers() {
        // 21M KSS in units stays below 2^53, so the float form is exact
        let big = kss_core::units::to_decimal(2_100_000_000_000_000);
        let list = RichList {
            total_balance: big,
            holders: vec![Holder {
                address: "3N".to_string() + &"b".repeat(33),
                balance: big,
            }],
            ..list()
        };
        let value: serde_json::Value =
            serde_json::from_slice(&to_json_bytes(&list).unwrap()).unwrap();
        assert!(value["total_balance"].is_number());
        assert!(value["holders"][0]["balance"].is_number());

        let back: RichList = serde_json::from_value(value).unwrap();
        assert_eq!(back.total_balance, dec!(21000000));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let p = Path::new("data/kss_richlist.json");
        assert_eq!(temp_path(p), Path::new("data/kss_richlist.json.tmp"));
    }
}
