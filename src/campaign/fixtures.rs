//! Fixture catalog: named instance files paired with their known answers.
//!
//! The built-in catalog is the regression table the solvers were originally validated against. A
//! manifest file can replace it:
//!
//! ```text
//! # name   path (relative to the manifest)   expected
//! i01      given/i01                          971
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::HarnessError;

/// A checked-in instance with a known correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub name: String,
    pub path: PathBuf,
    pub expected: String,
}

/// Series of generated fixtures sharing a prefix, numbered by terminal count 5 to 10.
const NUMBERED_SERIES: &[(&str, [&str; 6])] = &[
    ("test_", ["2598", "3048", "2772", "3389", "4035", "4060"]),
    ("testA_", ["2128", "3008", "3033", "3474", "3090", "3773"]),
    ("testB_", ["1960", "2003", "2541", "4212", "4154", "3710"]),
    ("testC_", ["2605", "2988", "3177", "2974", "3259", "4136"]),
];

/// Hand-made instances shipped with the problem statement.
const GIVEN: [&str; 5] = ["971", "1932", "1645", "2235", "3504"];

/// Immutable name → expected-value mapping, built once before a campaign runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureCatalog {
    entries: Vec<Fixture>,
}

impl FixtureCatalog {
    /// The built-in table, with files resolved under `dir`.
    pub fn builtin(dir: &Path) -> Result<Self, HarnessError> {
        if !dir.is_dir() {
            return Err(HarnessError::configuration(format!(
                "fixture directory `{}` does not exist",
                dir.display()
            )));
        }

        let mut entries = Vec::new();
        for (prefix, answers) in NUMBERED_SERIES {
            for (terminals, expected) in (5..).zip(answers) {
                let name = format!("{prefix}{terminals}");
                entries.push(Fixture {
                    path: dir.join(&name),
                    name,
                    expected: (*expected).to_string(),
                });
            }
        }
        for (i, expected) in GIVEN.iter().enumerate() {
            let name = format!("i{:02}", i + 1);
            entries.push(Fixture {
                path: dir.join("given").join(&name),
                name,
                expected: (*expected).to_string(),
            });
        }
        Ok(Self { entries })
    }

    /// Load a manifest file; paths inside it are relative to its directory.
    pub fn from_manifest(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|e| {
            HarnessError::configuration(format!("cannot read manifest `{}`: {e}", path.display()))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse_manifest(&text, base)
    }

    pub fn parse_manifest(text: &str, base: &Path) -> Result<Self, HarnessError> {
        let mut entries: Vec<Fixture> = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [name, rel, expected] = fields[..] else {
                return Err(HarnessError::configuration(format!(
                    "manifest line {}: expected `<name> <path> <expected>`, found {} field(s)",
                    lineno + 1,
                    fields.len()
                )));
            };
            if entries.iter().any(|f| f.name == name) {
                return Err(HarnessError::configuration(format!(
                    "manifest line {}: duplicate fixture name `{name}`",
                    lineno + 1
                )));
            }
            entries.push(Fixture {
                name: name.to_string(),
                path: base.join(rel),
                expected: expected.to_string(),
            });
        }
        Ok(Self { entries })
    }

    /// Keep only fixtures whose name contains `keyword`.
    pub fn filtered(self, keyword: Option<&str>) -> Self {
        match keyword {
            Some(keyword) => Self {
                entries: self.entries.into_iter().filter(|f| f.name.contains(keyword)).collect(),
            },
            None => self,
        }
    }

    pub fn entries(&self) -> &[Fixture] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expected answer for a fixture name.
    pub fn expected(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.expected.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_table() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FixtureCatalog::builtin(dir.path()).unwrap();
        assert_eq!(catalog.len(), 29);
        assert_eq!(catalog.expected("test_5"), Some("2598"));
        assert_eq!(catalog.expected("testA_10"), Some("3773"));
        assert_eq!(catalog.expected("testC_8"), Some("2974"));
        assert_eq!(catalog.expected("i01"), Some("971"));
        assert_eq!(catalog.expected("i05"), Some("3504"));
        assert_eq!(catalog.expected("i06"), None);

        let i03 = catalog.entries().iter().find(|f| f.name == "i03").unwrap();
        assert_eq!(i03.path, dir.path().join("given").join("i03"));
    }

    #[test]
    fn test_builtin_requires_directory() {
        let err = FixtureCatalog::builtin(Path::new("/no/such/fixture/dir")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_manifest_parsing() {
        let text = "# regression set\n\ni01 given/i01 971   # hand made\ntest_5 test_5 2598\n";
        let catalog = FixtureCatalog::parse_manifest(text, Path::new("fx")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].path, Path::new("fx").join("given/i01"));
        assert_eq!(catalog.expected("test_5"), Some("2598"));
    }

    #[test]
    fn test_manifest_wrong_field_count() {
        let err = FixtureCatalog::parse_manifest("i01 given/i01\n", Path::new("")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: manifest line 1: expected `<name> <path> <expected>`, found 2 field(s)"
        );
    }

    #[test]
    fn test_manifest_duplicate_name() {
        let err = FixtureCatalog::parse_manifest("a x 1\na y 2\n", Path::new("")).unwrap_err();
        assert!(err.to_string().contains("duplicate fixture name `a`"));
    }

    #[test]
    fn test_filter_by_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FixtureCatalog::builtin(dir.path()).unwrap().filtered(Some("testB_"));
        assert_eq!(catalog.len(), 6);
        assert!(catalog.entries().iter().all(|f| f.name.starts_with("testB_")));

        let all = FixtureCatalog::builtin(dir.path()).unwrap().filtered(None);
        assert_eq!(all.len(), 29);
    }
}
