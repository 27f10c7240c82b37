//! Stage table: the ordered letter groups a session walks through
//!
//! Handles:
//! - Case-insensitive letter identity
//! - Built-in A–Z partition (five stages, the last one holding six letters)
//! - Loading a replacement table from JSON with validation

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in stages, in presentation order
const ALPHABET_STAGES: [&str; 5] = ["ABCDE", "FGHIJ", "KLMNO", "PQRST", "UVWXYZ"];

/// A single ASCII letter, compared case-insensitively
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(u8);

impl Letter {
    /// Normalize a character into a letter; anything outside a–z / A–Z is rejected
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Letter(c.to_ascii_lowercase() as u8))
        } else {
            None
        }
    }

    /// Display form (capital)
    pub fn upper(self) -> char {
        (self.0 as char).to_ascii_uppercase()
    }

    /// Matching and resource-lookup form
    pub fn lower(self) -> char {
        self.0 as char
    }

    /// Position in the alphabet, 0 for A
    pub fn ordinal(self) -> usize {
        (self.0 - b'a') as usize
    }

    /// Sound asset for this letter, keyed by its lowercase name
    pub fn sound_asset(self) -> String {
        format!("sounds/{}.wav", self.lower())
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.upper())
    }
}

/// Ordered group of letters presented before a celebration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    letters: Vec<Letter>,
}

impl Stage {
    #[cfg(test)]
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn get(&self, index: usize) -> Option<Letter> {
        self.letters.get(index).copied()
    }
}

#[derive(Debug, Error)]
pub enum StageTableError {
    #[error("failed to read stage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid stage file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("stage table has no stages")]
    Empty,
    #[error("stage {stage} has no letters")]
    EmptyStage { stage: usize },
    #[error("stage {stage} entry {value:?} is not a single letter A-Z")]
    NotALetter { stage: usize, value: String },
    #[error("letter {letter} appears in stage {first} and again in stage {second}")]
    Duplicate {
        letter: Letter,
        first: usize,
        second: usize,
    },
}

/// On-disk form: `{"stages": [["A", "B"], "CDE"]}`
#[derive(Debug, Deserialize)]
struct StageFile {
    stages: Vec<StageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StageEntry {
    Letters(Vec<String>),
    Run(String),
}

impl StageEntry {
    fn into_letters(self, stage: usize) -> Result<Vec<Letter>, StageTableError> {
        match self {
            StageEntry::Run(run) => run
                .chars()
                .map(|c| {
                    Letter::from_char(c).ok_or_else(|| StageTableError::NotALetter {
                        stage,
                        value: c.to_string(),
                    })
                })
                .collect(),
            StageEntry::Letters(items) => items
                .into_iter()
                .map(|item| {
                    let mut chars = item.chars();
                    match (chars.next().and_then(Letter::from_char), chars.next()) {
                        (Some(letter), None) => Ok(letter),
                        _ => Err(StageTableError::NotALetter { stage, value: item }),
                    }
                })
                .collect(),
        }
    }
}

/// Immutable, validated list of stages
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageTable {
    stages: Vec<Stage>,
}

impl StageTable {
    /// The built-in A–Z partition
    pub fn alphabet() -> Self {
        let stages = ALPHABET_STAGES
            .iter()
            .map(|run| Stage {
                letters: run.chars().filter_map(Letter::from_char).collect(),
            })
            .collect();
        StageTable { stages }
    }

    /// Build a table, rejecting empty tables, empty stages and repeated letters.
    /// Stage numbers in errors are 1-based.
    pub fn new(stages: Vec<Vec<Letter>>) -> Result<Self, StageTableError> {
        if stages.is_empty() {
            return Err(StageTableError::Empty);
        }

        let mut seen: [Option<usize>; 26] = [None; 26];
        for (idx, letters) in stages.iter().enumerate() {
            let stage = idx + 1;
            if letters.is_empty() {
                return Err(StageTableError::EmptyStage { stage });
            }
            for &letter in letters {
                if let Some(first) = seen[letter.ordinal()] {
                    return Err(StageTableError::Duplicate {
                        letter,
                        first,
                        second: stage,
                    });
                }
                seen[letter.ordinal()] = Some(stage);
            }
        }

        Ok(StageTable {
            stages: stages
                .into_iter()
                .map(|letters| Stage { letters })
                .collect(),
        })
    }

    /// Parse a JSON stage file body
    pub fn from_json_str(content: &str) -> Result<Self, StageTableError> {
        let file: StageFile = serde_json::from_str(content)?;
        let stages = file
            .stages
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| entry.into_letters(idx + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stages)
    }

    /// Load a stage table from a JSON file
    pub fn load(path: &Path) -> Result<Self, StageTableError> {
        let content = fs::read_to_string(path).map_err(|source| StageTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Whether `index` names the last stage
    pub fn is_final(&self, index: usize) -> bool {
        index + 1 == self.stages.len()
    }

    pub fn total_letters(&self) -> usize {
        self.stages.iter().map(Stage::len).sum()
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self::alphabet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn letters(run: &str) -> Vec<Letter> {
        run.chars().filter_map(Letter::from_char).collect()
    }

    #[test]
    fn test_letter_is_case_insensitive() {
        assert_eq!(Letter::from_char('a'), Letter::from_char('A'));
        assert_eq!(Letter::from_char('q').map(Letter::upper), Some('Q'));
        assert_eq!(Letter::from_char('1'), None);
        assert_eq!(Letter::from_char('é'), None);
        assert_eq!(Letter::from_char(' '), None);
    }

    #[test]
    fn test_sound_asset_uses_lowercase() {
        let letter = Letter::from_char('K').unwrap();
        assert_eq!(letter.sound_asset(), "sounds/k.wav");
        assert_eq!(letter.to_string(), "K");
    }

    #[test]
    fn test_alphabet_partitions_a_to_z() {
        let table = StageTable::alphabet();
        assert_eq!(table.len(), 5);
        assert_eq!(table.total_letters(), 26);
        assert_eq!(table.get(4).unwrap().len(), 6);
        assert!(table.is_final(4));
        assert!(!table.is_final(3));

        let flat: String = (0..table.len())
            .flat_map(|i| table.get(i).unwrap().letters().to_vec())
            .map(Letter::upper)
            .collect();
        assert_eq!(flat, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }

    #[test]
    fn test_new_rejects_duplicates_across_stages() {
        let err = StageTable::new(vec![letters("ABC"), letters("CDE")]).unwrap_err();
        match err {
            StageTableError::Duplicate {
                letter,
                first,
                second,
            } => {
                assert_eq!(letter.upper(), 'C');
                assert_eq!((first, second), (1, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_rejects_empty_tables_and_stages() {
        assert!(matches!(
            StageTable::new(vec![]),
            Err(StageTableError::Empty)
        ));
        assert!(matches!(
            StageTable::new(vec![letters("AB"), vec![]]),
            Err(StageTableError::EmptyStage { stage: 2 })
        ));
    }

    #[test]
    fn test_json_accepts_runs_and_lists() {
        let table = StageTable::from_json_str(r#"{"stages": ["abc", ["D", "e"]]}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().letters(), letters("ABC").as_slice());
        assert_eq!(table.get(1).unwrap().letters(), letters("DE").as_slice());
    }

    #[test]
    fn test_json_rejects_non_letters() {
        let err = StageTable::from_json_str(r#"{"stages": [["A", "BC"]]}"#).unwrap_err();
        assert!(matches!(err, StageTableError::NotALetter { stage: 1, .. }));

        let err = StageTable::from_json_str(r#"{"stages": ["AB", "C7"]}"#).unwrap_err();
        assert!(matches!(err, StageTableError::NotALetter { stage: 2, .. }));

        let err = StageTable::from_json_str(r#"{"levels": []}"#).unwrap_err();
        assert!(matches!(err, StageTableError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stages": ["XYZ", "ABC"]}}"#).unwrap();

        let table = StageTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().get(0).map(Letter::upper), Some('X'));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = StageTable::load(&path).unwrap_err();
        assert!(matches!(err, StageTableError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }
}
