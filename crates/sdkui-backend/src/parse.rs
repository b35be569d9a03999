use regex::Regex;
use std::sync::LazyLock;

use crate::types::VersionRecord;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ANSI escape pattern should compile")
});

static ANNOTATED_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([>*+\s]*)\s*(\d+\.\d+(\.\d+)?(-beta-\d+)?(_\d+)?(-\w+)?(-\w+)?)")
        .expect("annotated version pattern should compile")
});

const TABULAR_MIN_COLUMNS: usize = 6;
const USE_COLUMN: usize = 1;
const STATUS_COLUMN: usize = 4;
const IDENTIFIER_COLUMN: usize = 5;
const LOCAL_ONLY_STATUS: &str = "local only";

#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Header, separator and legend lines that never describe a version.
#[must_use]
pub fn is_report_chrome(line: &str) -> bool {
    line.contains("====") || line.contains("----") || line.contains("Vendor")
}

/// Parse a `|`-separated report such as `sdk list java`.
#[must_use]
pub fn parse_tabular(text: &str) -> Vec<VersionRecord> {
    text.lines()
        .filter(|line| line.contains('|') && !is_report_chrome(line))
        .filter_map(parse_tabular_row)
        .collect()
}

fn parse_tabular_row(line: &str) -> Option<VersionRecord> {
    let columns: Vec<&str> = line.split('|').collect();
    if columns.len() < TABULAR_MIN_COLUMNS {
        return None;
    }

    let identifier = columns[IDENTIFIER_COLUMN].trim();
    if identifier.is_empty() {
        return None;
    }

    let status = columns[STATUS_COLUMN].trim();
    let active = !columns[USE_COLUMN].trim().is_empty();

    Some(
        VersionRecord::new(identifier, !status.is_empty(), active)
            .with_custom(status == LOCAL_ONLY_STATUS),
    )
}

/// Parse marker-annotated version lines (`> * 3.9.6`, `+ 1.0.0-local`).
///
/// Each line yields at most one record: the identifier of the last match,
/// flagged by every marker seen on that line.
#[must_use]
pub fn parse_annotated(text: &str) -> Vec<VersionRecord> {
    text.lines()
        .filter(|line| !is_report_chrome(line))
        .filter_map(parse_annotated_line)
        .collect()
}

fn parse_annotated_line(line: &str) -> Option<VersionRecord> {
    let mut identifier = None;
    let mut installed = false;
    let mut active = false;
    let mut custom = false;

    for captures in ANNOTATED_VERSION.captures_iter(line) {
        let markers = captures.get(1).map_or("", |m| m.as_str());
        installed |= markers.contains('*');
        active |= markers.contains('>');
        if markers.contains('+') {
            custom = true;
            installed = true;
        }
        identifier = captures.get(2).map(|m| m.as_str());
    }

    identifier.map(|id| VersionRecord::new(id, installed, active).with_custom(custom))
}
