use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use sdkui_backend::VersionRecord;

static NODE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(v[0-9]+\.[0-9]+\.[0-9]+|iojs-v[0-9]+\.[0-9]+\.[0-9]+)\b")
        .expect("node version pattern should compile")
});

const IN_USE_MARKER: &str = "->";

fn last_node_version(line: &str) -> Option<&str> {
    NODE_VERSION
        .captures_iter(line)
        .filter_map(|captures| captures.get(1))
        .last()
        .map(|m| m.as_str())
}

/// Parse `nvm ls --no-colors --no-alias`.
///
/// Alias lines such as `default -> 20 (-> v20.11.0)` are skipped even when
/// the installed nvm ignores `--no-alias`, so their arrows never mark a
/// version as in use.
#[must_use]
pub fn parse_node_installed(output: &str) -> Vec<VersionRecord> {
    output
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let active = trimmed.starts_with(IN_USE_MARKER);
            let rest = trimmed.trim_start_matches(IN_USE_MARKER).trim_start();
            if !(rest.starts_with('v') || rest.starts_with("iojs-")) {
                return None;
            }
            last_node_version(rest).map(|id| VersionRecord::new(id, true, active))
        })
        .collect()
}

/// Make the version named by `nvm version default` the only active record.
/// Records are returned unchanged when the alias is unset (`N/A`) or names
/// a version that is not installed.
#[must_use]
pub fn mark_default(mut records: Vec<VersionRecord>, default_output: &str) -> Vec<VersionRecord> {
    let Some(default) = last_node_version(default_output) else {
        return records;
    };
    if !records.iter().any(|record| record.identifier() == default) {
        return records;
    }
    for record in &mut records {
        if record.identifier() == default {
            record.mark_installed(true);
        } else {
            record.deactivate();
        }
    }
    records
}

/// Parse `nvm ls-remote --no-colors` into bare identifiers, first occurrence
/// first.
#[must_use]
pub fn parse_node_remote(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .filter_map(last_node_version)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
