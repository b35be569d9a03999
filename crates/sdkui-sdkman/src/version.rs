use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use sdkui_backend::{VersionRecord, parse_annotated, parse_tabular};

static CANDIDATE_INSTALL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$ sdk install (\S+)").expect("candidate pattern should compile")
});

static CELL_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{3,}").expect("cell gap pattern should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingShape {
    /// Vendor table with `Use`/`Status`/`Identifier` columns (`sdk list java`).
    Tabular,
    /// Multi-column grid of marker-annotated versions.
    Annotated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkmanListing {
    pub shape: ListingShape,
    pub records: Vec<VersionRecord>,
}

/// Candidate names from `sdk list`, in output order.
#[must_use]
pub fn parse_candidates(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    CANDIDATE_INSTALL_LINE
        .captures_iter(output)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Put every grid cell of an SDKMAN report on its own line.
#[must_use]
pub fn split_report_cells(output: &str) -> String {
    output
        .lines()
        .flat_map(|line| CELL_GAP.split(line))
        .map(str::trim_end)
        .filter(|cell| !cell.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_tabular(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.contains('|') && line.contains("Identifier"))
}

/// Parse `sdk list <candidate>` output, choosing the parser by its shape.
#[must_use]
pub fn parse_listing(output: &str) -> SdkmanListing {
    if is_tabular(output) {
        SdkmanListing {
            shape: ListingShape::Tabular,
            records: parse_tabular(output),
        }
    } else {
        SdkmanListing {
            shape: ListingShape::Annotated,
            records: parse_annotated(&split_report_cells(output)),
        }
    }
}

/// Pull the script version out of `sdk version` output.
///
/// Newer releases print `script: 5.18.2` and `native: 0.4.6`; older ones a
/// single `SDKMAN 5.9.2+575` line.
#[must_use]
pub fn parse_tool_version(output: &str) -> Option<String> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(script) = lines
        .iter()
        .find_map(|line| line.strip_prefix("script:"))
    {
        return Some(script.trim().to_string());
    }

    lines
        .iter()
        .filter(|line| line.starts_with("SDKMAN"))
        .filter_map(|line| line.split_whitespace().last())
        .find(|token| token.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .or_else(|| lines.first().map(|line| (*line).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &str = "\
================================================================================
Available Candidates
================================================================================
q-quit                                  /-search down
--------------------------------------------------------------------------------
Apache ActiveMQ (Classic) (5.17.1)                  https://activemq.apache.org/

Apache ActiveMQ (Classic) is an open source, multi-protocol, Java-based message
broker.

                                                          $ sdk install activemq
--------------------------------------------------------------------------------
Gradle (8.5)                                                      https://gradle.org

                                                            $ sdk install gradle
--------------------------------------------------------------------------------
Maven (3.9.6)                                        https://maven.apache.org/

                                                             $ sdk install maven
--------------------------------------------------------------------------------
";

    const MAVEN: &str = "\
================================================================================
Available Maven Versions
================================================================================
 > * 3.9.6               3.8.4               3.5.2               3.2.5
     3.9.5               3.8.3               3.5.0               3.2.3
   * 3.9.4               3.8.2               3.3.9
 + 3.9.0-local
================================================================================
+ - local version
* - installed
> - currently in use
================================================================================
";

    const JAVA: &str = "\
================================================================================
Available Java Versions for Linux 64bit
================================================================================
 Vendor        | Use | Version      | Dist    | Status     | Identifier
--------------------------------------------------------------------------------
 Corretto      |     | 21.0.1       | amzn    |            | 21.0.1-amzn
 Temurin       | >>> | 17.0.9       | tem     | installed  | 17.0.9-tem
================================================================================
";

    #[test]
    fn candidates_in_output_order() {
        assert_eq!(parse_candidates(CANDIDATES), vec!["activemq", "gradle", "maven"]);
    }

    #[test]
    fn candidates_are_deduplicated() {
        let output = "$ sdk install maven\n$ sdk install maven\n$ sdk install ant";
        assert_eq!(parse_candidates(output), vec!["maven", "ant"]);
    }

    #[test]
    fn cells_are_split_onto_lines() {
        let split = split_report_cells(" > * 3.9.6               3.8.4\n     3.9.5");
        assert_eq!(split, " > * 3.9.6\n3.8.4\n3.9.5");
    }

    #[test]
    fn annotated_grid_yields_one_record_per_cell() {
        let listing = parse_listing(MAVEN);
        assert_eq!(listing.shape, ListingShape::Annotated);

        let ids: Vec<&str> = listing
            .records
            .iter()
            .map(VersionRecord::identifier)
            .collect();
        assert_eq!(
            ids,
            vec![
                "3.9.6", "3.8.4", "3.5.2", "3.2.5", "3.9.5", "3.8.3", "3.5.0", "3.2.3", "3.9.4",
                "3.8.2", "3.3.9", "3.9.0-local",
            ]
        );

        let active: Vec<&str> = listing
            .records
            .iter()
            .filter(|record| record.active())
            .map(VersionRecord::identifier)
            .collect();
        assert_eq!(active, vec!["3.9.6"]);

        let installed: Vec<&str> = listing
            .records
            .iter()
            .filter(|record| record.installed())
            .map(VersionRecord::identifier)
            .collect();
        assert_eq!(installed, vec!["3.9.6", "3.9.4", "3.9.0-local"]);

        assert!(listing.records[11].custom());
    }

    #[test]
    fn java_listing_is_tabular() {
        let listing = parse_listing(JAVA);
        assert_eq!(listing.shape, ListingShape::Tabular);
        assert_eq!(listing.records.len(), 2);
        assert!(listing.records[1].active());
    }

    #[test]
    fn tool_version_from_script_line() {
        let output = "\nSDKMAN!\nscript: 5.18.2\nnative: 0.4.6\n";
        assert_eq!(parse_tool_version(output).as_deref(), Some("5.18.2"));
    }

    #[test]
    fn tool_version_from_legacy_line() {
        assert_eq!(
            parse_tool_version("\nSDKMAN 5.9.2+575\n").as_deref(),
            Some("5.9.2+575")
        );
    }

    #[test]
    fn tool_version_of_empty_output() {
        assert_eq!(parse_tool_version("\n  \n"), None);
    }
}
