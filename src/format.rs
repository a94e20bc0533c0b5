//! Parsing of `--limit-output` lines and rendering of package rows.

use crate::error::{Error, Result};
use crate::model::{
    Action, ICON_ERROR, ICON_INSTALL, ICON_PLUGIN, PackageDetails, PackageRecord, ResultEntry,
};

pub const INSTALLED_VERSION_FALLBACK: &str = "unknown";
pub const SEARCH_VERSION_FALLBACK: &str = "latest";
const NO_DETAILS: &str = "No additional information available";

/// Parses `name|version|...`. Extra fields are ignored here.
pub fn parse_record(line: &str, default_version: &str) -> Result<PackageRecord> {
    let mut fields = line.trim().split('|');
    let name = fields.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(Error::Parse(line.to_string()));
    }
    let version = match fields.next().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default_version,
    };

    Ok(PackageRecord {
        name: name.to_string(),
        version: version.to_string(),
    })
}

/// Reads description, downloads and tags (fields 2..=4) from an info lookup.
pub fn parse_details(stdout: &str) -> PackageDetails {
    let Some(line) = stdout.lines().find(|l| !l.trim().is_empty()) else {
        return PackageDetails::default();
    };
    let fields: Vec<&str> = line.split('|').collect();
    let field = |i: usize| fields.get(i).map(|s| s.trim().to_string()).unwrap_or_default();

    PackageDetails {
        description: field(2),
        downloads: field(3),
        tags: field(4),
    }
}

pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn search_subtitle(details: &PackageDetails, description_limit: usize) -> String {
    let mut parts = Vec::new();
    if !details.description.is_empty() {
        parts.push(truncate(&details.description, description_limit));
    }
    if !details.downloads.is_empty() && details.downloads != "0" {
        parts.push(format!("📥 {} downloads", details.downloads));
    }
    if !details.tags.is_empty() {
        parts.push(format!("🏷️ {}", details.tags));
    }

    if parts.is_empty() {
        NO_DETAILS.to_string()
    } else {
        parts.join(" | ")
    }
}

fn title(record: &PackageRecord) -> String {
    format!("{} ({})", record.name, record.version)
}

pub fn installed_entry(record: &PackageRecord) -> ResultEntry {
    ResultEntry::new(title(record), "Press Enter to uninstall", ICON_INSTALL)
        .with_action(Action::new("uninstall_package", &record.name))
}

pub fn search_entry(
    record: &PackageRecord,
    details: &PackageDetails,
    description_limit: usize,
) -> ResultEntry {
    ResultEntry::new(title(record), search_subtitle(details, description_limit), ICON_INSTALL)
        .with_action(Action::new("install_package", &record.name))
}

pub fn nothing_installed() -> ResultEntry {
    ResultEntry::new(
        "No packages installed",
        "Type a package name to search and install",
        ICON_PLUGIN,
    )
}

pub fn nothing_found(query: &str) -> ResultEntry {
    ResultEntry::new(
        "No packages found",
        format!("No results found for '{}'", query),
        ICON_ERROR,
    )
}

pub fn critical_error() -> ResultEntry {
    ResultEntry::new(
        "Critical Error",
        "The plugin encountered a critical error. Check the log file for details.",
        ICON_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_version_falls_back_when_missing() {
        let record = parse_record("git|2.40.0", INSTALLED_VERSION_FALLBACK).unwrap();
        assert_eq!(record.name, "git");
        assert_eq!(record.version, "2.40.0");

        let record = parse_record("git", INSTALLED_VERSION_FALLBACK).unwrap();
        assert_eq!(record.version, "unknown");

        let record = parse_record("foo|", SEARCH_VERSION_FALLBACK).unwrap();
        assert_eq!(record.version, "latest");
    }

    #[test]
    fn record_without_name_is_rejected() {
        assert!(matches!(parse_record("|1.0", "latest"), Err(Error::Parse(_))));
    }

    #[test]
    fn details_read_trailing_fields() {
        let details = parse_details("git|2.40.0|Distributed VCS|123456|vcs git\n");
        assert_eq!(details.description, "Distributed VCS");
        assert_eq!(details.downloads, "123456");
        assert_eq!(details.tags, "vcs git");

        assert_eq!(parse_details("git|2.40.0"), PackageDetails::default());
        assert_eq!(parse_details(""), PackageDetails::default());
    }

    #[test]
    fn long_descriptions_are_ellipsized_by_chars() {
        let text = "é".repeat(61);
        let cut = truncate(&text, 60);
        assert_eq!(cut.chars().count(), 63);
        assert!(cut.ends_with("..."));

        assert_eq!(truncate(&"a".repeat(60), 60), "a".repeat(60));
    }

    #[test]
    fn subtitle_joins_present_pieces() {
        let details = PackageDetails {
            description: "Version control".into(),
            downloads: "42".into(),
            tags: "git".into(),
        };
        assert_eq!(
            search_subtitle(&details, 60),
            "Version control | 📥 42 downloads | 🏷️ git"
        );

        let details = PackageDetails {
            downloads: "0".into(),
            ..Default::default()
        };
        assert_eq!(search_subtitle(&details, 60), "No additional information available");
    }

    #[test]
    fn rows_carry_the_matching_action() {
        let record = PackageRecord {
            name: "node".into(),
            version: "18.0.0".into(),
        };
        let entry = installed_entry(&record);
        assert_eq!(entry.title, "node (18.0.0)");
        assert_eq!(entry.action, Some(Action::new("uninstall_package", "node")));

        let entry = search_entry(&record, &PackageDetails::default(), 60);
        assert_eq!(entry.action, Some(Action::new("install_package", "node")));
    }
}
