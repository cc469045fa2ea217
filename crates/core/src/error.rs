use std::time::Duration;

use thiserror::Error;

/// Failure of a single discovery task, tied to the canonical origin of the
/// location it was scanning. A task failure never stops sibling tasks; the
/// resolver aggregates everything at the end of the sweep.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read mod at {origin}: {source}")]
    ArchiveIo {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("mod archive at {origin} is corrupted, please redownload it: {source}")]
    CorruptArchive {
        origin: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("mod at {origin} has an invalid descriptor: {reason}")]
    InvalidMetadata { origin: String, reason: String },
    #[error("mod at {origin}: {}", identifier_report(.kind, .id, .violations))]
    InvalidIdentifier {
        origin: String,
        kind: IdentifierKind,
        id: String,
        violations: Vec<String>,
    },
    #[error("failed to extract nested jar `{entry}` from {origin}: {reason}")]
    NestedExtraction {
        origin: String,
        entry: String,
        reason: String,
    },
    #[error("discovery task for {origin} panicked: {reason}")]
    TaskPanic { origin: String, reason: String },
}

/// Whether an invalid identifier was the mod's own id or a `provides` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Id,
    Provides,
}

fn identifier_report(kind: &IdentifierKind, id: &str, violations: &[String]) -> String {
    let subject = match kind {
        IdentifierKind::Id => "mod id",
        IdentifierKind::Provides => "provided mod id",
    };
    let mut report = format!("{subject} `{id}` does not match the requirements because");
    if violations.len() == 1 {
        report.push_str(&format!(" it {}", violations[0]));
    } else {
        report.push(':');
        for violation in violations {
            report.push_str(&format!("\n  - It {violation}"));
        }
    }
    report
}

/// Outcome of a whole resolution sweep.
///
/// Per-task failures are aggregated rather than short-circuited: the first
/// observed failure becomes the primary error and every later one is kept as
/// a suppressed cause, so the report is exhaustive instead of depending on
/// thread interleaving. A timeout yields no partial result.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("mod resolution took too long (deadline of {deadline:?} elapsed)")]
    Timeout { deadline: Duration },
    #[error("mod resolution failed: {primary}{}", suppressed_report(.suppressed))]
    Failed {
        primary: DiscoveryError,
        suppressed: Vec<DiscoveryError>,
    },
    #[error("candidate finder failed: {0}")]
    Finder(#[from] quarry_api::FinderError),
}

fn suppressed_report(suppressed: &[DiscoveryError]) -> String {
    let mut report = String::new();
    for error in suppressed {
        report.push_str(&format!("\nsuppressed: {error}"));
    }
    report
}

pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_violation_reads_inline() {
        let err = DiscoveryError::InvalidIdentifier {
            origin: "/mods/a.jar".to_string(),
            kind: IdentifierKind::Id,
            id: "a".to_string(),
            violations: vec!["is too short (the minimum length is 2 characters)".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("because it is too short"), "{text}");
    }

    #[test]
    fn multiple_violations_are_listed_one_per_line() {
        let err = DiscoveryError::InvalidIdentifier {
            origin: "/mods/a.jar".to_string(),
            kind: IdentifierKind::Id,
            id: "My Mod".to_string(),
            violations: vec![
                "contains uppercase characters".to_string(),
                "contains invalid character ' '".to_string(),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("\n  - It contains uppercase characters"), "{text}");
        assert!(text.contains("\n  - It contains invalid character ' '"), "{text}");
    }

    #[test]
    fn aggregated_failure_keeps_every_suppressed_cause() {
        let primary = DiscoveryError::InvalidMetadata {
            origin: "/mods/a.jar".to_string(),
            reason: "missing field `id`".to_string(),
        };
        let suppressed = vec![DiscoveryError::InvalidMetadata {
            origin: "/mods/b.jar".to_string(),
            reason: "expected value".to_string(),
        }];
        let err = ResolveError::Failed { primary, suppressed };
        let text = err.to_string();
        assert!(text.contains("/mods/a.jar"), "{text}");
        assert!(text.contains("suppressed:"), "{text}");
        assert!(text.contains("/mods/b.jar"), "{text}");
    }
}
