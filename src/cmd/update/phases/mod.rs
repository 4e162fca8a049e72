pub mod commit_changes;
pub mod extract_metadata;
pub mod fetch_artifacts;
pub mod push_changes;
pub mod resolve_version;
pub mod write_formula;

/// Represents a phase in the update process.
pub trait UpdatePhase: Sized {}

pub use {
    commit_changes::CommitChanges,
    extract_metadata::ExtractMetadata,
    fetch_artifacts::FetchArtifacts,
    push_changes::PushChanges,
    resolve_version::ResolveVersion,
    write_formula::WriteFormula,
};

/// First `n` characters of a digest, for display.
pub fn head(sha: &str, n: usize) -> &str {
    sha.get(..n).unwrap_or(sha)
}

/// Last `n` characters of a digest, for display.
pub fn tail(sha: &str, n: usize) -> &str {
    sha.get(sha.len().saturating_sub(n)..).unwrap_or(sha)
}
