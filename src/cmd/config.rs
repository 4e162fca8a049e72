use {
    anyhow::{Result, anyhow},
    std::{fs, path::Path, time::Duration},
    toml::Value,
};

const CONFIG_FILE: &str = "tap.toml";

/// Tap-wide settings, read from `tap.toml` at the tap root.
///
/// Every key is optional and falls back to the defaults of the
/// `foxworth-uni` tap.
#[derive(Debug, Clone, PartialEq)]
pub struct TapConfig {
    /// GitHub owner of the upstream repositories.
    pub owner: String,

    /// Base URL used for tag listing, tarballs and bottles.
    pub github_url: String,

    /// Head branch of upstream repositories, and the branch the tap is pushed
    /// to.
    pub branch: String,

    pub remote: String,

    /// macOS codename used in bottle tags, e.g. `arm64_sonoma`.
    pub macos: String,

    pub build_dependency: String,

    /// Used when no version is given and no `vX.Y.Z` tag can be found.
    pub fallback_version: String,

    /// Tap name as users type it in `brew install <name>/<formula>`.
    pub name: String,

    /// Per-request HTTP timeout, `None` when disabled.
    pub timeout: Option<Duration>,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            owner: "foxworth-uni".to_string(),
            github_url: "https://github.com".to_string(),
            branch: "main".to_string(),
            remote: "origin".to_string(),
            macos: "sonoma".to_string(),
            build_dependency: "rust".to_string(),
            fallback_version: "0.0.1".to_string(),
            name: "foxworth-uni/tap".to_string(),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl TapConfig {
    /// Loads `tap.toml` from the given tap root, if present.
    pub fn load(tap_dir: &Path) -> Result<Self> {
        let path = tap_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(?path, "no tap configuration, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| anyhow!("{e} (in {})", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let value = content.parse::<Value>()?;
        let table = value.get("tap");
        let defaults = Self::default();

        let owner = string(table, "owner")?.unwrap_or(defaults.owner);
        // The tap name follows the owner unless it is set explicitly.
        let name = string(table, "name")?.unwrap_or_else(|| format!("{owner}/tap"));
        let timeout = match table.and_then(|t| t.get("timeout_secs")) {
            None => defaults.timeout,
            Some(Value::Integer(0)) => None,
            Some(Value::Integer(secs)) if *secs > 0 => Some(Duration::from_secs(*secs as u64)),
            Some(other) => {
                return Err(anyhow!(
                    "`tap.timeout_secs` must be a non-negative integer, got {other}"
                ));
            }
        };

        Ok(Self {
            github_url: string(table, "github_url")?
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.github_url),
            branch: string(table, "branch")?.unwrap_or(defaults.branch),
            remote: string(table, "remote")?.unwrap_or(defaults.remote),
            macos: string(table, "macos")?.unwrap_or(defaults.macos),
            build_dependency: string(table, "build_dependency")?
                .unwrap_or(defaults.build_dependency),
            fallback_version: string(table, "fallback_version")?
                .unwrap_or(defaults.fallback_version),
            owner,
            name,
            timeout,
        })
    }
}

fn string(table: Option<&Value>, key: &str) -> Result<Option<String>> {
    match table.and_then(|t| t.get(key)) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(anyhow!("`tap.{key}` must be a string, got {other}")),
    }
}

/// Settings of a single run, fixed once the command line is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub formula: String,

    /// Explicitly requested version, without the leading `v`.
    pub version: Option<String>,

    pub dry_run: bool,
    pub interactive: bool,
}

impl RunConfig {
    pub fn new(
        formula: &str,
        version: Option<&str>,
        dry_run: bool,
        interactive: bool,
    ) -> Result<Self> {
        let formula = formula.trim();
        if formula.is_empty() {
            return Err(anyhow!("formula name must not be empty"));
        }
        let version = version
            .map(|v| v.trim().trim_start_matches('v'))
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(Self {
            formula: formula.to_string(),
            version,
            dry_run,
            interactive,
        })
    }
}
