use {
    crate::cmd::render,
    anyhow::Result,
    regex::Regex,
    std::{
        fs,
        path::{Path, PathBuf},
        sync::LazyLock,
    },
    thiserror::Error,
    walkdir::WalkDir,
};

const FORMULA_DIR: &str = "Formula";
const TEMPLATE: &str = "formula.rb.tpl";

static DESC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*desc "(.+)"\s*$"#).expect("desc pattern is valid"));
static HOMEPAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*homepage "(.+)"\s*$"#).expect("homepage pattern is valid")
});
static CRATE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"path: "([^"]+)""#).expect("path pattern is valid"));
static URL_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*url ".*/v([^/"]+)\.tar\.gz""#).expect("url pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Formula not found: {0}")]
    NotFound(String),

    #[error("{path} has no `{field}` line; refusing to write an empty {field}")]
    MissingField { path: String, field: &'static str },
}

/// Locates `Formula/<name>.rb` under the tap root, falling back to a
/// recursive search for sharded layouts such as `Formula/d/<name>.rb`.
///
/// Returns the path relative to the tap root.
pub fn locate(tap_dir: &Path, name: &str) -> Result<PathBuf, FormulaError> {
    let file_name = format!("{name}.rb");
    let direct = Path::new(FORMULA_DIR).join(&file_name);
    if tap_dir.join(&direct).is_file() {
        return Ok(direct);
    }

    WalkDir::new(tap_dir.join(FORMULA_DIR))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == file_name.as_str())
        .find_map(|e| e.path().strip_prefix(tap_dir).ok().map(Path::to_path_buf))
        .ok_or_else(|| FormulaError::NotFound(direct.display().to_string()))
}

/// The fields of an existing formula file the updater carries over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaFile {
    pub desc: Option<String>,
    pub homepage: Option<String>,
    pub crate_path: Option<String>,

    /// Version in the current `url` line.
    pub version: Option<String>,
}

impl FormulaFile {
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn parse(content: &str) -> Self {
        let capture = |re: &Regex| {
            re.captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };
        Self {
            desc: capture(&DESC_RE),
            homepage: capture(&HOMEPAGE_RE),
            crate_path: capture(&CRATE_PATH_RE),
            version: capture(&URL_VERSION_RE),
        }
    }

    /// Checks the carried-over fields, defaulting the crate path to
    /// `crates/<name>-cli`.
    pub fn metadata(&self, name: &str, path: &Path) -> Result<Metadata, FormulaError> {
        let missing = |field: &'static str| FormulaError::MissingField {
            path: path.display().to_string(),
            field,
        };
        let desc = self.desc.clone().ok_or_else(|| missing("desc"))?;
        let homepage = self.homepage.clone().ok_or_else(|| missing("homepage"))?;
        let crate_path = self.crate_path.clone().unwrap_or_else(|| {
            let default = format!("crates/{name}-cli");
            tracing::warn!(path = %path.display(), %default, "no crate path in formula, using default");
            default
        });

        Ok(Metadata {
            desc,
            homepage,
            crate_path,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub desc: String,
    pub homepage: String,
    pub crate_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    pub source: String,
    pub arm64: String,
    pub x86_64: String,
}

/// Everything needed to write a formula file from scratch.
#[derive(Debug)]
pub struct Formula<'a> {
    pub name: &'a str,
    pub version: &'a str,

    /// Upstream repository URL, e.g. `https://github.com/foxworth-uni/danny`.
    pub repo_url: &'a str,
    pub branch: &'a str,
    pub macos: &'a str,
    pub build_dependency: &'a str,
    pub checksums: &'a Checksums,
    pub metadata: &'a Metadata,
}

impl Formula<'_> {
    pub fn render(&self) -> Result<String> {
        let class_name = class_name(self.name);
        render(TEMPLATE, &[
            ("CLASS_NAME", class_name.as_str()),
            ("DESC", self.metadata.desc.as_str()),
            ("HOMEPAGE", self.metadata.homepage.as_str()),
            ("REPO_URL", self.repo_url),
            ("VERSION", self.version),
            ("SOURCE_SHA256", self.checksums.source.as_str()),
            ("BRANCH", self.branch),
            ("MACOS", self.macos),
            ("ARM64_SHA256", self.checksums.arm64.as_str()),
            ("X86_64_SHA256", self.checksums.x86_64.as_str()),
            ("BUILD_DEPENDENCY", self.build_dependency),
            ("CRATE_PATH", self.metadata.crate_path.as_str()),
            ("FORMULA", self.name),
        ])
    }
}

/// Ruby class name of a formula: `danny-cli` becomes `DannyCli`.
pub fn class_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}
