use {
    crate::cmd::{
        config::{RunConfig, TapConfig},
        ui::Console,
        update::{
            fetch::{Artifact, ArtifactKind, ArtifactSource},
            formula,
            repo::Repository,
        },
    },
    anyhow::Result,
    std::path::{Path, PathBuf},
};

pub struct UpdateContext {
    pub run: RunConfig,
    pub tap: TapConfig,

    /// Tap root; also the git working directory.
    pub tap_dir: PathBuf,

    /// Formula file, relative to the tap root.
    pub formula_path: PathBuf,

    pub console: Console,
    pub fetcher: Box<dyn ArtifactSource>,
    pub repo: Box<dyn Repository>,
}

impl UpdateContext {
    /// Creates the context, failing early when the formula file is missing.
    pub fn new(
        run: RunConfig,
        tap: TapConfig,
        tap_dir: &Path,
        console: Console,
        fetcher: impl ArtifactSource + 'static,
        repo: impl Repository + 'static,
    ) -> Result<Self> {
        let formula_path = formula::locate(tap_dir, &run.formula)?;
        tracing::debug!(path = %formula_path.display(), "formula located");

        Ok(Self {
            run,
            tap,
            tap_dir: tap_dir.to_path_buf(),
            formula_path,
            console,
            fetcher: Box::new(fetcher),
            repo: Box::new(repo),
        })
    }

    /// Upstream repository URL, without the `.git` suffix.
    pub fn repo_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.tap.github_url, self.tap.owner, self.run.formula
        )
    }

    pub fn formula_file(&self) -> PathBuf {
        self.tap_dir.join(&self.formula_path)
    }

    /// Source tarball and both bottles of the given release, in fetch order.
    pub fn artifacts(&self, version: &str) -> [Artifact; 3] {
        let repo_url = self.repo_url();
        let name = &self.run.formula;
        let macos = &self.tap.macos;
        let bottle = |arch: &str| {
            format!(
                "{repo_url}/releases/download/v{version}/{name}-{version}.{arch}_{macos}.bottle.tar.gz"
            )
        };

        [
            Artifact {
                kind: ArtifactKind::Source,
                url: format!("{repo_url}/archive/refs/tags/v{version}.tar.gz"),
            },
            Artifact {
                kind: ArtifactKind::Arm64Bottle,
                url: bottle("arm64"),
            },
            Artifact {
                kind: ArtifactKind::X86_64Bottle,
                url: bottle("x86_64"),
            },
        ]
    }
}
