use {
    anyhow::{Context, Result, anyhow},
    std::{
        path::{Path, PathBuf},
        process::Command,
    },
};

/// Version control operations the updater needs.
pub trait Repository {
    /// Raw `git ls-remote --tags` output for the given remote URL.
    fn remote_tags(&self, remote: &str) -> Result<String>;

    /// Shows the working tree diff of `path`.
    fn diff(&self, path: &Path) -> Result<()>;

    fn stage(&self, path: &Path) -> Result<()>;
    fn commit(&self, message: &str) -> Result<()>;
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

/// Repository backed by the `git` binary, run inside the tap directory.
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!(root = ?self.root, "git {}", args.join(" "));
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.root);
        cmd
    }

    /// Runs git with inherited stdio, failing on a non-zero exit.
    fn run(&self, args: &[&str]) -> Result<()> {
        let status = self
            .command(args)
            .status()
            .with_context(|| format!("failed to run git {}", args[0]))?;
        if !status.success() {
            return Err(anyhow!("git {} failed with status: {}", args[0], status));
        }
        Ok(())
    }
}

impl Repository for Git {
    fn remote_tags(&self, remote: &str) -> Result<String> {
        let output = self
            .command(&["ls-remote", "--tags", remote])
            .output()
            .context("failed to run git ls-remote")?;
        if !output.status.success() {
            return Err(anyhow!(
                "git ls-remote failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn diff(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["diff", "--", &*path])
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &*path])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch])
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::fs};

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    #[test]
    fn stages_and_commits_in_tap_dir() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let repo = Git::new(dir.path());
        repo.run(&["init", "--quiet"]).unwrap();
        repo.run(&["config", "user.email", "tap@example.com"]).unwrap();
        repo.run(&["config", "user.name", "Tap"]).unwrap();
        repo.run(&["config", "commit.gpgsign", "false"]).unwrap();

        fs::create_dir_all(dir.path().join("Formula")).unwrap();
        fs::write(dir.path().join("Formula/danny.rb"), "class Danny < Formula\nend\n").unwrap();

        let path = Path::new("Formula/danny.rb");
        repo.stage(path).unwrap();
        repo.commit("chore: update danny to v0.0.8").unwrap();

        let log = Command::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&log.stdout).trim(),
            "chore: update danny to v0.0.8"
        );
    }

    #[test]
    fn failing_git_command_is_an_error() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = Git::new(dir.path())
            .remote_tags(&dir.path().join("nope.git").to_string_lossy())
            .unwrap_err();
        assert!(err.to_string().contains("git ls-remote failed"));
    }
}
