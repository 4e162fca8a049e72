//! Test doubles for the updater: the local HTTP fixture server, plus
//! in-memory artifact source and repository capabilities.

use {
    super::{
        fetch::{Artifact, ArtifactSource, FetchError, sha256_hex},
        repo::Repository,
    },
    anyhow::{Result, anyhow},
    std::{cell::RefCell, collections::HashMap, path::Path, rc::Rc},
};

#[path = "../../../tests/common/mod.rs"]
mod fixture;

pub use fixture::{Reply, serve};

/// Artifact source backed by a URL to body map; unknown URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    pub bodies: HashMap<String, Vec<u8>>,
    pub requested: Rc<RefCell<Vec<String>>>,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }
}

impl ArtifactSource for FakeFetcher {
    fn sha256(&self, artifact: &Artifact) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(artifact.url.clone());
        self.bodies
            .get(&artifact.url)
            .map(|body| sha256_hex(body))
            .ok_or(FetchError::Status { status: 404 })
    }
}

/// Repository that records every call instead of running git.
#[derive(Default)]
pub struct FakeRepo {
    pub tags: Option<String>,
    pub calls: Rc<RefCell<Vec<String>>>,
    pub fail_push: bool,
}

impl FakeRepo {
    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Repository for FakeRepo {
    fn remote_tags(&self, remote: &str) -> Result<String> {
        self.record(format!("ls-remote {remote}"));
        self.tags
            .clone()
            .ok_or_else(|| anyhow!("fatal: could not read from remote repository"))
    }

    fn diff(&self, path: &Path) -> Result<()> {
        self.record(format!("diff {}", path.display()));
        Ok(())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.record(format!("add {}", path.display()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {message}"));
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {remote} {branch}"));
        if self.fail_push {
            return Err(anyhow!("git push exited with status 1"));
        }
        Ok(())
    }
}
