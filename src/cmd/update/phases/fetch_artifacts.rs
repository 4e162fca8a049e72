use {
    crate::cmd::{
        ui::Tone,
        update::{
            Updater,
            fetch::{Artifact, ArtifactKind},
            formula::Checksums,
            phases::{ExtractMetadata, UpdatePhase, head},
        },
    },
    anyhow::{Error, Result},
};

/// Hashes the source tarball and both bottles, strictly in that order. The
/// first failure ends the run.
pub struct FetchArtifacts {
    pub version: String,
}

impl UpdatePhase for FetchArtifacts {}

impl<'a> Updater<'a, FetchArtifacts> {
    pub fn fetch_artifacts(mut self) -> Result<Updater<'a, ExtractMetadata>> {
        let [source, arm64, x86_64] = self.ctx.artifacts(&self.state.version);
        let checksums = Checksums {
            source: self.fetch(&source)?,
            arm64: self.fetch(&arm64)?,
            x86_64: self.fetch(&x86_64)?,
        };

        Ok(Updater {
            ctx: self.ctx,
            state: ExtractMetadata {
                version: self.state.version,
                checksums,
            },
        })
    }

    fn fetch(&mut self, artifact: &Artifact) -> Result<String> {
        let label = artifact.label();
        let icon = self.ctx.console.paint(Tone::Cyan, "🍺");
        self.ctx.console.write(format!("{icon} {label:<30} "))?;

        let err = match self.ctx.fetcher.sha256(artifact) {
            Ok(sha) => {
                self.ctx
                    .console
                    .say(Tone::Green, format!("✓ {}...", head(&sha, 16)))?;
                return Ok(sha);
            }
            Err(err) => err,
        };

        tracing::debug!(url = %artifact.url, error = ?err, "fetch failed");
        let actions = format!("   {}/actions", self.ctx.repo_url());
        let console = &mut self.ctx.console;
        console.say(Tone::Red, format!("✗ {err}"))?;
        console.say(Tone::Gray, format!("   {}", artifact.url))?;
        match artifact.kind {
            ArtifactKind::Source => console.say(
                Tone::Red,
                format!(
                    "❌ Failed to fetch source. Does v{} exist?",
                    self.state.version
                ),
            )?,
            ArtifactKind::Arm64Bottle => {
                console.say(Tone::Red, "❌ Bottles not ready. Check GitHub Actions:")?;
                console.say(Tone::Gray, actions)?;
            }
            ArtifactKind::X86_64Bottle => {
                console.say(Tone::Red, "❌ Failed to fetch x86_64 bottle")?
            }
        }

        Err(Error::new(err).context(format!("failed to fetch {label} from {}", artifact.url)))
    }
}
