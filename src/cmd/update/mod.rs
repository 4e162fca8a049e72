pub mod context;
pub mod fetch;
pub mod formula;
pub mod phases;
pub mod repo;
pub mod version;

#[cfg(test)]
pub mod testing;

use {anyhow::Result, context::UpdateContext, phases::UpdatePhase};

/// Confirmation checkpoints guarding each state-changing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Fetch,
    Write,
    Commit,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every step ran (or, in dry-run, was reported).
    Released,

    /// The user declined at the given checkpoint. Nothing after it ran.
    Stopped(Checkpoint),
}

/// Formula update pipeline. Each phase consumes the updater and hands the
/// next phase its results:
///
/// `ResolveVersion -> FetchArtifacts -> ExtractMetadata -> WriteFormula ->
/// CommitChanges -> PushChanges`.
pub struct Updater<'a, P: UpdatePhase = phases::ResolveVersion> {
    ctx: &'a mut UpdateContext,
    state: P,
}

impl<'a> Updater<'a> {
    pub fn new(ctx: &'a mut UpdateContext) -> Self {
        Self {
            ctx,
            state: phases::ResolveVersion,
        }
    }

    pub fn run(self) -> Result<Outcome> {
        let Some(updater) = self.resolve_version()? else {
            return Ok(Outcome::Stopped(Checkpoint::Fetch));
        };
        let Some(updater) = updater
            .fetch_artifacts()?
            .extract_metadata()?
            .write_formula()?
        else {
            return Ok(Outcome::Stopped(Checkpoint::Write));
        };
        let Some(updater) = updater.commit_changes()? else {
            return Ok(Outcome::Stopped(Checkpoint::Commit));
        };
        updater.push_changes()
    }
}
