use {
    crate::cmd::{
        ui::Tone,
        update::{Checkpoint, Outcome, Updater, phases::UpdatePhase},
    },
    anyhow::{Context, Result},
};

/// Last phase: pushes the tap and prints the install hint.
pub struct PushChanges {
    pub version: String,
}

impl UpdatePhase for PushChanges {}

impl<'a> Updater<'a, PushChanges> {
    pub fn push_changes(self) -> Result<Outcome> {
        let ctx = self.ctx;
        let (remote, branch) = (&ctx.tap.remote, &ctx.tap.branch);

        if !ctx.console.confirm(&format!("Push to {remote}?"))? {
            return Ok(Outcome::Stopped(Checkpoint::Push));
        }

        if ctx.run.dry_run {
            ctx.console.say(
                Tone::Yellow,
                format!("🔍 DRY RUN: Would push to {remote}/{branch}"),
            )?;
        } else {
            ctx.repo
                .push(remote, branch)
                .with_context(|| format!("failed to push to {remote}/{branch}"))?;
        }
        ctx.console.blank()?;

        let released = format!("{} v{}", ctx.run.formula, self.state.version);
        if ctx.run.dry_run {
            ctx.console
                .say(Tone::Green, format!("🚀 [DRY RUN] Would release {released}!"))?;
        } else {
            ctx.console.say(Tone::Green, format!("🚀 Released {released}!"))?;
        }
        ctx.console.say(
            Tone::Gray,
            format!("   brew install {}/{}", ctx.tap.name, ctx.run.formula),
        )?;

        Ok(Outcome::Released)
    }
}
