use {
    crate::cmd::{
        ui::Tone,
        update::{
            Updater,
            phases::{PushChanges, UpdatePhase},
        },
    },
    anyhow::{Context, Result},
};

pub struct CommitChanges {
    pub version: String,
}

impl UpdatePhase for CommitChanges {}

impl<'a> Updater<'a, CommitChanges> {
    pub fn commit_changes(self) -> Result<Option<Updater<'a, PushChanges>>> {
        let ctx = self.ctx;
        let version = self.state.version;

        if !ctx.console.confirm("Commit changes?")? {
            return Ok(None);
        }

        let message = format!("chore: update {} to v{version}", ctx.run.formula);
        if ctx.run.dry_run {
            ctx.console.say(
                Tone::Yellow,
                format!("🔍 DRY RUN: Would commit with message: {message}"),
            )?;
        } else {
            ctx.repo
                .stage(&ctx.formula_path)
                .context("failed to stage formula")?;
            ctx.repo
                .commit(&message)
                .context("failed to commit formula")?;
            ctx.console.say(Tone::Green, "✅ Committed")?;
        }
        ctx.console.blank()?;

        Ok(Some(Updater {
            ctx,
            state: PushChanges { version },
        }))
    }
}
