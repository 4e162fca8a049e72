use {
    crate::cmd::{
        ui::Tone,
        update::{
            Updater,
            formula::{Checksums, Formula, Metadata, class_name},
            phases::{CommitChanges, UpdatePhase, head},
        },
    },
    anyhow::{Context, Result},
    std::fs,
};

/// Renders the new formula and, outside dry-run, replaces the file with it.
pub struct WriteFormula {
    pub version: String,
    pub checksums: Checksums,
    pub metadata: Metadata,
}

impl UpdatePhase for WriteFormula {}

impl<'a> Updater<'a, WriteFormula> {
    pub fn write_formula(self) -> Result<Option<Updater<'a, CommitChanges>>> {
        let ctx = self.ctx;
        let WriteFormula {
            version,
            checksums,
            metadata,
        } = self.state;
        let shown = ctx.formula_path.display().to_string();

        if !ctx.console.confirm(&format!("Update {shown}?"))? {
            return Ok(None);
        }

        // Rendered in dry-run too.
        let repo_url = ctx.repo_url();
        let text = Formula {
            name: &ctx.run.formula,
            version: &version,
            repo_url: &repo_url,
            branch: &ctx.tap.branch,
            macos: &ctx.tap.macos,
            build_dependency: &ctx.tap.build_dependency,
            checksums: &checksums,
            metadata: &metadata,
        }
        .render()
        .context("failed to render formula")?;

        if ctx.run.dry_run {
            ctx.console
                .say(Tone::Yellow, format!("🔍 DRY RUN: Would write to {shown}"))?;
            ctx.console.say(Tone::Green, "✅ Formula would be updated!")?;
        } else {
            fs::write(ctx.formula_file(), &text)
                .with_context(|| format!("failed to write {shown}"))?;
            tracing::info!(path = %shown, bytes = text.len(), "formula written");
            ctx.console.say(Tone::Green, "✅ Formula updated!")?;
        }
        ctx.console.blank()?;

        if ctx.run.dry_run {
            let rule = "─".repeat(70);
            let preview = [
                rule.clone(),
                format!("class {} < Formula", class_name(&ctx.run.formula)),
                format!("  desc \"{}\"", metadata.desc),
                format!("  url \"...v{version}.tar.gz\""),
                format!("  sha256 \"{}...\"", head(&checksums.source, 16)),
                format!("  # ... ({} lines would be written)", text.lines().count()),
                rule,
            ];
            ctx.console.say(Tone::Yellow, "🔍 DRY RUN: Preview of formula:")?;
            for line in preview {
                ctx.console.say(Tone::Gray, line)?;
            }
        } else if let Err(e) = ctx.repo.diff(&ctx.formula_path) {
            tracing::warn!(error = %e, "failed to show formula diff");
        }
        ctx.console.blank()?;

        Ok(Some(Updater {
            ctx,
            state: CommitChanges { version },
        }))
    }
}
