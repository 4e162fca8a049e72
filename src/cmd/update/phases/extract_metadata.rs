use {
    crate::cmd::{
        ui::Tone,
        update::{
            Updater,
            formula::{Checksums, FormulaFile},
            phases::{UpdatePhase, WriteFormula, head, tail},
        },
    },
    anyhow::{Context, Result},
};

/// Inner width of the summary box.
const BOX_WIDTH: usize = 66;

/// Reads the fields carried over from the current formula file and prints a
/// summary of the update.
pub struct ExtractMetadata {
    pub version: String,
    pub checksums: Checksums,
}

impl UpdatePhase for ExtractMetadata {}

impl<'a> Updater<'a, ExtractMetadata> {
    pub fn extract_metadata(self) -> Result<Updater<'a, WriteFormula>> {
        let ctx = self.ctx;
        let ExtractMetadata { version, checksums } = self.state;

        let file = FormulaFile::read(&ctx.formula_file())
            .with_context(|| format!("failed to read {}", ctx.formula_path.display()))?;
        let metadata = file.metadata(&ctx.run.formula, &ctx.formula_path)?;
        tracing::debug!(?metadata, current = ?file.version, "metadata extracted");

        let name = ctx.console.paint(Tone::Bold, &ctx.run.formula);
        let title = match &file.version {
            Some(current) if *current != version => format!("{name} v{current} → v{version}"),
            _ => format!("{name} v{version}"),
        };
        let digest = |sha: &str| format!("{}...{}", head(sha, 16), tail(sha, 16));

        let console = &mut ctx.console;
        console.blank()?;
        console.line(format!("┌{}┐", "─".repeat(BOX_WIDTH + 2)))?;
        console.boxed(&title, BOX_WIDTH)?;
        console.line(format!("├{}┤", "─".repeat(BOX_WIDTH + 2)))?;
        console.boxed(&format!("Source:  {}", digest(&checksums.source)), BOX_WIDTH)?;
        console.boxed(&format!("ARM64:   {}", digest(&checksums.arm64)), BOX_WIDTH)?;
        console.boxed(&format!("x86_64:  {}", digest(&checksums.x86_64)), BOX_WIDTH)?;
        console.line(format!("└{}┘", "─".repeat(BOX_WIDTH + 2)))?;
        console.blank()?;

        Ok(Updater {
            ctx,
            state: WriteFormula {
                version,
                checksums,
                metadata,
            },
        })
    }
}
