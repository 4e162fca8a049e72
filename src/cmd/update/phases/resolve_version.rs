use {
    crate::cmd::{
        ui::Tone,
        update::{
            Updater,
            context::UpdateContext,
            phases::{FetchArtifacts, UpdatePhase},
            version::{Version, latest_tag},
        },
    },
    anyhow::Result,
};

/// Settles the target version, then asks before any network fetch.
pub struct ResolveVersion;

impl UpdatePhase for ResolveVersion {}

impl<'a> Updater<'a, ResolveVersion> {
    pub fn resolve_version(self) -> Result<Option<Updater<'a, FetchArtifacts>>> {
        let ctx = self.ctx;
        let version = match ctx.run.version.clone() {
            Some(version) => {
                if version.parse::<Version>().is_err() {
                    tracing::warn!(%version, "requested version is not MAJOR.MINOR.PATCH");
                }
                version
            }
            None => detect_version(ctx)?,
        };
        tracing::info!(formula = %ctx.run.formula, %version, "version resolved");

        ctx.console.blank()?;
        let title = ctx.console.paint(
            Tone::Magenta,
            format!("Updating {} to v{version}", ctx.run.formula),
        );
        let title = ctx.console.paint(Tone::Bold, title);
        ctx.console.line(title)?;
        if ctx.run.dry_run {
            ctx.console
                .say(Tone::Yellow, "🔍 DRY RUN MODE - No changes will be made")?;
        }
        ctx.console.blank()?;

        if !ctx
            .console
            .confirm(&format!("Fetch SHA256 hashes for v{version}?"))?
        {
            return Ok(None);
        }
        ctx.console.blank()?;

        Ok(Some(Updater {
            ctx,
            state: FetchArtifacts { version },
        }))
    }
}

/// Picks the highest `vX.Y.Z` tag of the upstream repository, or the
/// configured fallback. Interactive runs may override the pick.
fn detect_version(ctx: &mut UpdateContext) -> Result<String> {
    ctx.console.say(
        Tone::Blue,
        format!("📦 Detecting latest version for {}...", ctx.run.formula),
    )?;

    let remote = format!("{}.git", ctx.repo_url());
    let detected = match ctx.repo.remote_tags(&remote) {
        Ok(listing) => latest_tag(&listing),
        Err(e) => {
            tracing::warn!(%remote, error = %e, "failed to list remote tags");
            None
        }
    };
    let version = match detected {
        Some(version) => version.to_string(),
        None => {
            tracing::info!(
                fallback = %ctx.tap.fallback_version,
                "no release tags found, using fallback version"
            );
            ctx.tap.fallback_version.clone()
        }
    };

    let target = ctx.console.paint(Tone::Cyan, "🎯");
    if ctx.console.is_interactive() {
        let answer = ctx.console.ask(&format!("{target} Version"), &version)?;
        return Ok(answer.trim_start_matches('v').to_string());
    }
    ctx.console
        .line(format!("{target} Using detected version: {version}"))?;
    Ok(version)
}
