pub mod config;
pub mod ui;
pub mod update;

use {
    anyhow::{Context, Result, anyhow},
    argh::FromArgs,
    config::{RunConfig, TapConfig},
    include_dir::{Dir, include_dir},
    regex::{Captures, Regex},
    std::{
        io::{self, BufReader, IsTerminal},
        path::PathBuf,
        sync::LazyLock,
    },
    ui::Console,
    update::{
        Updater,
        context::UpdateContext,
        fetch::HttpFetcher,
        repo::Git,
    },
};

/// Update a tap formula to a new upstream release.
#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help", "help"))]
pub struct MainCmd {
    #[argh(positional)]
    /// formula name, as in `Formula/<name>.rb`
    pub formula: String,

    #[argh(positional)]
    /// version to update to (defaults to the latest `vX.Y.Z` tag)
    pub version: Option<String>,

    #[argh(switch, short = 'd')]
    /// fetch and hash everything, but write, commit and push nothing
    pub dry_run: bool,

    #[argh(switch, short = 'y')]
    /// answer yes to every confirmation
    pub yes: bool,

    #[argh(option, default = "PathBuf::from(\".\")")]
    /// tap root, containing `Formula/` and an optional `tap.toml`
    pub tap_dir: PathBuf,

    #[argh(switch, short = 'v')]
    /// log diagnostics to stderr
    pub verbose: bool,
}

impl MainCmd {
    /// Build the run context from flags and environment, then run the updater.
    pub fn run(&self) -> Result<()> {
        let tap = TapConfig::load(&self.tap_dir).context("failed to load tap configuration")?;

        // Interactivity is decided once, here, and stays fixed for the run.
        let interactive = !self.dry_run && !self.yes && io::stdin().is_terminal();
        let run = RunConfig::new(
            &self.formula,
            self.version.as_deref(),
            self.dry_run,
            interactive,
        )?;

        let console = Console::new(
            io::stdout(),
            BufReader::new(io::stdin()),
            io::stdout().is_terminal(),
            run.interactive,
        );
        let fetcher = HttpFetcher::new(tap.timeout).context("failed to build HTTP client")?;
        let repo = Git::new(&self.tap_dir);

        let mut ctx = UpdateContext::new(run, tap, &self.tap_dir, console, fetcher, repo)?;
        let outcome = Updater::new(&mut ctx).run()?;
        tracing::info!(?outcome, "update finished");

        Ok(())
    }
}

pub static TPL_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/tpl");

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("placeholder pattern is valid"));

/// Renders an embedded template, substituting `{{KEY}}` placeholders in a
/// single pass. Substituted values are never rescanned.
///
/// A placeholder in the template with no matching key is an error.
pub fn render(name: &str, vars: &[(&str, &str)]) -> Result<String> {
    let template = TPL_DIR
        .get_file(name)
        .ok_or_else(|| anyhow!("template not found: {name}"))?
        .contents_utf8()
        .ok_or_else(|| anyhow!("template is not valid UTF-8: {name}"))?;

    let mut unresolved = None;
    let content = PLACEHOLDER_RE.replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => value.to_string(),
            None => {
                unresolved.get_or_insert_with(|| caps[0].to_string());
                String::new()
            }
        }
    });

    if let Some(placeholder) = unresolved {
        return Err(anyhow!(
            "unresolved placeholder {placeholder} in template {name}"
        ));
    }
    Ok(content.into_owned())
}
