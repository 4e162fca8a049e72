use {
    regex::Regex,
    std::{fmt, str::FromStr, sync::LazyLock},
    tap::Tap,
};

/// Matches release tags in `git ls-remote --tags` output. Peeled refs
/// (`refs/tags/v1.2.3^{}`) do not match.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)refs/tags/v(\d+)\.(\d+)\.(\d+)\s*$").expect("tag pattern is valid")
});

/// A `MAJOR.MINOR.PATCH` release version.
///
/// Field order matters: the derived ordering compares components
/// numerically, major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(|p| p.parse::<u64>().map_err(|e| format!("invalid version {s:?}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [major, minor, patch] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => Err(format!("invalid version {s:?}: expected MAJOR.MINOR.PATCH")),
        }
    }
}

/// Returns the highest `vMAJOR.MINOR.PATCH` tag in `git ls-remote --tags`
/// output.
pub fn latest_tag(ls_remote: &str) -> Option<Version> {
    TAG_RE
        .captures_iter(ls_remote)
        .filter_map(|caps| {
            Some(Version {
                major: caps[1].parse().ok()?,
                minor: caps[2].parse().ok()?,
                patch: caps[3].parse().ok()?,
            })
        })
        .max()
        .tap(|latest| tracing::debug!(?latest, "scanned remote tags"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(tags: &[&str]) -> String {
        tags.iter()
            .map(|t| format!("0123456789abcdef0123456789abcdef01234567\trefs/tags/{t}\n"))
            .collect()
    }

    #[test]
    fn compares_numerically_not_lexicographically() {
        let out = listing(&["v0.0.3", "v0.0.7", "v0.0.10"]);
        assert_eq!(latest_tag(&out), Some("0.0.10".parse().unwrap()));

        let out = listing(&["v1.9.0", "v1.10.0", "v0.99.99"]);
        assert_eq!(latest_tag(&out).unwrap().to_string(), "1.10.0");
    }

    #[test]
    fn ignores_peeled_and_non_release_tags() {
        let out = listing(&[
            "v0.1.0",
            "v0.2.0^{}",
            "v0.3.0-rc.1",
            "nightly",
            "0.9.0",
        ]);
        assert_eq!(latest_tag(&out).unwrap().to_string(), "0.1.0");
    }

    #[test]
    fn empty_listing_has_no_latest() {
        assert_eq!(latest_tag(""), None);
        assert_eq!(latest_tag(&listing(&["latest"])), None);
    }

    #[test]
    fn parses_with_or_without_prefix() {
        let v: Version = "v2.0.1".parse().unwrap();
        assert_eq!(v, Version { major: 2, minor: 0, patch: 1 });
        assert_eq!("2.0.1".parse::<Version>().unwrap(), v);
        assert!("2.0".parse::<Version>().is_err());
        assert!("2.x.1".parse::<Version>().is_err());
    }
}
