use crate::artifacts::message::{self, Placeholders};
use crate::artifacts::version::plist;
use crate::error::{Error, Result};
use derive_new::new;
use regex::Regex;

const TRAILING_DIGITS_REGEX: &str = r"[0-9]+$";

/// Build identifier, e.g. `41` or `rc41`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Build(String);

impl Build {
    pub fn new(value: impl Into<String>) -> Self {
        Build(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Increment the trailing numeric run, keeping any non-numeric prefix
    pub fn bump(&self) -> Result<Build> {
        if let Ok(number) = self.0.parse::<u64>() {
            return Ok(Build(increment(number, &self.0)?.to_string()));
        }

        let re = Regex::new(TRAILING_DIGITS_REGEX)
            .map_err(|_| Error::NonNumericBuild(self.0.clone()))?;
        let digits = re
            .find(&self.0)
            .ok_or_else(|| Error::NonNumericBuild(self.0.clone()))?;
        let number = digits
            .as_str()
            .parse::<u64>()
            .map_err(|_| Error::NonNumericBuild(self.0.clone()))?;
        let prefix = &self.0[..digits.start()];

        Ok(Build(format!("{prefix}{}", increment(number, &self.0)?)))
    }
}

fn increment(number: u64, raw: &str) -> Result<u64> {
    number
        .checked_add(1)
        .ok_or_else(|| Error::NonNumericBuild(raw.to_string()))
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketing version plus build identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct Version {
    version: String,
    build: Build,
}

impl Version {
    pub fn from_plist_content(path: &str, content: &str) -> Result<Self> {
        let (version, build) = plist::version_from_plist(path, content)?;
        Ok(Version::new(version, Build::new(build)))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn build(&self) -> &Build {
        &self.build
    }

    /// Bumps the build only
    pub fn bump(&self) -> Result<Version> {
        Ok(Version::new(self.version.clone(), self.build.bump()?))
    }

    /// `1.2 (3)`
    pub fn full_version(&self) -> String {
        format!("{} ({})", self.version, self.build)
    }

    /// Render `template` against this version; the full version when there is none
    pub fn commit_message(&self, template: Option<&str>) -> String {
        match template {
            Some(template) => message::render(template, Some(self)),
            None => self.full_version(),
        }
    }
}

/// `<version>`, `<buildNumber>` and `<fullVersion>`
impl Placeholders for Version {
    fn placeholder(&self, name: &str) -> Option<String> {
        match name {
            "version" => Some(self.version.clone()),
            "buildNumber" => Some(self.build.to_string()),
            "fullVersion" => Some(self.full_version()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("41", "42")]
    #[case("9", "10")]
    #[case("rc41", "rc42")]
    #[case("rc3", "rc4")]
    #[case("1.2.9", "1.2.10")]
    #[case("build-099", "build-100")]
    fn test_bump_increments_trailing_number(#[case] build: &str, #[case] expected: &str) {
        assert_eq!(Build::new(build).bump().unwrap().value(), expected);
    }

    #[rstest]
    #[case("latest")]
    #[case("")]
    #[case("41a")]
    fn test_bump_rejects_non_numeric_build(#[case] build: &str) {
        assert!(matches!(
            Build::new(build).bump(),
            Err(Error::NonNumericBuild(value)) if value == build
        ));
    }

    #[test]
    fn test_bump_keeps_version_string() {
        let version = Version::new("1.2".to_string(), Build::new("3"));

        let bumped = version.bump().unwrap();

        assert_eq!(bumped.version(), "1.2");
        assert_eq!(bumped.full_version(), "1.2 (4)");
    }

    #[rstest]
    #[case(None, "3.2.0 (123)")]
    #[case(Some("Version <fullVersion>"), "Version 3.2.0 (123)")]
    #[case(
        Some("[General] Bumps version to <version> (<buildNumber>)."),
        "[General] Bumps version to 3.2.0 (123)."
    )]
    #[case(Some("<version> <ticket>"), "3.2.0 <ticket>")]
    fn test_commit_message_template(#[case] template: Option<&str>, #[case] expected: &str) {
        let version = Version::new("3.2.0".to_string(), Build::new("123"));
        assert_eq!(version.commit_message(template), expected);
    }

    proptest! {
        #[test]
        fn test_bump_preserves_prefix(prefix in "[a-z.-]{0,6}", number in 0u64..1_000_000) {
            let bumped = Build::new(format!("{prefix}{number}")).bump().unwrap();
            prop_assert_eq!(bumped.value(), format!("{prefix}{}", number + 1));
        }
    }
}
