//! Version extraction and rewriting for `Info.plist` files
//!
//! Only the two bundle keys are touched; everything else in the file is kept
//! byte for byte.

use crate::error::{Error, Result};
use regex::{NoExpand, Regex};

pub const VERSION_KEY: &str = "CFBundleShortVersionString";
pub const BUILD_NUMBER_KEY: &str = "CFBundleVersion";

fn key_regex(path: &str, key: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"<key>{}</key>\s*<string>(\S+?)</string>",
        regex::escape(key)
    ))
    .map_err(|err| Error::malformed(path, format!("invalid pattern for `{key}`: {err}")))
}

/// Value stored under `key`, if the key/value pair is present
pub fn extract_value(path: &str, content: &str, key: &str) -> Result<Option<String>> {
    Ok(key_regex(path, key)?
        .captures(content)
        .map(|captures| captures[1].to_string()))
}

/// `(version, build)` read from a plist
pub fn version_from_plist(path: &str, content: &str) -> Result<(String, String)> {
    let version = extract_value(path, content, VERSION_KEY)?
        .ok_or_else(|| Error::malformed(path, "could not find version number in plist file"))?;
    let build = extract_value(path, content, BUILD_NUMBER_KEY)?
        .ok_or_else(|| Error::malformed(path, "could not find build number in plist file"))?;

    Ok((version, build))
}

/// Fail unless `value` can be stored under `key` and read back unchanged
///
/// Plist string values written here must be non-empty and free of whitespace
/// and XML markup characters.
pub fn check_value(key: &str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '&'));
    if invalid {
        return Err(Error::malformed(
            key,
            format!("`{value}` is not a valid plist string value"),
        ));
    }

    Ok(())
}

/// Rewrite every `key` pair so it holds `value`
pub fn replace_value(path: &str, content: &str, key: &str, value: &str) -> Result<String> {
    let re = key_regex(path, key)?;
    if !re.is_match(content) {
        return Err(Error::malformed(path, format!("could not find `{key}` in plist file")));
    }

    let replacement = format!("<key>{key}</key>\n\t<string>{value}</string>");
    Ok(re.replace_all(content, NoExpand(&replacement)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>CFBundleName</key>
	<string>App</string>
	<key>CFBundleShortVersionString</key>
	<string>1.2</string>
	<key>CFBundleVersion</key>
	<string>3</string>
</dict>
</plist>
"#;

    #[test]
    fn test_reads_version_and_build() {
        assert_eq!(
            version_from_plist("Info.plist", PLIST).unwrap(),
            ("1.2".to_string(), "3".to_string())
        );
    }

    #[test]
    fn test_missing_build_is_malformed() {
        let content = "<key>CFBundleShortVersionString</key><string>1.2</string>";

        let err = version_from_plist("Info.plist", content).unwrap_err();

        assert!(matches!(err, Error::MalformedContent { ref path, .. } if path == "Info.plist"));
    }

    #[test]
    fn test_replace_only_touches_the_key() {
        let updated = replace_value("Info.plist", PLIST, BUILD_NUMBER_KEY, "4").unwrap();

        assert!(updated.contains("<key>CFBundleVersion</key>\n\t<string>4</string>"));
        assert!(updated.contains("<string>1.2</string>"));
        assert!(updated.contains("<string>App</string>"));
        assert_eq!(
            version_from_plist("Info.plist", &updated).unwrap(),
            ("1.2".to_string(), "4".to_string())
        );
    }

    #[test]
    fn test_replacement_value_is_literal() {
        let updated = replace_value("Info.plist", PLIST, VERSION_KEY, "$1.0").unwrap();
        assert_eq!(extract_value("Info.plist", &updated, VERSION_KEY).unwrap().as_deref(), Some("$1.0"));
    }

    #[test]
    fn test_replace_missing_key_is_malformed() {
        assert!(matches!(
            replace_value("Info.plist", "<dict/>", VERSION_KEY, "2.0"),
            Err(Error::MalformedContent { .. })
        ));
    }

    #[rstest]
    #[case("2.0")]
    #[case("rc41")]
    #[case("1.0.0-beta+7")]
    fn test_check_value_accepts_plain_values(#[case] value: &str) {
        assert!(check_value(VERSION_KEY, value).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("2 .0")]
    #[case("2.0\n")]
    #[case("2.0</string>")]
    #[case("a&b")]
    fn test_check_value_rejects_unreadable_values(#[case] value: &str) {
        assert!(matches!(
            check_value(BUILD_NUMBER_KEY, value),
            Err(Error::MalformedContent { ref path, .. }) if path == BUILD_NUMBER_KEY
        ));
    }
}
