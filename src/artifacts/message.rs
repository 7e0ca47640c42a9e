//! Commit message templating
//!
//! Templates refer to values with `<name>`. Names the supplied values do not
//! know are left in the message verbatim.

use regex::{Captures, Regex};

const PLACEHOLDER_REGEX: &str = r"<([A-Za-z_][A-Za-z0-9_]*)>";

/// Named values a commit message template can refer to as `<name>`
pub trait Placeholders {
    fn placeholder(&self, name: &str) -> Option<String>;
}

impl Placeholders for () {
    fn placeholder(&self, _name: &str) -> Option<String> {
        None
    }
}

pub fn render(template: &str, values: Option<&dyn Placeholders>) -> String {
    let Some(values) = values else {
        return template.to_string();
    };
    let Ok(re) = Regex::new(PLACEHOLDER_REGEX) else {
        return template.to_string();
    };

    re.replace_all(template, |captures: &Captures| {
        values
            .placeholder(&captures[1])
            .unwrap_or_else(|| captures[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    struct Values(HashMap<&'static str, &'static str>);

    impl Placeholders for Values {
        fn placeholder(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|value| value.to_string())
        }
    }

    #[rstest]
    #[case("Bumps to <version>.", "Bumps to 1.2.")]
    #[case("<version> (<build>)", "1.2 (7)")]
    #[case("keeps <unknown> as is", "keeps <unknown> as is")]
    #[case("a < b > c", "a < b > c")]
    #[case("", "")]
    fn test_render_substitutes_known_names(#[case] template: &str, #[case] expected: &str) {
        let values = Values(HashMap::from([("version", "1.2"), ("build", "7")]));
        assert_eq!(render(template, Some(&values)), expected);
    }

    #[test]
    fn test_render_without_values_keeps_template() {
        assert_eq!(render("Bumps to <version>.", None), "Bumps to <version>.");
        assert_eq!(render("<x>", Some(&())), "<x>");
    }
}
