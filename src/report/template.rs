use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Category, classification and message template of one finding kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryTemplate {
    pub category: String,
    pub classification: String,
    pub template: String,
}

impl EntryTemplate {
    pub fn new(
        category: impl Into<String>,
        classification: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            classification: classification.into(),
            template: template.into(),
        }
    }

    /// Substitutes `{name}` placeholders; unknown names are left verbatim.
    pub fn render(&self, args: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| {
                args.iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
            })
            .into_owned()
    }
}
