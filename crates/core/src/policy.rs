//! Tag heuristics applied to rendered fragments.

/// Closing tags that make a fragment count as one data input.
pub const DEFAULT_INPUT_TAGS: &[&str] = &["</button>"];

/// Closing tags that switch parameter rendering to generated input fields.
pub const DEFAULT_FORM_TAGS: &[&str] = &["</form>", "</fieldset>"];

/// Which tags mark interactive fragments. Matching is a case-insensitive
/// substring search on the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPolicy {
    input_tags: Vec<String>,
    form_tags: Vec<String>,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_TAGS.iter().copied())
    }
}

impl InputPolicy {
    pub fn new<I, S>(input_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            input_tags: lowercase_all(input_tags),
            form_tags: lowercase_all(DEFAULT_FORM_TAGS.iter().copied()),
        }
    }

    pub fn with_form_tags<I, S>(mut self, form_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.form_tags = lowercase_all(form_tags);
        self
    }

    pub fn input_tags(&self) -> &[String] {
        &self.input_tags
    }

    /// Whether a rendered fragment counts as a data input.
    pub fn counts_as_input(&self, text: &str) -> bool {
        contains_any(text, &self.input_tags)
    }

    /// Whether an expanded template is a form whose parameters become input fields.
    pub fn is_form(&self, text: &str) -> bool {
        contains_any(text, &self.form_tags)
    }
}

fn lowercase_all<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn contains_any(text: &str, tags: &[String]) -> bool {
    if tags.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    tags.iter().any(|tag| text.contains(tag.as_str()))
}
