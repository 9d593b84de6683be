//! Article value objects

use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;

use crate::domain::validation::{
    rules::{finish, length, required},
    string_value_object, ValidationError, ValidationErrors, Validated,
};

const SLUG_MAX_LENGTH: usize = 128;
const SLUG_BASE_MAX_LENGTH: usize = 100;
const SLUG_SUFFIX_LENGTH: usize = 6;
const TITLE_MAX_LENGTH: usize = 128;
const DESCRIPTION_MAX_LENGTH: usize = 1024;
const ARTICLE_BODY_MAX_LENGTH: usize = 65535;
const TAG_MAX_LENGTH: usize = 32;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is valid"));

string_value_object!(
    /// URL-safe article identifier
    Slug
);

impl Slug {
    pub const KEY: &'static str = "slug";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;

        let mut errors = length(Self::KEY, &value, None, SLUG_MAX_LENGTH);
        if !SLUG_PATTERN.is_match(&value) {
            errors.push(ValidationError::InvalidFormat {
                key: Self::KEY,
                value: value.clone(),
            });
        }

        finish(Self(value), errors)
    }

    /// Derive a fresh slug from a title, with a random suffix to keep it unique
    pub fn generate(title: &Title) -> Self {
        let base = slugify(title.as_str());
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SLUG_SUFFIX_LENGTH)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();

        if base.is_empty() {
            Self(suffix)
        } else {
            Self(format!("{base}-{suffix}"))
        }
    }
}

/// Lowercase ASCII words joined by single dashes; other characters are dropped
fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !slug.is_empty() && !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    if slug.len() > SLUG_BASE_MAX_LENGTH {
        slug.truncate(SLUG_BASE_MAX_LENGTH);
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

string_value_object!(Title);

impl Title {
    pub const KEY: &'static str = "title";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, Some(1), TITLE_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

string_value_object!(Description);

impl Description {
    pub const KEY: &'static str = "description";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, None, DESCRIPTION_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

string_value_object!(
    /// Markdown body of an article
    ArticleBody
);

impl ArticleBody {
    pub const KEY: &'static str = "body";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, Some(1), ARTICLE_BODY_MAX_LENGTH);

        finish(Self(value), errors)
    }
}

string_value_object!(Tag);

impl Tag {
    pub const KEY: &'static str = "tag";

    pub fn new(input: Option<&str>) -> Validated<Self> {
        let value = required(Self::KEY, input)?;
        let errors = length(Self::KEY, &value, Some(1), TAG_MAX_LENGTH);

        finish(Self(value), errors)
    }

    /// Validate a whole tag list; duplicates are dropped, first occurrence wins
    pub fn list<S: AsRef<str>>(inputs: &[S]) -> Validated<Vec<Self>> {
        let mut tags: Vec<Tag> = Vec::with_capacity(inputs.len());
        let mut errors: Option<ValidationErrors> = None;

        for input in inputs {
            match Self::new(Some(input.as_ref())) {
                Ok(tag) if !tags.contains(&tag) => tags.push(tag),
                Ok(_) => {}
                Err(e) => match errors.as_mut() {
                    Some(all) => all.append(e),
                    None => errors = Some(e),
                },
            }
        }

        match errors {
            Some(errors) => Err(errors),
            None => Ok(tags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_valid() {
        assert!(Slug::new(Some("how-to-train-your-dragon")).is_ok());
        assert!(Slug::new(Some("abc123")).is_ok());
    }

    #[test]
    fn test_slug_invalid_format() {
        for bad in ["How-To", "a--b", "-a", "a-", "a b", ""] {
            let errors = Slug::new(Some(bad)).unwrap_err();
            assert!(
                errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_slug_too_long_and_bad_format_accumulate() {
        let raw = format!("{}_", "a".repeat(200));
        let errors = Slug::new(Some(&raw)).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_slug_generate() {
        let title = Title::new(Some("How to train your dragon!")).unwrap();
        let slug = Slug::generate(&title);

        assert!(slug.as_str().starts_with("how-to-train-your-dragon-"));
        assert!(Slug::new(Some(slug.as_str())).is_ok());
    }

    #[test]
    fn test_slug_generate_from_non_ascii_title() {
        let title = Title::new(Some("ドラゴン")).unwrap();
        let slug = Slug::generate(&title);

        assert_eq!(slug.as_str().len(), SLUG_SUFFIX_LENGTH);
        assert!(Slug::new(Some(slug.as_str())).is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Hello,  World  "), "hello-world");
        assert_eq!(slugify("Rust 2024 edition"), "rust-2024-edition");
        assert_eq!(slugify(&"x".repeat(300)).len(), SLUG_BASE_MAX_LENGTH);
    }

    #[test]
    fn test_title_required_and_bounds() {
        assert!(matches!(
            Title::new(None).unwrap_err().first(),
            ValidationError::Required { key: "title" }
        ));
        assert!(matches!(
            Title::new(Some("")).unwrap_err().first(),
            ValidationError::TooShort { .. }
        ));
        assert!(Title::new(Some(&"t".repeat(129))).is_err());
    }

    #[test]
    fn test_description_allows_empty() {
        assert!(Description::new(Some("")).is_ok());
    }

    #[test]
    fn test_tag_list_dedupes_and_accumulates() {
        let tags = Tag::list(&["dragons", "training", "dragons"]).unwrap();
        let names: Vec<_> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(names, vec!["dragons", "training"]);

        let long = "t".repeat(33);
        let errors = Tag::list(&["", "ok", long.as_str()]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.key() == "tag"));
    }
}
