//! Article entity and related types

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::values::{ArticleBody, Description, Slug, Tag, Title};
use crate::domain::pagination::{Limit, Offset};
use crate::domain::profile::Profile;
use crate::domain::user::{UserId, Username};
use crate::domain::validation::{optional, zip, zip3, Validated};

/// Storage identifier of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(i64);

impl ArticleId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// An article as shown to a particular viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedArticle {
    #[serde(skip)]
    pub id: ArticleId,
    pub slug: Slug,
    pub title: Title,
    pub description: Description,
    pub body: ArticleBody,
    pub tag_list: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: u64,
    #[serde(skip)]
    pub author_id: UserId,
    pub author: Profile,
}

impl CreatedArticle {
    pub fn is_written_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// Validated input for a new article
#[derive(Debug, Clone)]
pub struct UncreatedArticle {
    title: Title,
    description: Description,
    body: ArticleBody,
    tag_list: Vec<Tag>,
}

impl UncreatedArticle {
    pub fn new<S: AsRef<str>>(
        title: Option<&str>,
        description: Option<&str>,
        body: Option<&str>,
        tag_list: &[S],
    ) -> Validated<Self> {
        let ((title, description, body), tag_list) = zip(
            zip3(
                Title::new(title),
                Description::new(description),
                ArticleBody::new(body),
            ),
            Tag::list(tag_list),
        )?;

        Ok(Self {
            title,
            description,
            body,
            tag_list,
        })
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn body(&self) -> &ArticleBody {
        &self.body
    }

    pub fn tag_list(&self) -> &[Tag] {
        &self.tag_list
    }
}

/// Partial update of an article; the slug never changes
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdate {
    pub title: Option<Title>,
    pub description: Option<Description>,
    pub body: Option<ArticleBody>,
}

impl ArticleUpdate {
    pub fn new(
        title: Option<&str>,
        description: Option<&str>,
        body: Option<&str>,
    ) -> Validated<Self> {
        let (title, description, body) = zip3(
            optional(title, Title::new),
            optional(description, Description::new),
            optional(body, ArticleBody::new),
        )?;

        Ok(Self {
            title,
            description,
            body,
        })
    }
}

/// Filters for listing articles; all present filters must match
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub tag: Option<Tag>,
    pub author: Option<Username>,
    pub favorited_by: Option<Username>,
    pub limit: Limit,
    pub offset: Offset,
}

/// One page of articles plus the total count before pagination
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<CreatedArticle>,
    pub articles_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Bio, Image};
    use crate::domain::validation::ValidationError;

    pub(crate) fn sample_article() -> CreatedArticle {
        let now = Utc::now();

        CreatedArticle {
            id: ArticleId::new(1),
            slug: Slug::new_without_validation("how-to-train-your-dragon"),
            title: Title::new_without_validation("How to train your dragon"),
            description: Description::new_without_validation("Ever wonder how?"),
            body: ArticleBody::new_without_validation("You have to believe"),
            tag_list: vec![Tag::new_without_validation("dragons")],
            created_at: now,
            updated_at: now,
            favorited: false,
            favorites_count: 0,
            author_id: UserId::new(7),
            author: Profile::new(
                Username::new_without_validation("jake"),
                Bio::new_without_validation(""),
                Image::new_without_validation(""),
                false,
            ),
        }
    }

    #[test]
    fn test_article_serialization_uses_camel_case() {
        let json = serde_json::to_value(sample_article()).unwrap();

        assert_eq!(json["slug"], "how-to-train-your-dragon");
        assert_eq!(json["tagList"], serde_json::json!(["dragons"]));
        assert_eq!(json["favoritesCount"], 0);
        assert_eq!(json["author"]["username"], "jake");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("authorId").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_is_written_by() {
        let article = sample_article();
        assert!(article.is_written_by(UserId::new(7)));
        assert!(!article.is_written_by(UserId::new(8)));
    }

    #[test]
    fn test_uncreated_article_accumulates_errors() {
        let errors =
            UncreatedArticle::new(None, Some("desc"), Some(""), &["ok", ""]).unwrap_err();
        let keys: Vec<_> = errors.iter().map(ValidationError::key).collect();

        assert_eq!(keys, vec!["title", "body", "tag"]);
    }

    #[test]
    fn test_uncreated_article_without_tags() {
        let article =
            UncreatedArticle::new::<&str>(Some("Title"), Some(""), Some("Body"), &[]).unwrap();
        assert!(article.tag_list().is_empty());
    }

    #[test]
    fn test_article_update_only_validates_present_fields() {
        let update = ArticleUpdate::new(None, None, Some("new body")).unwrap();
        assert!(update.title.is_none());
        assert_eq!(update.body.unwrap().as_str(), "new body");

        assert!(ArticleUpdate::new(Some(""), None, None).is_err());
    }
}
