//! Content kinds and their per-kind configuration.
//!
//! Every content type on the platform (questions, articles, quotes, quote
//! authors, quote pieces) shares one row shape and one moderation pipeline.
//! What differs between them is captured here: the backing table, the object
//! type key used for permissions, activities and tag relations, and the
//! kind-specific `attributes` payload.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// The five content verticals.
///
/// Deserializes from the snake_case path segment used in routes
/// (`/answer/api/v1/quote_author/page`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Question,
    Article,
    Quote,
    QuoteAuthor,
    QuotePiece,
}

/// Static configuration row for a [`ContentKind`].
#[derive(Debug)]
pub struct KindConfig {
    /// Backing table name. Only ever interpolated from this table, never
    /// from user input.
    pub table: &'static str,
    /// Object type key: permission prefix, activity prefix and
    /// `tag_rels.object_type`.
    pub object_type: &'static str,
    /// Human-readable entity name used in error messages.
    pub entity: &'static str,
}

const QUESTION: KindConfig = KindConfig {
    table: "questions",
    object_type: "question",
    entity: "Question",
};
const ARTICLE: KindConfig = KindConfig {
    table: "articles",
    object_type: "article",
    entity: "Article",
};
const QUOTE: KindConfig = KindConfig {
    table: "quotes",
    object_type: "quote",
    entity: "Quote",
};
const QUOTE_AUTHOR: KindConfig = KindConfig {
    table: "quote_authors",
    object_type: "quote_author",
    entity: "QuoteAuthor",
};
const QUOTE_PIECE: KindConfig = KindConfig {
    table: "quote_pieces",
    object_type: "quote_piece",
    entity: "QuotePiece",
};

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Question,
        ContentKind::Article,
        ContentKind::Quote,
        ContentKind::QuoteAuthor,
        ContentKind::QuotePiece,
    ];

    pub fn config(self) -> &'static KindConfig {
        match self {
            ContentKind::Question => &QUESTION,
            ContentKind::Article => &ARTICLE,
            ContentKind::Quote => &QUOTE,
            ContentKind::QuoteAuthor => &QUOTE_AUTHOR,
            ContentKind::QuotePiece => &QUOTE_PIECE,
        }
    }

    pub fn table(self) -> &'static str {
        self.config().table
    }

    pub fn object_type(self) -> &'static str {
        self.config().object_type
    }

    pub fn entity(self) -> &'static str {
        self.config().entity
    }

    /// Validate and normalise the kind-specific `attributes` payload.
    ///
    /// `None` and `null` are treated as an empty object. Unknown keys are
    /// rejected so typos surface as field errors instead of silently
    /// disappearing.
    pub fn validate_attributes(
        self,
        raw: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        let raw = match raw {
            None | Some(serde_json::Value::Null) => serde_json::json!({}),
            Some(v) => v.clone(),
        };
        let normalised = match self {
            ContentKind::Question | ContentKind::Article => {
                let empty: EmptyAttributes = parse_attributes(raw)?;
                serde_json::to_value(empty)
            }
            ContentKind::Quote => serde_json::to_value(parse_attributes::<QuoteAttributes>(raw)?),
            ContentKind::QuoteAuthor => {
                let attrs: QuoteAuthorAttributes = parse_attributes(raw)?;
                if let Some(ref avatar) = attrs.avatar {
                    validate_avatar(avatar)?;
                }
                serde_json::to_value(attrs)
            }
            ContentKind::QuotePiece => {
                let attrs: QuotePieceAttributes = parse_attributes(raw)?;
                if let Some(ref avatar) = attrs.avatar {
                    validate_avatar(avatar)?;
                }
                serde_json::to_value(attrs)
            }
        };
        normalised.map_err(|e| CoreError::Internal(format!("attributes encode: {e}")))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_type())
    }
}

impl FromStr for ContentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|k| k.object_type() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown content type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Kind-specific attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmptyAttributes {}

/// A quote optionally points at the author who said it and the piece it
/// comes from.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteAttributes {
    pub quote_author_id: Option<DbId>,
    pub quote_piece_id: Option<DbId>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteAuthorAttributes {
    pub avatar: Option<String>,
}

/// Where a quote piece was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    Book,
    Article,
    Speech,
    Website,
    Other,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotePieceAttributes {
    pub publish_date: Option<NaiveDate>,
    pub piece_type: Option<PieceType>,
    pub avatar: Option<String>,
}

/// Parse the `quote_author_id` / `quote_piece_id` references out of a stored
/// quote attributes value. Malformed payloads yield no references.
pub fn quote_references(attributes: &serde_json::Value) -> QuoteAttributes {
    serde_json::from_value(attributes.clone()).unwrap_or_default()
}

fn parse_attributes<T: for<'de> Deserialize<'de>>(
    raw: serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(raw).map_err(|e| CoreError::field("attributes", e.to_string()))
}

const MAX_AVATAR_LEN: usize = 1024;

fn validate_avatar(avatar: &str) -> Result<(), CoreError> {
    if avatar.len() > MAX_AVATAR_LEN {
        return Err(CoreError::field(
            "attributes",
            format!("avatar must be at most {MAX_AVATAR_LEN} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_round_trips_through_object_type() {
        for kind in ContentKind::ALL {
            let parsed: ContentKind = kind.object_type().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn kind_deserializes_from_path_segment() {
        let kind: ContentKind = serde_json::from_value(json!("quote_author")).unwrap();
        assert_eq!(kind, ContentKind::QuoteAuthor);
        assert!(serde_json::from_value::<ContentKind>(json!("answer")).is_err());
    }

    #[test]
    fn tables_are_distinct() {
        let mut tables: Vec<_> = ContentKind::ALL.iter().map(|k| k.table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), ContentKind::ALL.len());
    }

    #[test]
    fn unknown_kind_is_validation_error() {
        assert!(matches!(
            "poem".parse::<ContentKind>(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn question_rejects_attributes() {
        let err = ContentKind::Question
            .validate_attributes(Some(&json!({"avatar": "x"})))
            .unwrap_err();
        assert!(matches!(err, CoreError::FieldValidation(_)));
    }

    #[test]
    fn missing_attributes_become_empty_object() {
        let v = ContentKind::Article.validate_attributes(None).unwrap();
        assert_eq!(v, json!({}));
    }

    #[test]
    fn quote_piece_attributes_parse() {
        let v = ContentKind::QuotePiece
            .validate_attributes(Some(&json!({
                "publish_date": "1859-11-24",
                "piece_type": "book"
            })))
            .unwrap();
        assert_eq!(v["piece_type"], "book");
        assert_eq!(v["publish_date"], "1859-11-24");
    }

    #[test]
    fn quote_piece_rejects_unknown_piece_type() {
        let err = ContentKind::QuotePiece
            .validate_attributes(Some(&json!({"piece_type": "tweet"})))
            .unwrap_err();
        assert!(matches!(err, CoreError::FieldValidation(_)));
    }

    #[test]
    fn quote_references_tolerate_garbage() {
        let refs = quote_references(&json!({"quote_author_id": 7}));
        assert_eq!(refs.quote_author_id, Some(7));
        assert_eq!(refs.quote_piece_id, None);
        assert_eq!(quote_references(&json!("nope")), QuoteAttributes::default());
    }
}
