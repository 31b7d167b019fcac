//! Input validation for content create/update requests and the reserved-tag
//! rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, FieldError};
use crate::text::tag_slug;

/// Maximum length of a tag slug.
pub const MAX_TAG_SLUG_LEN: usize = 35;

/// Maximum number of tags on one item.
pub const MAX_TAGS: usize = 5;

/// A tag reference inside a create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInput {
    pub slug_name: String,
    /// Display name for tags created on the fly. Defaults to the slug.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Title, body and tags shared by every create/update payload.
#[derive(Debug, Clone, Validate)]
pub struct ContentDraft {
    #[validate(length(min = 6, max = 150, message = "title must be between 6 and 150 characters"))]
    pub title: String,
    #[validate(length(min = 6, max = 65535, message = "content must be between 6 and 65535 characters"))]
    pub content: String,
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Vec<TagInput>,
}

/// Validate a draft and return its tags normalised to unique slugs, in
/// request order.
pub fn validate_draft(draft: &ContentDraft) -> Result<Vec<String>, CoreError> {
    let mut fields: Vec<FieldError> = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(e) => match CoreError::from(e) {
            CoreError::FieldValidation(f) => f,
            other => return Err(other),
        },
    };
    if fields.iter().all(|f| f.error_field != "title") && draft.title.trim().is_empty() {
        fields.push(FieldError::new("title", "title must not be blank"));
    }
    if fields.iter().all(|f| f.error_field != "content") && draft.content.trim().is_empty() {
        fields.push(FieldError::new("content", "content must not be blank"));
    }

    let slugs = match normalise_tags(&draft.tags) {
        Ok(slugs) => slugs,
        Err(msg) => {
            if fields.iter().all(|f| f.error_field != "tags") {
                fields.push(FieldError::new("tags", msg));
            }
            Vec::new()
        }
    };

    if fields.is_empty() {
        Ok(slugs)
    } else {
        fields.sort_by(|a, b| a.error_field.cmp(&b.error_field));
        Err(CoreError::FieldValidation(fields))
    }
}

fn normalise_tags(tags: &[TagInput]) -> Result<Vec<String>, String> {
    let mut seen = BTreeSet::new();
    let mut slugs = Vec::with_capacity(tags.len());
    for tag in tags {
        let slug = tag_slug(&tag.slug_name);
        if slug.is_empty() {
            return Err("tag name must not be empty".into());
        }
        if slug.chars().count() > MAX_TAG_SLUG_LEN {
            return Err(format!(
                "tag '{slug}' must be at most {MAX_TAG_SLUG_LEN} characters"
            ));
        }
        if seen.insert(slug.clone()) {
            slugs.push(slug);
        }
    }
    if slugs.len() > MAX_TAGS {
        return Err(format!("at most {MAX_TAGS} tags are allowed"));
    }
    Ok(slugs)
}

// ---------------------------------------------------------------------------
// Reserved tags
// ---------------------------------------------------------------------------

/// Minimal view of a stored tag for reserved-tag checks.
pub trait TagLike {
    fn slug_name(&self) -> &str;
    fn display_name(&self) -> &str;
    fn is_reserved(&self) -> bool;
}

/// Reject new content carrying reserved tags.
pub fn check_reserved_on_create<T: TagLike>(tags: &[T]) -> Result<(), CoreError> {
    let reserved: Vec<&str> = tags
        .iter()
        .filter(|t| t.is_reserved())
        .map(|t| t.display_name())
        .collect();
    if reserved.is_empty() {
        Ok(())
    } else {
        Err(CoreError::field(
            "tags",
            format!("\"{}\" can only be used by moderators.", reserved.join(",")),
        ))
    }
}

/// Without the reserved-tag capability, existing reserved tags must stay and
/// no new reserved tags may be added.
pub fn check_reserved_change<T: TagLike>(old: &[T], new: &[T]) -> Result<(), CoreError> {
    let new_slugs: BTreeSet<&str> = new.iter().map(|t| t.slug_name()).collect();
    let old_slugs: BTreeSet<&str> = old.iter().map(|t| t.slug_name()).collect();

    let removed: Vec<&str> = old
        .iter()
        .filter(|t| t.is_reserved() && !new_slugs.contains(t.slug_name()))
        .map(|t| t.display_name())
        .collect();
    if !removed.is_empty() {
        return Err(CoreError::field(
            "tags",
            format!("The reserved tag \"{}\" must be present.", removed.join(",")),
        ));
    }

    let added: Vec<&str> = new
        .iter()
        .filter(|t| t.is_reserved() && !old_slugs.contains(t.slug_name()))
        .map(|t| t.display_name())
        .collect();
    if !added.is_empty() {
        return Err(CoreError::field(
            "tags",
            format!("\"{}\" can only be used by moderators.", added.join(",")),
        ));
    }
    Ok(())
}

/// An update is a no-op when title, content and the tag set are unchanged.
pub fn is_unchanged(
    old_title: &str,
    old_content: &str,
    old_tags: &[String],
    new_title: &str,
    new_content: &str,
    new_tags: &[String],
) -> bool {
    let old: BTreeSet<&String> = old_tags.iter().collect();
    let new: BTreeSet<&String> = new_tags.iter().collect();
    old_title == new_title && old_content == new_content && old == new
}
