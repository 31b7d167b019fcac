//! Tag resolution for listing filters and for create/update payloads.

use answer_core::permission::ContentPermission;
use answer_core::text::tag_slug;
use answer_core::types::DbId;
use answer_core::validation::{check_reserved_change, check_reserved_on_create, TagInput};
use answer_db::models::tag::Tag;
use answer_db::repositories::TagRepo;
use sqlx::PgPool;

use crate::error::AppResult;

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Outcome of resolving a `tag` / `tag_id` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// No tag filter was requested.
    Any,
    /// Items must carry one of these tags.
    Tags(Vec<DbId>),
    /// A filter was requested but names no known tag.
    NoMatch,
}

/// Resolve a listing filter to the main tag plus all its synonyms. A slug
/// wins over an id when both are given.
pub async fn resolve_filter(
    pool: &PgPool,
    slug: Option<&str>,
    tag_id: Option<DbId>,
) -> AppResult<TagFilter> {
    let tag = match (slug.map(tag_slug).filter(|s| !s.is_empty()), tag_id) {
        (Some(slug), _) => TagRepo::find_by_slug(pool, &slug).await?,
        (None, Some(id)) => TagRepo::find_by_id(pool, id).await?,
        (None, None) => return Ok(TagFilter::Any),
    };
    let Some(tag) = tag else {
        return Ok(TagFilter::NoMatch);
    };

    let main_id = tag.main_tag_id.unwrap_or(tag.id);
    let mut ids = vec![main_id];
    for id in TagRepo::synonym_ids(pool, main_id).await? {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(TagFilter::Tags(ids))
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// Tags of a create/update request after the reserved-tag checks, before any
/// missing tag is created.
#[derive(Debug)]
pub struct TagPlan {
    slugs: Vec<String>,
    existing: Vec<Tag>,
}

impl TagPlan {
    /// Look up the requested slugs and enforce the reserved-tag rules.
    /// `old` holds the item's current tags on update.
    pub async fn prepare(
        pool: &PgPool,
        permission: &ContentPermission,
        slugs: Vec<String>,
        old: Option<&[Tag]>,
    ) -> AppResult<Self> {
        let existing = TagRepo::find_by_slugs(pool, &slugs).await?;
        if !permission.can_use_reserved_tag {
            match old {
                None => check_reserved_on_create(&existing)?,
                Some(old) => check_reserved_change(old, &existing)?,
            }
        }
        Ok(Self { slugs, existing })
    }

    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }

    /// Create the missing tags and return the full set in request order.
    pub async fn materialise(self, pool: &PgPool, inputs: &[TagInput]) -> AppResult<Vec<Tag>> {
        let mut tags = Vec::with_capacity(self.slugs.len());
        for slug in &self.slugs {
            if let Some(tag) = self.existing.iter().find(|t| &t.slug_name == slug) {
                tags.push(tag.clone());
                continue;
            }
            let display = display_name_for(slug, inputs);
            let tag = TagRepo::get_or_create(pool, slug, &display).await?;
            tracing::debug!(tag_id = tag.id, slug = %slug, "Tag created");
            tags.push(tag);
        }
        Ok(tags)
    }
}

/// Display name supplied for `slug`, falling back to the slug itself.
fn display_name_for(slug: &str, inputs: &[TagInput]) -> String {
    inputs
        .iter()
        .find(|i| tag_slug(&i.slug_name) == slug)
        .and_then(|i| i.display_name.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(slug)
        .to_string()
}
