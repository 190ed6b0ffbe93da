use chrono::NaiveDate;
use tracing::{info, warn};

use crate::content::{Area, ContentStore};
use crate::error::{Error, Result};
use crate::model::Document;
use crate::schedule;

/// Payload handed to the cross-post collaborator after a successful
/// promotion.
#[derive(Debug, Clone)]
pub struct CrossPost {
    pub slug: String,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub canonical_url: String,
}

impl CrossPost {
    pub fn from_document(doc: &Document, base_url: &str) -> Self {
        Self {
            slug: doc.slug.clone(),
            title: doc.meta.title.clone(),
            excerpt: doc.meta.excerpt.clone(),
            tags: doc.meta.tags.clone().unwrap_or_default(),
            canonical_url: format!("{}/blog/{}", base_url.trim_end_matches('/'), doc.slug),
        }
    }
}

/// Social cross-posting seam. Failures here never roll back a promotion.
pub trait CrossPoster {
    fn announce(&self, post: &CrossPost) -> Result<()>;
}

/// Stand-in collaborator that just records the announcement in the log.
pub struct LogCrossPoster;

impl CrossPoster for LogCrossPoster {
    fn announce(&self, post: &CrossPost) -> Result<()> {
        info!(slug = %post.slug, url = %post.canonical_url, "cross-post announcement");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Published {
        slug: String,
        /// Other eligible posts in the same week, pushed to later cycles by
        /// the one-per-week ceiling.
        deferred_same_week: usize,
    },
    NothingEligible,
}

/// One scheduling cycle: promote at most one eligible draft, then announce
/// it. Meant to run as a single non-concurrent batch invocation; the external
/// scheduler serializes runs.
pub fn run_scheduling_cycle(
    store: &dyn ContentStore,
    poster: &dyn CrossPoster,
    base_url: &str,
    today: NaiveDate,
) -> Result<CycleOutcome> {
    let eligible = schedule::eligible_drafts(store, today)?;
    let Some((pick, deferred_same_week)) = schedule::next_eligible(&eligible) else {
        info!("no posts scheduled for publication");
        return Ok(CycleOutcome::NothingEligible);
    };

    let slug = pick.slug.clone();
    let published = promote(store, &slug, today)?;

    let cross = CrossPost::from_document(&published, base_url);
    if let Err(e) = poster.announce(&cross) {
        // Non-fatal: the promotion already happened and stays reported as
        // a success.
        warn!(%slug, error = %e, "cross-post failed after promotion");
    }

    Ok(CycleOutcome::Published {
        slug,
        deferred_same_week,
    })
}

/// Moves one draft to the published area. Idempotent on the published side:
/// an existing post with the same slug keeps its body and gets its
/// frontmatter fixed up instead of causing a failure or a duplicate. The
/// draft is deleted either way.
pub fn promote(store: &dyn ContentStore, slug: &str, today: NaiveDate) -> Result<Document> {
    let draft = store
        .read(Area::Drafts, slug)?
        .ok_or_else(|| Error::PromotionDataMissing {
            slug: slug.to_string(),
        })?;

    let published = match store.read(Area::Published, slug)? {
        Some(mut existing) => {
            info!(slug, "post already published, fixing frontmatter");
            let prior_scheduled = existing.meta.scheduled_publish_at.take();
            existing.meta.draft = false;
            existing.meta.published_at = existing
                .meta
                .published_at
                .or(prior_scheduled)
                .or(Some(today));
            existing
        }
        None => {
            let mut doc = draft;
            let scheduled = doc.meta.scheduled_publish_at.take();
            doc.meta.draft = false;
            doc.meta.published_at = scheduled.or(doc.meta.published_at).or(Some(today));
            doc
        }
    };

    store.write(Area::Published, &published)?;
    store.delete(Area::Drafts, slug)?;
    info!(slug, published_at = %published.meta.published_at.unwrap_or(today), "post published");
    Ok(published)
}
