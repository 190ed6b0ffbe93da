use chrono::{Datelike, Days, NaiveDate};

use crate::content::{Area, ContentStore};
use crate::error::Result;
use crate::model::PostMeta;

/// A draft whose release has been scheduled, as seen by the eligibility scan.
#[derive(Debug, Clone)]
pub struct ScheduledPost {
    pub slug: String,
    pub scheduled: NaiveDate,
    pub meta: PostMeta,
}

/// Monday of the calendar week containing `date`. The publish-rate ceiling
/// counts weeks Monday through Sunday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Drafts marked `draft: true` whose scheduled date has arrived, ordered by
/// scheduled date ascending, ties broken by slug.
pub fn eligible_drafts(store: &dyn ContentStore, today: NaiveDate) -> Result<Vec<ScheduledPost>> {
    let mut eligible = Vec::new();
    for slug in store.list(Area::Drafts)? {
        let Some(doc) = store.read(Area::Drafts, &slug)? else {
            continue;
        };
        if !doc.meta.draft {
            continue;
        }
        let Some(scheduled) = doc.meta.scheduled_publish_at else {
            continue;
        };
        if scheduled <= today {
            eligible.push(ScheduledPost {
                slug: doc.slug,
                scheduled,
                meta: doc.meta,
            });
        }
    }
    eligible.sort_by(|a, b| a.scheduled.cmp(&b.scheduled).then_with(|| a.slug.cmp(&b.slug)));
    Ok(eligible)
}

/// Picks the post to promote this cycle: first item of the earliest week.
/// Also reports how many other eligible posts share that week, since those
/// are the ones the weekly ceiling pushes back.
pub fn next_eligible(eligible: &[ScheduledPost]) -> Option<(&ScheduledPost, usize)> {
    let first = eligible.first()?;
    let week = week_start(first.scheduled);
    let same_week = eligible
        .iter()
        .skip(1)
        .filter(|p| week_start(p.scheduled) == week)
        .count();
    Some((first, same_week))
}

/// Everything the `scheduled` listing shows: the ready queue in publish
/// order, future posts grouped by week, and drafts with no schedule at all.
#[derive(Debug)]
pub struct ScheduleReport {
    pub ready: Vec<ScheduledPost>,
    pub future_weeks: Vec<(NaiveDate, Vec<ScheduledPost>)>,
    pub unscheduled: Vec<String>,
    pub total_drafts: usize,
}

pub fn build_report(store: &dyn ContentStore, today: NaiveDate) -> Result<ScheduleReport> {
    let mut ready = Vec::new();
    let mut future = Vec::new();
    let mut unscheduled = Vec::new();
    let mut total_drafts = 0;

    for slug in store.list(Area::Drafts)? {
        let Some(doc) = store.read(Area::Drafts, &slug)? else {
            continue;
        };
        total_drafts += 1;
        match doc.meta.scheduled_publish_at {
            Some(scheduled) if doc.meta.draft && scheduled <= today => {
                ready.push(ScheduledPost {
                    slug: doc.slug,
                    scheduled,
                    meta: doc.meta,
                });
            }
            Some(scheduled) => {
                future.push(ScheduledPost {
                    slug: doc.slug,
                    scheduled,
                    meta: doc.meta,
                });
            }
            None => unscheduled.push(doc.slug),
        }
    }

    ready.sort_by(|a, b| a.scheduled.cmp(&b.scheduled).then_with(|| a.slug.cmp(&b.slug)));
    future.sort_by(|a, b| a.scheduled.cmp(&b.scheduled).then_with(|| a.slug.cmp(&b.slug)));

    let mut future_weeks: Vec<(NaiveDate, Vec<ScheduledPost>)> = Vec::new();
    for post in future {
        let week = week_start(post.scheduled);
        match future_weeks.last_mut() {
            Some((w, posts)) if *w == week => posts.push(post),
            _ => future_weeks.push((week, vec![post])),
        }
    }

    Ok(ScheduleReport {
        ready,
        future_weeks,
        unscheduled,
        total_drafts,
    })
}
