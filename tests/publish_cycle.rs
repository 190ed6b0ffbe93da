use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;

use quillpress::content::{visible_posts, Area, ContentStore, Environment, FsContentStore};
use quillpress::publish::{promote, run_scheduling_cycle, CrossPost, CrossPoster, CycleOutcome};
use quillpress::schedule::{build_report, week_start};
use quillpress::Error;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn draft(root: &Path, slug: &str, ext: &str, scheduled: &str) {
    write_file(
        root,
        &format!("blog/drafts/{slug}.{ext}"),
        &format!(
            "---\ntitle: \"Post {slug}\"\ndraft: true\nscheduledPublishAt: \"{scheduled}\"\ntags:\n- rust\n---\n\nBody of {slug}.\n"
        ),
    );
}

struct RecordingPoster(std::cell::RefCell<Vec<String>>);

impl CrossPoster for RecordingPoster {
    fn announce(&self, post: &CrossPost) -> quillpress::Result<()> {
        self.0.borrow_mut().push(post.canonical_url.clone());
        Ok(())
    }
}

struct FailingPoster;

impl CrossPoster for FailingPoster {
    fn announce(&self, _post: &CrossPost) -> quillpress::Result<()> {
        Err(Error::Notification("linkedin is down".to_string()))
    }
}

#[test]
fn week_starts_on_monday() {
    assert_eq!(week_start(date("2026-03-05")), date("2026-03-02")); // Thursday
    assert_eq!(week_start(date("2026-03-02")), date("2026-03-02")); // Monday
    assert_eq!(week_start(date("2026-03-08")), date("2026-03-02")); // Sunday
    assert_eq!(week_start(date("2026-03-09")), date("2026-03-09")); // next Monday
}

#[test]
fn promotes_earliest_week_lexicographic_first() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    // Two drafts in the same week, one the week after; all overdue.
    draft(root, "b-post", "mdx", "2026-03-05");
    draft(root, "a-post", "mdx", "2026-03-05");
    draft(root, "c-post", "mdx", "2026-03-11");

    let store = FsContentStore::new(root);
    let poster = RecordingPoster(Default::default());
    let today = date("2026-03-20");

    let outcome = run_scheduling_cycle(&store, &poster, "https://blog.example.com/", today).unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Published {
            slug: "a-post".to_string(),
            deferred_same_week: 1,
        }
    );

    // Exactly one promotion per cycle.
    assert!(root.join("blog/a-post.mdx").is_file());
    assert!(!root.join("blog/drafts/a-post.mdx").exists());
    assert!(root.join("blog/drafts/b-post.mdx").is_file());
    assert!(root.join("blog/drafts/c-post.mdx").is_file());

    let published = store.read(Area::Published, "a-post").unwrap().unwrap();
    assert!(!published.meta.draft);
    assert_eq!(published.meta.published_at, Some(date("2026-03-05")));
    assert_eq!(published.meta.scheduled_publish_at, None);
    assert_eq!(published.body.trim(), "Body of a-post.");

    assert_eq!(
        poster.0.borrow().as_slice(),
        ["https://blog.example.com/blog/a-post"]
    );
}

#[test]
fn cycles_drain_the_queue_one_post_at_a_time() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    draft(root, "b-post", "mdx", "2026-03-05");
    draft(root, "a-post", "mdx", "2026-03-05");
    // Still in the future on the cycle date.
    draft(root, "c-post", "mdx", "2026-04-01");

    let store = FsContentStore::new(root);
    let poster = RecordingPoster(Default::default());
    let today = date("2026-03-06");

    let first = run_scheduling_cycle(&store, &poster, "https://x.test", today).unwrap();
    let second = run_scheduling_cycle(&store, &poster, "https://x.test", today).unwrap();
    let third = run_scheduling_cycle(&store, &poster, "https://x.test", today).unwrap();

    assert!(matches!(first, CycleOutcome::Published { ref slug, .. } if slug == "a-post"));
    assert!(matches!(second, CycleOutcome::Published { ref slug, .. } if slug == "b-post"));
    assert_eq!(third, CycleOutcome::NothingEligible);
    assert!(root.join("blog/drafts/c-post.mdx").is_file());
}

#[test]
fn republish_updates_existing_post_instead_of_failing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    draft(root, "a-post", "mdx", "2026-03-05");
    // Already present in the published area, with its own body and a stray
    // schedule left in its frontmatter.
    write_file(
        root,
        "blog/a-post.mdx",
        "---\ntitle: \"Post a-post\"\ndraft: true\npublishedAt: \"2026-02-01\"\nscheduledPublishAt: \"2026-03-05\"\n---\n\nAlready-published body.\n",
    );

    let store = FsContentStore::new(root);
    let published = promote(&store, "a-post", date("2026-03-20")).unwrap();

    // Frontmatter fixed, existing body and publishedAt kept, draft gone.
    assert!(!published.meta.draft);
    assert_eq!(published.meta.published_at, Some(date("2026-02-01")));
    assert_eq!(published.meta.scheduled_publish_at, None);
    assert_eq!(published.body.trim(), "Already-published body.");
    assert!(!root.join("blog/drafts/a-post.mdx").exists());

    let raw = fs::read_to_string(root.join("blog/a-post.mdx")).unwrap();
    assert!(!raw.contains("scheduledPublishAt"));
    assert!(raw.contains("draft: false"));
}

#[test]
fn missing_draft_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let store = FsContentStore::new(dir.path());
    match promote(&store, "ghost", date("2026-03-20")) {
        Err(Error::PromotionDataMissing { slug }) => assert_eq!(slug, "ghost"),
        other => panic!("expected PromotionDataMissing, got {other:?}"),
    }
}

#[test]
fn notification_failure_does_not_fail_the_cycle() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    draft(root, "a-post", "mdx", "2026-03-05");

    let store = FsContentStore::new(root);
    let outcome =
        run_scheduling_cycle(&store, &FailingPoster, "https://x.test", date("2026-03-20")).unwrap();
    assert!(matches!(outcome, CycleOutcome::Published { ref slug, .. } if slug == "a-post"));
    assert!(root.join("blog/a-post.mdx").is_file());
}

#[test]
fn md_extension_and_extra_frontmatter_survive_promotion() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(
        root,
        "blog/drafts/old-post.md",
        "---\ntitle: \"Old Post\"\ndraft: true\nscheduledPublishAt: \"2026-03-05\"\nseries: borrow-checker\nreadingTime: 7\n---\n\nLegacy markdown body.\n",
    );

    let store = FsContentStore::new(root);
    promote(&store, "old-post", date("2026-03-20")).unwrap();

    assert!(root.join("blog/old-post.md").is_file());
    assert!(!root.join("blog/old-post.mdx").exists());
    let raw = fs::read_to_string(root.join("blog/old-post.md")).unwrap();
    assert!(raw.contains("series: borrow-checker"));
    assert!(raw.contains("readingTime: 7"));
    assert!(raw.contains("Legacy markdown body."));
}

#[test]
fn draft_without_schedule_or_flag_is_never_eligible() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(
        root,
        "blog/drafts/unscheduled.mdx",
        "---\ntitle: \"Unscheduled\"\ndraft: true\n---\n\nNo date yet.\n",
    );
    write_file(
        root,
        "blog/drafts/not-draft.mdx",
        "---\ntitle: \"Not a draft\"\ndraft: false\nscheduledPublishAt: \"2026-03-05\"\n---\n\nFlag unset.\n",
    );
    write_file(root, "blog/drafts/.template.mdx", "---\ndraft: true\n---\n");

    let store = FsContentStore::new(root);
    let outcome = run_scheduling_cycle(
        &store,
        &RecordingPoster(Default::default()),
        "https://x.test",
        date("2026-03-20"),
    )
    .unwrap();
    assert_eq!(outcome, CycleOutcome::NothingEligible);
}

#[test]
fn schedule_report_buckets_drafts() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    draft(root, "ready-post", "mdx", "2026-03-01");
    draft(root, "next-week", "mdx", "2026-03-25");
    draft(root, "far-out", "mdx", "2026-04-02");
    write_file(
        root,
        "blog/drafts/someday.mdx",
        "---\ntitle: \"Someday\"\ndraft: true\n---\n\nNo schedule.\n",
    );

    let store = FsContentStore::new(root);
    let report = build_report(&store, date("2026-03-20")).unwrap();

    assert_eq!(report.total_drafts, 4);
    assert_eq!(report.ready.len(), 1);
    assert_eq!(report.ready[0].slug, "ready-post");
    assert_eq!(report.future_weeks.len(), 2);
    assert_eq!(report.future_weeks[0].0, date("2026-03-23"));
    assert_eq!(report.future_weeks[1].0, date("2026-03-30"));
    assert_eq!(report.unscheduled, vec!["someday".to_string()]);
}

#[test]
fn environment_gates_draft_visibility() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(
        root,
        "blog/live-post.mdx",
        "---\ntitle: \"Live\"\ndraft: false\npublishedAt: \"2026-01-10\"\n---\n\nLive body.\n",
    );
    draft(root, "due-post", "mdx", "2026-03-01");
    draft(root, "future-post", "mdx", "2026-06-01");

    let store = FsContentStore::new(root);
    let today = date("2026-03-20");

    let prod = visible_posts(&store, Environment::Production, today).unwrap();
    let prod_slugs: Vec<&str> = prod.iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(prod_slugs, ["due-post", "live-post"]);

    let dev = visible_posts(&store, Environment::Development, today).unwrap();
    assert_eq!(dev.len(), 3);
}

#[test]
fn listing_skips_templates_and_missing_dirs() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "blog/.template.mdx", "---\ndraft: true\n---\n");
    write_file(root, "blog/real.mdx", "---\ntitle: \"Real\"\n---\n\nHi.\n");

    let store = FsContentStore::new(root);
    assert_eq!(store.list(Area::Published).unwrap(), vec!["real".to_string()]);
    // Drafts dir does not exist at all.
    assert!(store.list(Area::Drafts).unwrap().is_empty());
}
