mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quillpress::content::{visible_posts, FsContentStore};
use quillpress::publish::{run_scheduling_cycle, CycleOutcome, LogCrossPoster};
use quillpress::schedule;
use quillpress::store::QuizStore;
use quillpress::Error;

use crate::cli::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    let store = FsContentStore::new(&cli.content_dir);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Publish { base_url } => {
            match run_scheduling_cycle(&store, &LogCrossPoster, &base_url, today)? {
                CycleOutcome::Published {
                    slug,
                    deferred_same_week,
                } => {
                    println!("Published: {slug}");
                    if deferred_same_week > 0 {
                        println!(
                            "Note: {deferred_same_week} other post(s) scheduled for this week \
                             will be published in later cycles."
                        );
                    }
                }
                CycleOutcome::NothingEligible => {
                    println!("No posts scheduled for publication.");
                }
            }
        }
        Command::Scheduled => {
            let report = schedule::build_report(&store, today)?;

            println!("Ready to publish (scheduled date has passed or is today):");
            if report.ready.is_empty() {
                println!("  (none)");
            }
            for (i, post) in report.ready.iter().enumerate() {
                let marker = if i == 0 { "-> " } else { "   " };
                let title = post.meta.title.as_deref().unwrap_or(&post.slug);
                println!("{marker}{title}");
                println!("     slug: {}, scheduled: {}", post.slug, post.scheduled);
            }

            println!("\nScheduled for future:");
            if report.future_weeks.is_empty() {
                println!("  (none)");
            }
            for (week, posts) in &report.future_weeks {
                println!("  Week of {week}:");
                for post in posts {
                    let title = post.meta.title.as_deref().unwrap_or(&post.slug);
                    println!("    - {title} ({})", post.scheduled);
                }
            }

            if !report.unscheduled.is_empty() {
                println!("\nDrafts without a schedule:");
                for slug in &report.unscheduled {
                    println!("  - {slug}");
                }
            }

            println!("\nTotal drafts: {}", report.total_drafts);
            println!("Ready to publish: {}", report.ready.len());
            if let Some(next) = report.ready.first() {
                println!("Next up: {} ({})", next.slug, next.scheduled);
            }
        }
        Command::Quiz { slug } => {
            let quizzes = QuizStore::new(&cli.content_dir);
            match quizzes.load(&slug)? {
                Some(quiz) => {
                    println!("Quiz: {} ({})", quiz.title, quiz.id);
                    println!("Questions: {}", quiz.questions.len());
                    for q in &quiz.questions {
                        println!("  - [{:?}] {} ({} options)", q.kind, q.id, q.options.len());
                    }
                }
                None => {
                    println!("No quiz found for slug `{slug}`.");
                }
            }
        }
        Command::Posts { env } => {
            let posts = visible_posts(&store, env, today)?;
            if posts.is_empty() {
                println!("No visible posts.");
            }
            for post in posts {
                let title = post.meta.title.as_deref().unwrap_or(&post.slug);
                let date = post
                    .meta
                    .published_at
                    .or(post.meta.scheduled_publish_at)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "undated".to_string());
                let flag = if post.meta.draft { " [draft]" } else { "" };
                println!("{date}  {title}{flag}");
            }
        }
    }

    Ok(())
}
