use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::model::{Document, PostMeta, SourceFormat};

/// The two content areas a post can live in. Promotion moves a slug from
/// Drafts to Published; a slug never validly exists in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Drafts,
    Published,
}

/// Replaces the old NODE_ENV gate: draft visibility is an explicit input to
/// the listing, not ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    /// All drafts visible.
    Development,
    /// Only published posts and drafts whose scheduled date has arrived.
    Production,
}

/// Storage seam for the publishing workflow. Everything is keyed by slug;
/// the backing layout (flat files here) stays behind this trait.
pub trait ContentStore {
    fn list(&self, area: Area) -> Result<Vec<String>>;
    fn read(&self, area: Area, slug: &str) -> Result<Option<Document>>;
    fn write(&self, area: Area, doc: &Document) -> Result<()>;
    fn delete(&self, area: Area, slug: &str) -> Result<()>;
}

/// Flat-file backend: published posts under `<content>/blog/`, drafts under
/// `<content>/blog/drafts/`. Posts are `.mdx` or `.md`; `.template.*` files
/// and anything hidden are ignored.
pub struct FsContentStore {
    blog_dir: PathBuf,
}

impl FsContentStore {
    pub fn new(content_dir: &Path) -> Self {
        Self {
            blog_dir: content_dir.join("blog"),
        }
    }

    fn area_dir(&self, area: Area) -> PathBuf {
        match area {
            Area::Drafts => self.blog_dir.join("drafts"),
            Area::Published => self.blog_dir.clone(),
        }
    }

    // Tries .mdx first, then .md.
    fn resolve(&self, area: Area, slug: &str) -> Option<(PathBuf, SourceFormat)> {
        let dir = self.area_dir(area);
        for format in [SourceFormat::Mdx, SourceFormat::Md] {
            let path = dir.join(format!("{slug}.{}", format.ext()));
            if path.is_file() {
                return Some((path, format));
            }
        }
        None
    }
}

impl ContentStore for FsContentStore {
    fn list(&self, area: Area) -> Result<Vec<String>> {
        let dir = self.area_dir(area);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|source| Error::ContentIo {
            path: dir.clone(),
            source,
        })?;

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::ContentIo {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(slug) = name.strip_suffix(".mdx").or_else(|| name.strip_suffix(".md")) {
                slugs.push(slug.to_string());
            }
        }
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    fn read(&self, area: Area, slug: &str) -> Result<Option<Document>> {
        let Some((path, format)) = self.resolve(area, slug) else {
            return Ok(None);
        };
        let raw = fs::read_to_string(&path).map_err(|source| Error::ContentIo {
            path: path.clone(),
            source,
        })?;
        let (meta, body) = split_frontmatter(slug, &raw)?;
        Ok(Some(Document {
            slug: slug.to_string(),
            format,
            meta,
            body,
        }))
    }

    fn write(&self, area: Area, doc: &Document) -> Result<()> {
        let dir = self.area_dir(area);
        fs::create_dir_all(&dir).map_err(|source| Error::ContentIo {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(format!("{}.{}", doc.slug, doc.format.ext()));
        let rendered = render(doc)?;
        atomic_write(&path, &rendered)
    }

    fn delete(&self, area: Area, slug: &str) -> Result<()> {
        if let Some((path, _)) = self.resolve(area, slug) {
            fs::remove_file(&path).map_err(|source| Error::ContentIo { path, source })?;
        }
        Ok(())
    }
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|source| Error::ContentIo {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| Error::ContentIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Splits `---` delimited YAML frontmatter from the body. A file without a
/// frontmatter block is a bare body with default metadata.
pub fn split_frontmatter(slug: &str, raw: &str) -> Result<(PostMeta, String)> {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with("---") {
        return Ok((PostMeta::default(), raw.to_string()));
    }

    let after_open = &trimmed[3..];
    let Some(end) = after_open.find("\n---") else {
        return Ok((PostMeta::default(), raw.to_string()));
    };

    let fm = &after_open[..end];
    let body = after_open[end + 4..]
        .trim_start_matches(['\r', '\n'])
        .to_string();

    let meta: PostMeta = serde_yaml::from_str(fm).map_err(|source| Error::Frontmatter {
        slug: slug.to_string(),
        source,
    })?;
    Ok((meta, body))
}

pub fn render(doc: &Document) -> Result<String> {
    let yaml = serde_yaml::to_string(&doc.meta).map_err(|source| Error::Frontmatter {
        slug: doc.slug.clone(),
        source,
    })?;
    Ok(format!("---\n{yaml}---\n\n{}", doc.body))
}

/// What a reader of the blog sees, per environment. Published posts always;
/// drafts only in development, or in production once their scheduled date has
/// arrived.
pub fn visible_posts(
    store: &dyn ContentStore,
    env: Environment,
    today: NaiveDate,
) -> Result<Vec<Document>> {
    let mut posts = Vec::new();
    for slug in store.list(Area::Published)? {
        if let Some(doc) = store.read(Area::Published, &slug)? {
            posts.push(doc);
        }
    }
    for slug in store.list(Area::Drafts)? {
        let Some(doc) = store.read(Area::Drafts, &slug)? else {
            continue;
        };
        let include = match env {
            Environment::Development => true,
            Environment::Production => doc
                .meta
                .scheduled_publish_at
                .is_some_and(|date| date <= today),
        };
        if include {
            posts.push(doc);
        }
    }
    // Newest first, like the blog index; undated posts sink to the bottom.
    posts.sort_by(|a, b| {
        let key = |d: &Document| d.meta.published_at.or(d.meta.scheduled_publish_at);
        key(b).cmp(&key(a)).then_with(|| a.slug.cmp(&b.slug))
    });
    Ok(posts)
}
