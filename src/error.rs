use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Quiz file exists but its contents failed validation. Distinct from
    /// not-found, which is `Ok(None)` at the store boundary.
    #[error("quiz `{slug}` failed validation: {reason}")]
    QuizValidation { slug: String, reason: String },

    #[error("cannot load quiz `{slug}`: {source}")]
    QuizLoad {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot access {}: {source}", path.display())]
    ContentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("post `{slug}` has malformed frontmatter: {source}")]
    Frontmatter {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A scheduled draft passed the eligibility scan but its backing file was
    /// gone by promotion time. Fatal for the invocation.
    #[error("draft `{slug}` vanished before promotion")]
    PromotionDataMissing { slug: String },

    #[error("cross-post notification failed: {0}")]
    Notification(String),
}
