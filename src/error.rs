//! Error kinds for the scraping pipeline.
//!
//! Only `Navigation` is fatal to a run. `NotInteractable` is absorbed by the
//! consent dismisser; element lookups that miss during extraction never
//! produce an error at all, they degrade to empty field values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The page could not be loaded. The only fatal error in the pipeline.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// An element was not present, visible, and enabled within the wait
    /// deadline. Recoverable; callers catch and move on.
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// The browser engine itself misbehaved (launch, CDP transport).
    #[error("browser error: {0}")]
    Browser(String),

    /// Writing the output artifact failed.
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
