//! Object-storage naming rules for uploaded images.
//!
//! Objects live under a bucket, inside one of a fixed set of folders. The
//! public URL of an object is `<base>/<bucket>/<key>`; deleting by URL maps
//! back to the key by splitting on `/<bucket>/`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default bucket name for site images.
pub const DEFAULT_BUCKET: &str = "project-images";

/// Extension of every stored image (uploads are re-encoded as JPEG).
pub const STORED_EXTENSION: &str = "jpg";

/// Folder an uploaded image is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFolder {
    #[default]
    Projects,
    Testimonials,
    Products,
}

impl ImageFolder {
    pub const ALL: [ImageFolder; 3] = [Self::Projects, Self::Testimonials, Self::Products];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Testimonials => "testimonials",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for ImageFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFolder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|folder| folder.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown image folder '{s}'. Must be one of: projects, testimonials, products"
                ))
            })
    }
}

/// Build the object key for an upload made at `unix_millis`.
pub fn object_key(folder: ImageFolder, unix_millis: i64) -> String {
    format!("{folder}/{unix_millis}.{STORED_EXTENSION}")
}

/// Public URL for `key` given the storage base URL and bucket.
pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", base_url.trim_end_matches('/'))
}

/// Recover the object key from a public URL.
///
/// Returns `None` when the URL does not point into `bucket`, or when the key
/// is empty or tries to escape the bucket with `..` segments.
pub fn key_from_url<'a>(url: &'a str, bucket: &str) -> Option<&'a str> {
    let marker = format!("/{bucket}/");
    let (_, key) = url.split_once(&marker)?;
    if key.is_empty() || key.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return None;
    }
    Some(key)
}
