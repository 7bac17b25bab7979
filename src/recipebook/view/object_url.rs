use crate::model::Photo;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Transient handle through which a rendered element displays a photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live object URLs. Every URL created here must be revoked when
/// the element showing it goes away, or it leaks.
#[derive(Debug, Default)]
pub struct ObjectUrls {
    live: HashMap<ObjectUrl, usize>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, photo: &Photo) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:recipebook/{}", Uuid::new_v4()));
        self.live.insert(url.clone(), photo.len());
        url
    }

    /// Release a URL. Returns false if it was not live.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        self.live.remove(url).is_some()
    }

    pub fn is_live(&self, url: &ObjectUrl) -> bool {
        self.live.contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Bytes held alive by outstanding URLs.
    pub fn live_bytes(&self) -> usize {
        self.live.values().sum()
    }
}
