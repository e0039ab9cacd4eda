//! Byte fetching for fonts, icons, logos and note images.
//!
//! Every asset is addressed by a URL-like key such as `/ttf/OpenSans-Bold.ttf`
//! or `/icons/star.png`. The layout never cares where the bytes come from; it
//! only talks to an [`AssetFetcher`]. No caching or retry contract is part of
//! the trait: one failed fetch is final for the caller that made it.

use crate::error::FetchError;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Something that can turn an asset URL into bytes
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: AssetFetcher + ?Sized> AssetFetcher for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// URL of one style of a font family, e.g. `/ttf/OpenSans-BoldItalic.ttf`
pub fn font_url(file_stem: &str, style_name: &str) -> String {
    format!("/ttf/{file_stem}-{style_name}.ttf")
}

/// URL of a separator icon, e.g. `/icons/star.png`
pub fn icon_url(kind: &str) -> String {
    format!("/icons/{kind}.png")
}

/// Serves assets from a directory on disk. The path part of the URL (scheme,
/// host, query and fragment are ignored) is resolved below the root; URLs that
/// try to escape the root are refused.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirectoryFetcher {
        DirectoryFetcher { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, FetchError> {
        let without_scheme = match url.find("://") {
            Some(index) => {
                let rest = &url[index + 3..];
                rest.find('/').map(|slash| &rest[slash..]).unwrap_or("")
            }
            None => url,
        };
        let path = without_scheme
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        if path.is_empty() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

impl AssetFetcher for DirectoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(url)?;
        log::debug!("fetching {url} from {}", path.display());
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(url.to_string())
            } else {
                FetchError::Io {
                    url: url.to_string(),
                    source,
                }
            }
        })
    }
}

/// Serves assets from memory, keyed by the exact URL
#[derive(Debug, Default, Clone)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> MemoryFetcher {
        MemoryFetcher::default()
    }

    pub fn insert<S: Into<String>>(&mut self, url: S, bytes: Vec<u8>) -> &mut Self {
        self.assets.insert(url.into(), bytes);
        self
    }

    pub fn with<S: Into<String>>(mut self, url: S, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_asset_layout() {
        assert_eq!(font_url("PlayfairDisplay", "BoldItalic"), "/ttf/PlayfairDisplay-BoldItalic.ttf");
        assert_eq!(icon_url("dove"), "/icons/dove.png");
    }

    #[test]
    fn directory_fetcher_reads_below_its_root() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        std::fs::create_dir_all(dir.path().join("icons")).unwrap();
        std::fs::write(dir.path().join("icons/star.png"), b"star").unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("/icons/star.png").unwrap(), b"star");
        assert_eq!(fetcher.fetch("https://example.org/icons/star.png?v=2").unwrap(), b"star");
        assert!(matches!(fetcher.fetch("/icons/heart.png"), Err(FetchError::NotFound(_))));
    }

    #[test]
    fn directory_fetcher_refuses_to_escape() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let fetcher = DirectoryFetcher::new(dir.path());
        assert!(matches!(fetcher.fetch("/../etc/passwd"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(fetcher.fetch("/"), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn memory_fetcher_matches_exact_urls() {
        let fetcher = MemoryFetcher::new().with("/logo.png", vec![1, 2, 3]);
        assert_eq!(fetcher.fetch("/logo.png").unwrap(), vec![1, 2, 3]);
        assert!(fetcher.fetch("logo.png").is_err());
    }
}
