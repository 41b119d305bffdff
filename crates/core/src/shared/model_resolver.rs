use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file {0} does not exist")]
    MissingExplicit(PathBuf),
    #[error("model {0} is not cached or bundled and no download URL was given")]
    NotFound(String),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where a model may come from, in the order they are tried.
#[derive(Clone, Debug, Default)]
pub struct ModelRequest<'a> {
    /// File name used in the cache and bundled directories.
    pub name: &'a str,
    /// A path given by the user. When set, nothing else is consulted.
    pub explicit: Option<&'a Path>,
    pub bundled_dir: Option<&'a Path>,
    pub url: Option<&'a str>,
}

impl<'a> ModelRequest<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

/// Resolve a model file once at startup.
///
/// Resolution order:
/// 1. Explicit path
/// 2. User cache directory (platform-specific)
/// 3. Bundled directory
/// 4. Download from URL into the cache
pub fn resolve(
    request: &ModelRequest<'_>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = request.explicit {
        return resolve_explicit(path);
    }
    resolve_in(&model_cache_dir()?, request, progress)
}

fn resolve_explicit(path: &Path) -> Result<PathBuf, ModelResolveError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ModelResolveError::MissingExplicit(path.to_path_buf()))
    }
}

fn resolve_in(
    cache_dir: &Path,
    request: &ModelRequest<'_>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(request.name);
    if cached_path.exists() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(dir) = request.bundled_dir {
        let bundled_path = dir.join(request.name);
        if bundled_path.exists() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    let url = request
        .url
        .ok_or_else(|| ModelResolveError::NotFound(request.name.to_string()))?;
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {} from {url}", request.name);
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/moodlens/models/`
/// - Linux: `$XDG_CACHE_HOME/moodlens/models/` or `~/.cache/moodlens/models/`
/// - Windows: `%LOCALAPPDATA%/moodlens/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("moodlens").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("moodlens").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);
    save_stream(&mut response, dest, total, progress.as_ref())
}

/// Streams `reader` into `dest`.
///
/// Bytes go to `<dest>.part` first, which is renamed once complete and
/// removed on any failure.
fn save_stream(
    reader: &mut impl Read,
    dest: &Path,
    total: u64,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");
    let result = write_part(reader, &temp_path, total, progress).and_then(|()| {
        fs::rename(&temp_path, dest).map_err(|source| ModelResolveError::Write {
            path: dest.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_part(
    reader: &mut impl Read,
    temp_path: &Path,
    total: u64,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |source| ModelResolveError::Write {
        path: temp_path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut buf = vec![0u8; 1024 * 1024];
    let mut downloaded: u64 = 0;
    loop {
        let n = reader.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err)
}
