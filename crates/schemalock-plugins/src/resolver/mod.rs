//! Resolution of plugin names to executable paths.
//!
//! [`PathResolver`] follows the usual shell lookup: a name containing a path
//! separator is checked as-is, anything else is searched for in each
//! absolute directory of `PATH` in order. On Windows each `PATHEXT`
//! extension is tried as well.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::ResolveError;

/// Turns a plugin name into the executable to launch.
///
/// Implementations are shared by every concurrent invocation of a run.
pub trait PluginResolver: Sync {
    /// Resolves `name`, which has already been trimmed.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when no executable matches the name.
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError>;
}

/// Resolves plugin names against a search path.
///
/// # Example
///
/// ```
/// use schemalock_plugins::resolver::{PathResolver, PluginResolver};
///
/// let resolver = PathResolver::with_search_path("/nonexistent");
/// assert!(resolver.resolve("schemalock-plugin-missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    /// Creates a resolver that reads `PATH` at lookup time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a fixed search path instead of `PATH`.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn search_path(&self) -> Option<OsString> {
        self.search_path.clone().or_else(|| env::var_os("PATH"))
    }
}

impl PluginResolver for PathResolver {
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::EmptyName);
        }

        if name.chars().any(std::path::is_separator) {
            let candidate = PathBuf::from(name);
            return executable_candidate(&candidate)
                .ok_or(ResolveError::NotExecutable { path: candidate });
        }

        self.search_path()
            .and_then(|paths| {
                search_dirs(&paths).find_map(|dir| executable_candidate(&dir.join(name)))
            })
            .ok_or_else(|| ResolveError::NotFound {
                name: name.to_owned(),
            })
    }
}

/// Directories of `paths` that take part in the search.
///
/// Empty and relative entries are dropped so a file in the working directory
/// can never stand in for a plugin.
fn search_dirs(paths: &OsStr) -> impl Iterator<Item = PathBuf> + '_ {
    env::split_paths(paths).filter(|dir| dir.is_absolute())
}

#[cfg(unix)]
fn executable_candidate(path: &Path) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .then(|| path.to_path_buf())
}

/// Extensions tried when `PATHEXT` is unset.
#[cfg(not(unix))]
const DEFAULT_PATHEXT: &str = ".com;.exe;.bat;.cmd";

/// Accepts `path` when it already names an executable extension, otherwise
/// tries each `PATHEXT` extension in turn.
#[cfg(not(unix))]
fn executable_candidate(path: &Path) -> Option<PathBuf> {
    let pathext = env::var("PATHEXT").unwrap_or_else(|_| DEFAULT_PATHEXT.to_owned());
    let extensions: Vec<String> = pathext
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let has_known_extension = path.extension().is_some_and(|ext| {
        let lower = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
        extensions.contains(&lower)
    });
    if has_known_extension && path.is_file() {
        return Some(path.to_path_buf());
    }

    extensions.iter().find_map(|ext| {
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(ext);
        let candidate = PathBuf::from(with_ext);
        candidate.is_file().then_some(candidate)
    })
}
