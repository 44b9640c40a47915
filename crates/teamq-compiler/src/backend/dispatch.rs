use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;

use super::{BackendError, BackendRegistry, GenContext, GeneratedFile, Target};
use crate::model::Catalog;
use crate::schema::SchemaLookup;

/// Written into every output directory; only directories carrying it are
/// ever removed.
pub const OWNERSHIP_MARKER: &str = ".teamq-generated";

#[derive(Debug)]
pub struct TargetFailure {
    pub backend: String,
    pub out: PathBuf,
    pub error: BackendError,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.backend, self.out.display(), self.error)
    }
}

/// Every target that failed in one dispatch.
#[derive(Debug, Default, thiserror::Error)]
#[error("{} of the configured targets failed", .failures.len())]
pub struct BackendFailures {
    pub failures: Vec<TargetFailure>,
}

impl BackendFailures {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetFailure> {
        self.failures.iter()
    }

    pub fn extend(&mut self, other: BackendFailures) {
        self.failures.extend(other.failures);
    }
}

/// Output directories claimed during one run.
///
/// A directory may be claimed once, and never alongside a directory that
/// contains it or sits inside it, so no target can replace another's output.
#[derive(Debug, Default)]
pub struct OutputClaims {
    claimed: IndexMap<PathBuf, String>,
}

impl OutputClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target.out` for `target.backend`.
    pub fn claim(&mut self, target: &Target) -> Result<(), BackendError> {
        let key = normalize(&target.out);
        let overlap = self
            .claimed
            .iter()
            .find(|(path, _)| key.starts_with(path) || path.starts_with(&key));
        if let Some((path, owner)) = overlap {
            return Err(BackendError::OutputConflict {
                path: target.out.clone(),
                claimed: path.clone(),
                owner: owner.clone(),
            });
        }
        self.claimed.insert(key, target.backend.clone());
        Ok(())
    }
}

/// Run every target against `catalog`.
///
/// Each target is rendered fully in memory before its directory is
/// replaced, so a render failure leaves the previous output untouched. A
/// failing target does not stop the others. Returns the written files.
pub fn dispatch(
    catalog: &Catalog,
    targets: &[Target],
    registry: &BackendRegistry,
    schema: &dyn SchemaLookup,
) -> Result<Vec<PathBuf>, BackendFailures> {
    dispatch_claimed(catalog, targets, registry, schema, &mut OutputClaims::new())
}

/// [`dispatch`], checking output directories against claims shared with
/// other dispatches of the same run.
pub fn dispatch_claimed(
    catalog: &Catalog,
    targets: &[Target],
    registry: &BackendRegistry,
    schema: &dyn SchemaLookup,
    claims: &mut OutputClaims,
) -> Result<Vec<PathBuf>, BackendFailures> {
    let ctx = GenContext::new(catalog, schema);
    let mut written = Vec::new();
    let mut failures = BackendFailures::default();

    for target in targets {
        let result = claims
            .claim(target)
            .and_then(|()| run_target(&ctx, target, registry));
        match result {
            Ok(files) => written.extend(files),
            Err(error) => {
                tracing::warn!(backend = %target.backend, out = %target.out.display(), %error, "target failed");
                failures.failures.push(TargetFailure {
                    backend: target.backend.clone(),
                    out: target.out.clone(),
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(failures)
    }
}

fn run_target(
    ctx: &GenContext<'_>,
    target: &Target,
    registry: &BackendRegistry,
) -> Result<Vec<PathBuf>, BackendError> {
    let backend = registry.get(&target.backend)?;
    let files = backend.generate(ctx)?;
    tracing::info!(
        backend = backend.name(),
        out = %target.out.display(),
        files = files.len(),
        "generated"
    );
    replace_dir(&target.out, &files)
}

/// Remove `out` (if we own it), recreate it, and write `files` into it.
fn replace_dir(out: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, BackendError> {
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |source| BackendError::Io { path, source }
    };

    if out.exists() {
        if !is_owned(out).map_err(io(out))? {
            return Err(BackendError::UnmanagedOutput {
                path: out.to_path_buf(),
            });
        }
        fs::remove_dir_all(out).map_err(io(out))?;
    }
    fs::create_dir_all(out).map_err(io(out))?;

    let marker = out.join(OWNERSHIP_MARKER);
    fs::write(&marker, "").map_err(io(&marker))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io(parent))?;
        }
        fs::write(&path, &file.contents).map_err(io(&path))?;
        tracing::info!(path = %path.display(), "wrote");
        written.push(path);
    }
    Ok(written)
}

/// An existing output directory may be replaced if it is empty or carries
/// the marker.
fn is_owned(out: &Path) -> std::io::Result<bool> {
    if !out.is_dir() {
        return Ok(false);
    }
    if out.join(OWNERSHIP_MARKER).is_file() {
        return Ok(true);
    }
    Ok(fs::read_dir(out)?.next().is_none())
}

/// Lexical normalization, so `out/ts` and `out/./ts/` compare equal
/// without the directory having to exist.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
