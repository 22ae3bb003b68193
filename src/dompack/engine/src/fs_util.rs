use anyhow::Context as _;
use std::path::Path;

/// Copies file, creating parent directories of `dest` as needed.
pub(crate) fn copy(src: &Path, dest: &Path) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::copy(src, dest)
        .with_context(|| format!("copy {} to {}", src.display(), dest.display()))
        .map(drop)
}

/// Writes file, creating parent directories of `dest` as needed.
pub(crate) fn write(dest: &Path, content: impl AsRef<[u8]>) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::write(dest, content).with_context(|| format!("write {}", dest.display()))
}

#[cfg(unix)]
pub(crate) fn make_executable(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    let mut perms = meta.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("chmod +x {}", path.display()))
}

#[cfg(not(unix))]
pub(crate) fn make_executable(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

pub(crate) fn check_dir(path: &Path, allow_nonempty: bool) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("error: path {} not exists", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("error: path {} is not directory", path.display());
    }
    if !allow_nonempty {
        let mut items = path
            .read_dir()
            .with_context(|| format!("read dir {}", path.display()))?;
        if items.next().is_some() {
            anyhow::bail!("error: dir {} is not empty", path.display());
        }
    }
    Ok(())
}
