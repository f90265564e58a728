use std::fs;
use std::path::Path;

/// Writes `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Returns true when the current process runs as root (UID 0).
/// We use this to skip permission-sensitive tests in Docker/act.
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: libc call has no side effects; used for testing only.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
