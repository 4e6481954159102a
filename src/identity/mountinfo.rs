//! Mountinfo line parser for Linux systems.
//!
//! Parses lines in `/proc/[pid]/mountinfo` format. See
//! [`proc_pid_mountinfo(5)`](https://man7.org/linux/man-pages/man5/proc_pid_mountinfo.5.html)
//! for details on the structure.
//!
//! On cgroup v2 hosts the cgroup listing of a containerized process is just
//! `0::/`. The engine still bind-mounts the container's `hostname`, `hosts`
//! and `resolv.conf` from its per-container directory, which names the id.

use std::sync::LazyLock;

use regex::Regex;

/// Files the engine bind-mounts from the per-container directory.
const ENGINE_MANAGED_MOUNTS: [&str; 3] = ["/etc/hostname", "/etc/hosts", "/etc/resolv.conf"];

static CONTAINER_DIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/containers/([0-9a-f]{64})/[^/]+$").expect("container dir pattern is valid")
});

/// The fields of a mountinfo line the identity resolver needs.
#[derive(Debug, PartialEq, Eq)]
pub struct MountInfo<'a> {
    /// Root of the mount within the filesystem.
    pub root: &'a str,
    /// Mount point relative to the process's root.
    pub mount_point: &'a str,
    /// Filesystem type (e.g., `ext4`, `overlay`).
    pub fs_type: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing separator ` - ` in line: `{0}`")]
    MissingSeparator(String),

    #[error("missing `{field}` in line: `{line}`")]
    MissingField { field: &'static str, line: String },
}

/// Parses a single line of mountinfo data.
///
/// # Errors
///
/// Returns [`ParseError`] variants for a missing separator or required fields.
pub fn parse_mount_info_line(line: &str) -> Result<MountInfo<'_>, ParseError> {
    let (pre, post) = line
        .split_once(" - ")
        .ok_or_else(|| ParseError::MissingSeparator(line.to_owned()))?;

    let missing = |field| ParseError::MissingField {
        field,
        line: line.to_owned(),
    };

    // mount id, parent id, major:minor, root, mount point
    let mut pre_fields = pre.split_whitespace().skip(3);
    let root = pre_fields.next().ok_or_else(|| missing("root"))?;
    let mount_point = pre_fields.next().ok_or_else(|| missing("mount_point"))?;
    let fs_type = post
        .split_whitespace()
        .next()
        .ok_or_else(|| missing("fs_type"))?;

    Ok(MountInfo {
        root,
        mount_point,
        fs_type,
    })
}

/// Returns the container id if `mount` is one of the engine-managed bind mounts.
pub fn container_id_from_mount<'a>(mount: &MountInfo<'a>) -> Option<&'a str> {
    if !ENGINE_MANAGED_MOUNTS.contains(&mount.mount_point) {
        return None;
    }

    CONTAINER_DIR_PATTERN
        .captures(mount.root)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "c73619a9e285200119c6b2b0dd79cd05a467a2c73d02a732d43ec5aaafed5c1a";

    #[test]
    fn parses_valid_mountinfo_line_with_optional_fields() {
        let line = "70 56 0:45 / /var rw,nosuid,nodev,noexec,relatime shared:20 - ext4 /dev/sdb1 rw,errors=remount-ro";
        let result = parse_mount_info_line(line).unwrap();

        assert_eq!(result.root, "/");
        assert_eq!(result.mount_point, "/var");
        assert_eq!(result.fs_type, "ext4");
    }

    #[test]
    fn error_on_missing_separator() {
        let line = "42 35 0:22 / /mnt rw,nosuid ext4 /dev/sda1 rw";
        let err = parse_mount_info_line(line).unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator(_)));
    }

    #[test]
    fn error_on_missing_mount_point() {
        let line = "42 35 0:22 / - ext4 /dev/sda1 rw";
        match parse_mount_info_line(line).unwrap_err() {
            ParseError::MissingField { field, .. } => assert_eq!(field, "mount_point"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_on_empty_line() {
        let err = parse_mount_info_line("").unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator(_)));
    }

    #[test]
    fn finds_id_in_engine_managed_mounts() {
        for line in [
            format!(
                "612 590 254:1 /docker/containers/{ID}/resolv.conf /etc/resolv.conf rw,relatime - ext4 /dev/vda1 rw"
            ),
            format!(
                "613 590 8:1 /var/lib/docker/containers/{ID}/hostname /etc/hostname rw,relatime - ext4 /dev/sda1 rw,discard"
            ),
        ] {
            let mount = parse_mount_info_line(&line).unwrap();
            assert_eq!(container_id_from_mount(&mount), Some(ID), "{line}");
        }
    }

    #[test]
    fn ignores_other_mounts() {
        for line in [
            // Build workspace that happens to expose the engine's state directory.
            format!(
                "700 590 8:1 /var/lib/docker/containers/{ID}/hostname /workspace/hostname rw - ext4 /dev/sda1 rw"
            ),
            "590 501 0:52 / / rw,relatime - overlay overlay rw,lowerdir=/l".to_owned(),
            "614 590 8:1 /etc/resolv.conf /etc/resolv.conf rw - ext4 /dev/sda1 rw".to_owned(),
        ] {
            let mount = parse_mount_info_line(&line).unwrap();
            assert_eq!(container_id_from_mount(&mount), None, "{line}");
        }
    }
}
