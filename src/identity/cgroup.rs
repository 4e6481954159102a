//! Parsing and matching of `/proc/[pid]/cgroup` records.
//!
//! Each line has the shape `<hierarchy-id>:<controller-list>:<cgroup-path>`:
//!
//! - cgroup v1: arbitrary hierarchy id, comma-separated controllers
//!   (`cpu,cpuacct`, `name=systemd`), path relative to the hierarchy root.
//! - cgroup v2: hierarchy id `0`, empty controller list, unified path.
//!
//! The container id is the trailing token of the path. Its exact spelling
//! depends on the runtime and the cgroup driver, so matching is done by an
//! ordered list of rules.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum CgroupLineError {
    #[error("invalid cgroup line format: {0}")]
    InvalidFormat(String),
    #[error("invalid hierarchy id in cgroup line: {0}")]
    InvalidHierarchyID(String),
}

/// One record of a cgroup membership listing.
#[derive(Debug, PartialEq, Eq)]
pub struct CgroupLine<'a> {
    pub hierarchy_id: u32,
    pub controller_list: Vec<&'a str>,
    pub path: &'a str,
}

/// Parses a single cgroup membership line.
///
/// Only the first two `:` separate fields; paths created by the containerd
/// systemd driver contain further colons.
pub fn parse_cgroup_line(line: &str) -> Result<CgroupLine<'_>, CgroupLineError> {
    let line = line.trim_end();
    let mut it = line.splitn(3, ':');
    let hierarchy_id = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?
        .parse::<u32>()
        .map_err(|_| CgroupLineError::InvalidHierarchyID(line.to_owned()))?;
    let controller_list = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?;
    let controller_list: Vec<&str> = if controller_list.is_empty() {
        Vec::default()
    } else {
        controller_list.split(',').collect()
    };
    let path = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?;

    Ok(CgroupLine {
        hierarchy_id,
        controller_list,
        path,
    })
}

/// A named pattern that extracts a container id from a cgroup path.
///
/// Every pattern is anchored at the end of the path, so the innermost
/// (rightmost) id wins when several containers are nested.
pub struct CgroupRule {
    pub name: &'static str,
    pattern: Regex,
}

impl CgroupRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("cgroup rule pattern is valid"),
        }
    }

    /// Returns the container id captured from `path`, if the rule applies.
    pub fn find<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Rules tried in order against each cgroup path.
pub static CGROUP_RULES: LazyLock<Vec<CgroupRule>> = LazyLock::new(|| {
    vec![
        // /system.slice/docker-<id>.scope
        // /kubepods.slice/.../cri-containerd-<id>.scope
        CgroupRule::new(
            "systemd-scope",
            r"/(?:[^/]*-)?(?:docker|cri-containerd|crio|libpod)-([0-9a-f]{64})\.scope$",
        ),
        // /docker/<id>, /docker/<parent>/docker/<id>, /kubepods/<qos>/pod<uuid>/<id>
        CgroupRule::new("path-segment", r"/([0-9a-f]{64})$"),
        // /system.slice/containerd.service/kubepods-...slice:cri-containerd:<id>
        CgroupRule::new(
            "runtime-qualified",
            r":(?:docker|cri-containerd|crio):([0-9a-f]{64})$",
        ),
    ]
});

/// Extracts the innermost container id from a cgroup path.
pub fn container_id_from_cgroup_path(path: &str) -> Option<&str> {
    let path = path.trim_end();
    CGROUP_RULES.iter().find_map(|rule| {
        let id = rule.find(path)?;
        log::trace!("cgroup rule `{}` matched `{}`", rule.name, path);
        Some(id)
    })
}

/// Extracts the innermost container id from a full cgroup membership line.
///
/// Returns `None` for malformed lines and for paths without a container id.
pub fn container_id_from_cgroup_line(line: &str) -> Option<&str> {
    match parse_cgroup_line(line) {
        Ok(cgl) => container_id_from_cgroup_path(cgl.path),
        Err(err) => {
            log::debug!("skipping cgroup line: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "c73619a9e285200119c6b2b0dd79cd05a467a2c73d02a732d43ec5aaafed5c1a";

    fn fixtures() -> Vec<String> {
        let mut lines = vec![
            format!("2:cpu:/docker/{ID}"),
            format!("4:cpuset:/system.slice/docker-{ID}.scope"),
            format!(
                "10:cpu,cpuacct:/docker/a9f3c3932cd81c4a74cc7e0a18c3300255159512f1d000545c42895adaf68932/docker/{ID}"
            ),
            format!(
                "3:cpu:/docker/4193df6bcf5fce75f3fc77f303b2ac06fb664adeb269b959b7ae17b3f8dcf329/{ID}"
            ),
        ];

        // docker 17.06.0-ce
        for controllers in [
            "11:memory",
            "10:devices",
            "9:freezer",
            "8:net_cls,net_prio",
            "7:cpu,cpuacct",
            "6:perf_event",
            "5:cpuset",
            "4:pids",
            "3:blkio",
            "2:hugetlb",
            "1:name=systemd",
        ] {
            lines.push(format!("{controllers}:/docker/{ID}"));
        }

        // kubernetes 1.6
        for controllers in [
            "11:freezer",
            "10:perf_event",
            "9:pids",
            "8:memory",
            "7:hugetlb",
            "6:cpuset",
            "5:blkio",
            "4:net_cls,net_prio",
            "3:cpu,cpuacct",
            "2:devices",
            "1:name=systemd",
        ] {
            lines.push(format!(
                "{controllers}:/kubepods/besteffort/poddccc797a-6ac0-11e7-aabd-080027a4fcb9/{ID}"
            ));
        }

        lines
    }

    #[test]
    fn test_cgroup_string_matching() {
        for line in fixtures() {
            assert_eq!(
                container_id_from_cgroup_line(&line),
                Some(ID),
                "pattern didn't match container id in {line}"
            );
        }
    }

    #[test]
    fn test_systemd_driver_lines() {
        let lines = [
            format!(
                "0::/kubepods.slice/kubepods-besteffort.slice/kubepods-besteffort-pod0c6c7ae8_5f2b_4d8e_9b55_9e0d2f3c1a4b.slice/cri-containerd-{ID}.scope"
            ),
            format!(
                "1:name=systemd:/system.slice/containerd.service/kubepods-burstable-pod0c6c7ae8_5f2b_4d8e_9b55_9e0d2f3c1a4b.slice:cri-containerd:{ID}"
            ),
            format!("0::/machine.slice/libpod-{ID}.scope"),
            format!("0::/kubepods.slice/kubepods-pod1.slice/crio-{ID}.scope\n"),
        ];
        for line in &lines {
            assert_eq!(container_id_from_cgroup_line(line), Some(ID), "{line}");
        }
    }

    #[test]
    fn test_triply_nested_picks_innermost() {
        let line = format!(
            "5:cpuset:/docker/a9f3c3932cd81c4a74cc7e0a18c3300255159512f1d000545c42895adaf68932/docker/4193df6bcf5fce75f3fc77f303b2ac06fb664adeb269b959b7ae17b3f8dcf329/docker/{ID}"
        );
        assert_eq!(container_id_from_cgroup_line(&line), Some(ID));
    }

    #[test]
    fn test_no_container_context() {
        for line in [
            "0::/",
            "0::/init.scope",
            "1:name=systemd:/user.slice/user-1000.slice/session-2.scope",
            "4:cpu:/docker",
            // Too short to be an id.
            "2:cpu:/docker/c73619a9e285",
            // An id that is not the trailing token belongs to an ancestor.
            format!("2:cpu:/docker/{ID}/init").as_str(),
            "garbage",
            "",
        ] {
            assert_eq!(container_id_from_cgroup_line(line), None, "{line}");
        }
    }

    #[test]
    fn test_parse_cgroup_line() {
        let cgl = parse_cgroup_line("8:net_cls,net_prio:/docker/abc\n").unwrap();
        assert_eq!(cgl.hierarchy_id, 8);
        assert_eq!(cgl.controller_list, vec!["net_cls", "net_prio"]);
        assert_eq!(cgl.path, "/docker/abc");

        let v2 = parse_cgroup_line("0::/").unwrap();
        assert!(v2.controller_list.is_empty());
        assert_eq!(v2.path, "/");
    }

    #[test]
    fn test_parse_cgroup_line_errors() {
        assert!(matches!(
            parse_cgroup_line("x:cpu:/"),
            Err(CgroupLineError::InvalidHierarchyID(_))
        ));
        assert!(matches!(
            parse_cgroup_line("3:cpu"),
            Err(CgroupLineError::InvalidFormat(_))
        ));
    }
}
