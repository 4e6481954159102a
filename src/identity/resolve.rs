use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::cgroup::container_id_from_cgroup_line;
use super::mountinfo::{container_id_from_mount, parse_mount_info_line};
use super::{Error, Result};
use crate::container::ContainerHandle;
use crate::error::ResultOkLogExt;

/// Determines the id of the container the current process runs in.
///
/// Reads `<proc_root>/self/cgroup` and falls back to
/// `<proc_root>/self/mountinfo`.
///
/// # Returns
///
/// `Ok(None)` if the process does not run inside a recognized container,
/// e.g. directly on a build host.
///
/// # Errors
///
/// Returns [`Error`] if an existing listing cannot be read.
pub fn who_am_i(proc_root: impl AsRef<Path>) -> Result<Option<ContainerHandle>> {
    let self_dir = proc_root.as_ref().join("self");
    who_am_i_from(self_dir.join("cgroup"), self_dir.join("mountinfo"))
}

/// Like [`who_am_i`] with explicit listing paths.
///
/// A listing that does not exist counts as containing no match.
pub fn who_am_i_from(
    cgroup_path: impl AsRef<Path>,
    mountinfo_path: impl AsRef<Path>,
) -> Result<Option<ContainerHandle>> {
    let cgroup_path = cgroup_path.as_ref();
    if let Some(reader) = open_if_exists(cgroup_path)? {
        if let Some(id) = scan_lines(reader, cgroup_path, |line| {
            container_id_from_cgroup_line(line).map(str::to_owned)
        })? {
            log::debug!("resolved container id {id} from `{}`", cgroup_path.display());
            return Ok(ContainerHandle::new(id).ok_log());
        }
    }

    let mountinfo_path = mountinfo_path.as_ref();
    if let Some(reader) = open_if_exists(mountinfo_path)? {
        if let Some(id) = scan_lines(reader, mountinfo_path, |line| {
            let mount = parse_mount_info_line(line)
                .map_err(|err| log::trace!("skipping mountinfo line: {err}"))
                .ok()?;
            container_id_from_mount(&mount).map(str::to_owned)
        })? {
            log::debug!(
                "resolved container id {id} from `{}`",
                mountinfo_path.display()
            );
            return Ok(ContainerHandle::new(id).ok_log());
        }
    }

    log::debug!("no container id found, not running inside a container");
    Ok(None)
}

fn open_if_exists(path: &Path) -> Result<Option<BufReader<File>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("`{}` does not exist", path.display());
            Ok(None)
        }
        Err(source) => Err(Error::FileOpen {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Returns the first value `matcher` produces for a line of `reader`.
fn scan_lines<R, F>(mut reader: R, origin: &Path, matcher: F) -> Result<Option<String>>
where
    R: BufRead,
    F: Fn(&str) -> Option<String>,
{
    let mut line = String::with_capacity(256);

    while reader
        .read_line(&mut line)
        .map_err(|source| Error::ReadLine {
            path: origin.to_path_buf(),
            source,
        })?
        != 0
    {
        log::trace!("{}: {}", origin.display(), line.trim_end());
        if let Some(found) = matcher(&line) {
            return Ok(Some(found));
        }

        line.clear();
    }

    Ok(None)
}
