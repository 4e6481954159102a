//! Self-identification of the container the current process runs in.
//!
//! The container id is read from the process's cgroup membership listing
//! and, on hosts where that listing carries no id, from the engine-managed
//! bind mounts in its mountinfo.
pub mod cgroup;
mod error;
pub mod mountinfo;
mod resolve;

pub use cgroup::{
    CGROUP_RULES, CgroupLine, CgroupLineError, container_id_from_cgroup_line,
    container_id_from_cgroup_path, parse_cgroup_line,
};
pub use error::{Error, Result};
pub use resolve::{who_am_i, who_am_i_from};
