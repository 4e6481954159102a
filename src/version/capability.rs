use super::EngineVersion;

/// Optional engine features gated on the engine release that introduced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `docker run --label` and `docker ps --filter label=...`.
    ContainerLabels,
    /// `.Mounts` in `docker inspect`; older engines only expose `.Volumes`.
    MountsInspection,
}

static CONTAINER_LABELS_SINCE: EngineVersion = EngineVersion::new(1, 6, 0);
static MOUNTS_INSPECTION_SINCE: EngineVersion = EngineVersion::new(1, 8, 0);

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::ContainerLabels, Capability::MountsInspection];

    /// The first engine release that supports this capability.
    pub fn minimum_version(self) -> &'static EngineVersion {
        match self {
            Capability::ContainerLabels => &CONTAINER_LABELS_SINCE,
            Capability::MountsInspection => &MOUNTS_INSPECTION_SINCE,
        }
    }

    /// Returns whether an engine of the given version supports this capability.
    ///
    /// An unknown version is treated as the oldest possible engine.
    pub fn is_supported_by(self, version: Option<&EngineVersion>) -> bool {
        match version {
            Some(version) => !version.is_older_than(self.minimum_version()),
            None => false,
        }
    }
}
