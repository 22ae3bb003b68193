//! Build judge packages from USACO contest pages
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Contest listing page names, e.g. `dec19results`
    pub contests: Vec<String>,
    /// Problem ids (`cpid`), in the order they get letters
    pub problems: Vec<u32>,
    /// Download missing test archives instead of failing
    pub download: bool,
    /// Fetch every archive of scanned contests before processing problems
    pub prefetch: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Update {
    /// Contest listing was scanned
    ContestScanned { contest: String, problem_count: usize },
    /// Problem descriptor discovered on listing
    ProblemDiscovered {
        problem_id: u32,
        title: String,
        secondary_id: String,
    },
    /// Cached archive is present and valid
    ArchiveCached { path: String },
    /// Cached archive failed validation and was removed
    ArchiveInvalid { path: String },
    /// Archive download started
    Downloading { url: String },
    /// Archive download finished
    Downloaded { url: String },
    /// Contains one warning. May appear multiple times.
    Warning(String),
    /// All work for one problem finished
    ProblemDone {
        problem_id: u32,
        letter_id: String,
        outcome: crate::SimpleFinish,
    },
}
