use std::path::PathBuf;

/// Progress events emitted by [`crate::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertProgress {
    /// Clearing the output directory
    PreparingOutput { path: PathBuf },
    /// Checking whether the source image is already present
    CheckingImage { path: PathBuf },
    /// Streaming the source image; `bytes_total` is 0 when the server sent no length
    Downloading { bytes_done: u64, bytes_total: u64 },
    /// The source image is present and complete
    ImageReady { downloaded: bool },
    /// Archive enumeration finished
    ArchivesFound { count: usize },
    /// Extracting one archive (1-based `index`)
    Extracting {
        archive: String,
        index: usize,
        total: usize,
    },
    /// An extracted archive got its final name
    Named { archive: String, name: String },
    /// Moving the games of one bucket into place
    Placing { bucket: String, games: usize },
    /// Removing the scratch directory
    CleaningUp,
    /// Finished
    Done,
}
