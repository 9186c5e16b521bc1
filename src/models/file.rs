use std::path::PathBuf;

#[derive(Clone)]
pub struct FileCollectInput {
    pub root_path: PathBuf,
    pub is_single_file: bool,
}

#[derive(Debug)]
pub struct FileCollectOutput {
    pub files: Vec<PathBuf>,
    pub skipped_dirs: u64,
}

#[derive(Debug, Default)]
pub struct ArchiveOutput {
    pub moved: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}
