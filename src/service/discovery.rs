use std::io;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use walkdir::WalkDir;
use crate::models::document::{is_backup_file, is_office_file};
use crate::models::file::{FileCollectInput, FileCollectOutput};
use crate::service::traits::i_service::FileServiceTrait;

/// 檔案服務，遞迴搜尋 Office 檔案並實現 FileServiceTrait
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileServiceTrait for FileService {
    fn collect_files(&self, input: FileCollectInput) -> io::Result<FileCollectOutput> {
        if input.is_single_file {
            let files = collect_single(&input.root_path);
            return Ok(FileCollectOutput { files, skipped_dirs: 0 });
        }
        let output = collect_tree(&input.root_path);
        info!(
            "搜尋完成：{}，找到 {} 個 Office 檔案，跳過 {} 個無法存取的目錄",
            input.root_path.display(),
            output.files.len(),
            output.skipped_dirs
        );
        Ok(output)
    }
}

/// 單一檔案模式：不走訪目錄，只檢查副檔名
pub fn collect_single(path: &Path) -> Vec<PathBuf> {
    if is_office_file(path) {
        vec![path.to_path_buf()]
    } else {
        debug!("選取的檔案不是 Office 檔案：{}", path.display());
        Vec::new()
    }
}

/// 遞迴走訪目錄，無法存取的子目錄只略過該子樹
pub fn collect_tree(root: &Path) -> FileCollectOutput {
    let entries = WalkDir::new(root).into_iter().map(|entry| match entry {
        Ok(entry) => Ok(entry.into_path()),
        Err(e) => {
            let location = e.path().map(Path::to_path_buf).unwrap_or_default();
            Err((location, io::Error::from(e)))
        }
    });
    gather(entries)
}

/// 篩選走訪結果；錯誤只計入略過數，不中斷其餘項目
fn gather<I>(entries: I) -> FileCollectOutput
where
    I: IntoIterator<Item = Result<PathBuf, (PathBuf, io::Error)>>,
{
    let mut files = Vec::new();
    let mut skipped_dirs = 0;

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err((location, e)) => {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    warn!("權限不足，跳過目錄：{}", location.display());
                } else {
                    warn!("無法讀取 {}，跳過：{}", location.display(), e);
                }
                skipped_dirs += 1;
                continue;
            }
        };

        // is_file 會跟隨符號連結，指向一般檔案的連結也算在內
        if path.is_file() && is_office_file(&path) && !is_backup_file(&path) {
            files.push(path);
        }
    }

    FileCollectOutput { files, skipped_dirs }
}
