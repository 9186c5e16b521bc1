use std::io;
use std::path::{Path, PathBuf};
use crate::models::file::{ArchiveOutput, FileCollectInput, FileCollectOutput};

// File 服務接口，負責搜尋可轉換的 Office 檔案
pub trait FileServiceTrait: Send + Sync {
    /// 收集符合條件的檔案
    /// # 參數
    /// - input: 根路徑與是否為單一檔案模式
    /// # 回傳
    /// - 成功時返回檔案列表與略過的目錄數，失敗時返回 IO 錯誤
    fn collect_files(&self, input: FileCollectInput) -> io::Result<FileCollectOutput>;
}

// Archive 服務接口，負責建立封存目錄並搬移備份檔
pub trait ArchiveServiceTrait: Send + Sync {
    /// 建立本次執行專用、以時間戳命名的封存目錄
    fn create_archive_folder(&self) -> io::Result<PathBuf>;

    /// 將備份檔搬入封存目錄，單一檔案失敗時略過並繼續
    fn archive_backups(&self, backups: &[PathBuf], archive_folder: &Path) -> ArchiveOutput;
}
