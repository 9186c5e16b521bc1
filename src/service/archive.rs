use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use chrono::Local;
use log::{info, warn};
use crate::models::file::ArchiveOutput;
use crate::service::traits::i_service::ArchiveServiceTrait;

const ARCHIVE_PREFIX: &str = "Office_Archive_";

/// 封存服務，負責把每次執行產生的備份檔集中到同一個目錄
pub struct ArchiveService {
    base_dir: PathBuf,
}

impl ArchiveService {
    /// # 參數
    /// - base_dir: 封存目錄的上層目錄（預設為使用者桌面）
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        ArchiveService { base_dir: base_dir.into() }
    }
}

impl ArchiveServiceTrait for ArchiveService {
    fn create_archive_folder(&self) -> io::Result<PathBuf> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = create_unique_dir(&self.base_dir, &format!("{}{}", ARCHIVE_PREFIX, timestamp))?;
        info!("建立封存目錄：{}", path.display());
        Ok(path)
    }

    fn archive_backups(&self, backups: &[PathBuf], archive_folder: &Path) -> ArchiveOutput {
        let mut output = ArchiveOutput::default();
        for backup in backups {
            if !backup.exists() {
                continue;
            }
            match archive_one(backup, archive_folder) {
                Ok(dest) => {
                    info!("已封存 {} -> {}", backup.display(), dest.display());
                    output.moved.push(dest);
                }
                Err(e) => {
                    warn!("無法封存 {}，保留於原位置：{}", backup.display(), e);
                    output.failed.push(backup.clone());
                }
            }
        }
        output
    }
}

/// 同一秒內的多次執行不可共用目錄，必要時加上 `_1`、`_2`…
///
/// 以 `create_dir` 佔用名稱，已存在就換下一個，兩個程序不會拿到同一個目錄
fn create_unique_dir(base_dir: &Path, name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(base_dir)?;
    let mut candidate = base_dir.join(name);
    let mut counter = 0;
    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                counter += 1;
                candidate = base_dir.join(format!("{}_{}", name, counter));
            }
            Err(e) => return Err(e),
        }
    }
}

fn archive_one(backup: &Path, archive_folder: &Path) -> io::Result<PathBuf> {
    let file_name = backup.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("無效的檔案路徑：{}", backup.display()))
    })?;

    // 以上層目錄名稱分組，避免不同資料夾的同名檔案互相衝突
    let dest_dir = match backup.parent().and_then(|p| p.file_name()) {
        Some(parent_name) => archive_folder.join(parent_name),
        None => archive_folder.to_path_buf(),
    };
    fs::create_dir_all(&dest_dir)?;

    let dest = resolve_destination(&dest_dir.join(file_name));
    move_file(backup, &dest)?;
    Ok(dest)
}

/// 目的地已存在時在主檔名後加上遞增編號：`name_1.ext`、`name_2.ext`…
pub fn resolve_destination(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }
    let parent = dest.parent().unwrap_or_else(|| Path::new(""));
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = dest
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, suffix));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 先嘗試 rename，跨磁碟時改為複製後刪除
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !from.is_file() {
                return Err(rename_err);
            }
            copy_then_remove(from, to, |from, to| fs::copy(from, to))
        }
    }
}

fn copy_then_remove<F>(from: &Path, to: &Path, copy: F) -> io::Result<()>
where
    F: Fn(&Path, &Path) -> io::Result<u64>,
{
    let occupied = to.exists();
    if let Err(e) = copy(from, to) {
        // 只清掉這次寫出的殘缺檔案
        if !occupied {
            let _ = fs::remove_file(to);
        }
        return Err(e);
    }
    if let Err(e) = fs::remove_file(from) {
        // 原檔仍在，移除複本以免同一備份出現兩份
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
