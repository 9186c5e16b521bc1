use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ports::ConversionPort;
use crate::models::document::is_office_file;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::{setup_logging, summarize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Folder,
    Drive,
}

pub fn process_interactive_mode() -> io::Result<String> {
    setup_logging("info")?;
    println!("=== Office 文件轉換：互動模式 ===");
    println!("舊版原始檔會自動備份，並在完成後移至桌面上的封存目錄。");

    let target = get_target_kind()?;
    let input = match target {
        TargetKind::File => get_file_path()?,
        TargetKind::Folder => get_folder_path()?,
        TargetKind::Drive => match get_drive()? {
            Some(drive) => drive,
            None => return Ok("已取消".to_string()),
        },
    };

    // 檔案以單一檔案模式處理，資料夾與磁碟則遞迴搜尋
    let config_service = ConfigService::new(Box::new(DefaultConfigAdapter::new(input)));
    let config = config_service.get_config()?;

    let result = ConversionAdapter.execute(config.clone())?;
    Ok(summarize(&result, config.max_error_details))
}

pub fn get_target_kind() -> io::Result<TargetKind> {
    let choice = Select::new()
        .with_prompt("要轉換什麼？（使用方向鍵選擇，按 Enter 確認）")
        .items(&["單一檔案", "資料夾", "整個磁碟"])
        .default(1)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("轉換目標選擇失敗: {}", e)))?;
    Ok(match choice {
        0 => TargetKind::File,
        1 => TargetKind::Folder,
        _ => TargetKind::Drive,
    })
}

pub fn get_file_path() -> io::Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("請輸入 Office 檔案路徑（.doc .docx .xls .xlsx .ppt .pptx）")
        .validate_with(|input: &String| -> Result<(), String> {
            let path = Path::new(input);
            if !path.is_file() {
                Err(format!("檔案 '{}' 不存在", input))
            } else if !is_office_file(path) {
                Err(format!("'{}' 不是 Office 檔案", input))
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(PathBuf::from(input))
}

pub fn get_folder_path() -> io::Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("請輸入資料夾路徑")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input).is_dir() { Ok(()) } else { Err(format!("資料夾 '{}' 不存在", input)) }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(PathBuf::from(input))
}

/// 選擇磁碟並確認；使用者取消時回傳 None
pub fn get_drive() -> io::Result<Option<PathBuf>> {
    let drives = available_drives();
    if drives.is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "找不到可存取的磁碟"));
    }
    let labels: Vec<String> = drives.iter().map(|d| d.display().to_string()).collect();
    let choice = Select::new()
        .with_prompt("選擇要轉換的磁碟")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("磁碟選擇失敗: {}", e)))?;

    let confirmed = Confirm::new()
        .with_prompt(format!("轉換整個 {} 可能需要很長時間，確定要繼續嗎？", labels[choice]))
        .default(false)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("確認失敗: {}", e)))?;

    Ok(confirmed.then(|| drives[choice].clone()))
}

pub fn available_drives() -> Vec<PathBuf> {
    if cfg!(windows) {
        ('A'..='Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter)))
            .filter(|drive| drive.exists())
            .collect()
    } else {
        vec![PathBuf::from("/")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_drives_all_exist() {
        let drives = available_drives();
        assert!(!drives.is_empty());
        assert!(drives.iter().all(|d| d.exists()));
    }
}
