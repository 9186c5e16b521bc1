use clap::Parser;
use directories::{BaseDirs, UserDirs};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "office_converter",
    about = "將舊版 Office 文件（.doc/.xls/.ppt）批次轉換為新版格式",
    long_about = "遞迴搜尋檔案、資料夾或整個磁碟中的 Office 文件，透過 LibreOffice 轉換為 .docx/.xlsx/.pptx。\n舊版原始檔會改名為 .backup，並在批次結束後集中搬移到桌面上以時間戳命名的封存目錄。\n不帶任何參數執行時進入互動模式。",
    arg_required_else_help = true
)]
pub struct Cli {
    pub input: String,
    /// 將 input 視為單一檔案；未指定時依路徑類型判斷
    #[arg(long)]
    pub single_file: Option<bool>,
    /// 封存目錄的上層目錄（預設為桌面）
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
    /// LibreOffice 執行檔路徑（預設在 PATH 中尋找）
    #[arg(long)]
    pub soffice: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value_t = 5)]
    pub max_error_details: usize,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

/// 封存目錄預設放在桌面；沒有桌面時退回家目錄下的 Desktop，再退回目前目錄
pub fn default_archive_base() -> PathBuf {
    if let Some(desktop) = UserDirs::new().and_then(|dirs| dirs.desktop_dir().map(Path::to_path_buf)) {
        return desktop;
    }
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join("Desktop");
    }
    PathBuf::from(".")
}
