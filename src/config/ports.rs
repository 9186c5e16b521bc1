use std::io;
use std::path::PathBuf;
use crate::models::conversion::BatchResult;

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input: PathBuf,
    pub is_single_file: bool,
    pub archive_base: PathBuf,
    pub soffice: Option<PathBuf>,
    pub no_progress: bool,
    pub max_error_details: usize,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<BatchResult>;
}
