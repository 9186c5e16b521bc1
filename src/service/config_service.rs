use std::io;
use std::path::PathBuf;
use crate::config::config::default_archive_base;
use crate::config::ports::{AppConfig, ConfigPort};

pub const DEFAULT_MAX_ERROR_DETAILS: usize = 5;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：只需輸入路徑，其餘使用預設值
pub struct DefaultConfigAdapter {
    input: PathBuf,
}

impl DefaultConfigAdapter {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        DefaultConfigAdapter { input: input.into() }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        if !self.input.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("輸入路徑 '{}' 不存在", self.input.display()),
            ));
        }
        Ok(AppConfig {
            input: self.input.clone(),
            is_single_file: self.input.is_file(),
            archive_base: default_archive_base(),
            soffice: None,
            no_progress: false,
            max_error_details: DEFAULT_MAX_ERROR_DETAILS,
        })
    }
}
