use std::io;
use std::sync::Arc;
use log::{info, warn};
use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::facade::worker::start_conversion;
use crate::models::conversion::{BatchResult, ConversionRequest};
use crate::service::archive::ArchiveService;
use crate::service::automation::{AutomationProvider, SofficeProvider};
use crate::service::discovery::FileService;
use crate::utils::utils::ProgressManager;

/// 依配置組裝服務、在背景執行轉換並在終端顯示進度
pub struct ConversionAdapter;

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<BatchResult> {
        let provider = SofficeProvider::locate(config.soffice.clone()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "找不到 LibreOffice（soffice），請安裝後再試，或以 --soffice 指定路徑",
            )
        })?;
        if !provider.is_available() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("無法執行 {}，請確認 LibreOffice 已正確安裝", provider.binary().display()),
            ));
        }
        info!("使用 LibreOffice：{}", provider.binary().display());

        let facade: Arc<dyn ConversionFacadeTrait> = Arc::new(ConversionFacade::new(
            Box::new(FileService::new()),
            Box::new(ArchiveService::new(config.archive_base.clone())),
            Box::new(provider),
        ));
        run_with_progress(facade, &config)
    }
}

/// 消費背景執行緒的事件直到批次結束
pub fn run_with_progress(
    facade: Arc<dyn ConversionFacadeTrait>,
    config: &AppConfig,
) -> io::Result<BatchResult> {
    let request = ConversionRequest::new(config.input.clone(), config.is_single_file);
    let handle = start_conversion(facade, request)?;
    let mut progress = ProgressManager::new(config.no_progress);

    // 工作執行緒結束時送出端隨之關閉，迴圈自然結束
    for event in handle.events().iter() {
        progress.handle(&event);
    }

    let result = handle.join()?;
    if result.errors > 0 {
        warn!("轉換完成，但有 {} 個檔案失敗", result.errors);
    }
    Ok(result)
}
