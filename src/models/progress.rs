use std::path::PathBuf;
use crate::models::conversion::BatchResult;

/// 背景工作執行緒送往呼叫端的事件
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// 即將處理第 `index` 個檔案（從 1 起算）
    Overall { index: usize, total: usize, path: PathBuf },
    /// 單一檔案內部的進度（0-100）
    Sub { message: String, percent: u8 },
    Finished(BatchResult),
}
