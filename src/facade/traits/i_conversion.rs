use crossbeam_channel::Sender;
use crate::facade::worker::CancellationToken;
use crate::models::conversion::{BatchResult, ConversionRequest};
use crate::models::progress::ProgressEvent;

// Facade 接口，負責協調搜尋、轉換與封存流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 執行一次完整的轉換批次
    /// # 參數
    /// - request: 根路徑與是否為單一檔案
    /// - events: 進度事件的送出端，接收端關閉時事件直接丟棄
    /// - cancel: 每個檔案開始前檢查的取消旗標
    /// # 回傳
    /// - 批次結果；單一檔案或封存失敗都不會中止整個批次
    fn execute_conversion(
        &self,
        request: &ConversionRequest,
        events: &Sender<ProgressEvent>,
        cancel: &CancellationToken,
    ) -> BatchResult;
}
