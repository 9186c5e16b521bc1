use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use crossbeam_channel::{unbounded, Receiver};
use log::info;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{BatchResult, ConversionRequest};
use crate::models::progress::ProgressEvent;

/// 協作式取消旗標，只在每個檔案開始前檢查
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 執行中轉換的控制代號
pub struct ConversionHandle {
    events: Receiver<ProgressEvent>,
    cancel: CancellationToken,
    join: JoinHandle<BatchResult>,
}

impl ConversionHandle {
    pub fn cancel(&self) {
        info!("已要求取消轉換");
        self.cancel.cancel();
    }

    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// 等待背景執行緒結束並取回結果
    pub fn join(self) -> io::Result<BatchResult> {
        self.join
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "轉換執行緒異常終止"))
    }
}

/// 在背景執行緒開始一次轉換，立即返回
pub fn start_conversion(
    facade: Arc<dyn ConversionFacadeTrait>,
    request: ConversionRequest,
) -> io::Result<ConversionHandle> {
    let (tx, rx) = unbounded();
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    info!(
        "開始轉換，路徑：{}，單一檔案：{}",
        request.root_path.display(),
        request.is_single_file
    );
    let join = thread::Builder::new()
        .name("office-converter".to_string())
        .spawn(move || facade.execute_conversion(&request, &tx, &worker_cancel))?;

    Ok(ConversionHandle {
        events: rx,
        cancel,
        join,
    })
}
