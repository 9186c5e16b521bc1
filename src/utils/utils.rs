use std::io;
use std::path::Path;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use log;
use crate::models::conversion::BatchResult;
use crate::models::progress::ProgressEvent;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

/// 批次整體百分比：`floor(((i-1)/n)*100 + (p/100)*(100/n))`
/// # 參數
/// - sub_percent: 目前檔案內部進度（0-100）
/// - index: 目前檔案序號（從 1 起算）
/// - total: 檔案總數
pub fn combined_percentage(sub_percent: u8, index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let index = index.clamp(1, total);
    let sub = usize::from(sub_percent.min(100));
    let value = (100 * (index - 1) + sub) / total;
    value.min(100) as u8
}

/// 只保留前 `limit` 筆錯誤，其餘以一行摘要表示
pub fn truncate_error_details(details: &[String], limit: usize) -> Vec<String> {
    let mut shown: Vec<String> = details.iter().take(limit).cloned().collect();
    if details.len() > limit {
        shown.push(format!("... and {} more errors", details.len() - limit));
    }
    shown
}

pub fn summarize(result: &BatchResult, error_limit: usize) -> String {
    let mut message = String::from("Conversion Complete!\n\n");
    message += &format!("Files converted: {}\n", result.converted);
    message += &format!("Files skipped: {}\n", result.skipped);
    message += &format!("Errors: {}\n", result.errors);

    if !result.error_details.is_empty() {
        message += "\nError details:\n";
        for line in truncate_error_details(&result.error_details, error_limit) {
            message += &format!("  - {}\n", line);
        }
    }

    if result.archive_folder.as_os_str().is_empty() {
        message += "\nBackup files (.backup) were left next to the originals.\n";
    } else {
        message += &format!(
            "\nBackup files (.backup) have been moved to:\n{}\n",
            result.archive_folder.display()
        );
    }
    message
}

/// 以 indicatif 顯示轉換進度，長度固定為 100（百分比）
pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
    current: usize,
    total: usize,
}

impl ProgressManager {
    pub fn new(no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}% ETA: {eta_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
            current: 0,
            total: 0,
        }
    }

    pub fn handle(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Overall { index, total, path } => {
                self.current = *index;
                self.total = *total;
                self.update_file(path);
            }
            ProgressEvent::Sub { message, percent } => {
                if self.no_progress {
                    return;
                }
                let overall = combined_percentage(*percent, self.current, self.total);
                self.pb.set_position(u64::from(overall));
                self.pb.set_message(format!(
                    "[{}/{}] {} ({}%)",
                    self.current, self.total, message, percent
                ));
            }
            ProgressEvent::Finished(result) => self.finish(result),
        }
    }

    fn update_file(&self, path: &Path) {
        if self.no_progress {
            return;
        }
        let overall = combined_percentage(0, self.current, self.total);
        self.pb.set_position(u64::from(overall));
        self.pb.set_message(format!(
            "處理檔案 {}/{}：{}",
            self.current,
            self.total,
            path.display()
        ));
    }

    fn finish(&self, result: &BatchResult) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        self.pb.finish_with_message(format!(
            "完成，轉換 {} 個，跳過 {} 個，錯誤 {} 個，耗時 {:.1} 秒",
            result.converted, result.skipped, result.errors, elapsed
        ));
    }
}
