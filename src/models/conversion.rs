use std::path::PathBuf;

/// 一次轉換執行的輸入，建立後不再變更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub root_path: PathBuf,
    pub is_single_file: bool,
}

impl ConversionRequest {
    pub fn new(root_path: impl Into<PathBuf>, is_single_file: bool) -> Self {
        ConversionRequest {
            root_path: root_path.into(),
            is_single_file,
        }
    }
}

/// 單一檔案的處理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted,
    Skipped,
    Errored(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub converted: usize,
    pub skipped: usize,
    pub errors: usize,
    pub error_details: Vec<String>,
    pub archive_folder: PathBuf,
}

impl BatchResult {
    pub fn new(archive_folder: PathBuf) -> Self {
        BatchResult {
            archive_folder,
            ..Default::default()
        }
    }

    /// 累計單一檔案結果，錯誤會以「檔名: 訊息」記錄
    pub fn record(&mut self, file_name: &str, outcome: ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted => self.converted += 1,
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::Errored(message) => {
                self.errors += 1;
                self.error_details.push(format!("{}: {}", file_name, message));
            }
        }
    }

    pub fn processed(&self) -> usize {
        self.converted + self.skipped + self.errors
    }
}
