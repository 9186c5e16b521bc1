use std::path::Path;

/// 備份檔案的後綴，附加在原始完整檔名之後（例如 `report.doc.backup`）
pub const BACKUP_SUFFIX: &str = ".backup";

/// 可辨識的 Office 副檔名（不分大小寫）
pub const OFFICE_EXTENSIONS: [&str; 6] = ["doc", "docx", "xls", "xlsx", "ppt", "pptx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    WordProcessor,
    Spreadsheet,
    Presentation,
}

/// 自動化主機 `save_as` 使用的格式代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveFormat(pub i32);

impl DocumentKind {
    pub fn host_name(&self) -> &'static str {
        match self {
            DocumentKind::WordProcessor => "word processor",
            DocumentKind::Spreadsheet => "spreadsheet",
            DocumentKind::Presentation => "presentation",
        }
    }

    pub fn modern_extension(&self) -> &'static str {
        match self {
            DocumentKind::WordProcessor => "docx",
            DocumentKind::Spreadsheet => "xlsx",
            DocumentKind::Presentation => "pptx",
        }
    }

    pub fn save_format(&self) -> SaveFormat {
        match self {
            DocumentKind::WordProcessor => SaveFormat(12),
            DocumentKind::Spreadsheet => SaveFormat(51),
            DocumentKind::Presentation => SaveFormat(24),
        }
    }
}

/// 檔案分類結果：文件類型與是否為舊版格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: DocumentKind,
    pub is_legacy: bool,
}

/// 依副檔名分類，非 Office 檔案回傳 None
pub fn classify(path: &Path) -> Option<Classification> {
    let ext = lowercase_extension(path)?;
    let (kind, is_legacy) = match ext.as_str() {
        "doc" => (DocumentKind::WordProcessor, true),
        "docx" => (DocumentKind::WordProcessor, false),
        "xls" => (DocumentKind::Spreadsheet, true),
        "xlsx" => (DocumentKind::Spreadsheet, false),
        "ppt" => (DocumentKind::Presentation, true),
        "pptx" => (DocumentKind::Presentation, false),
        _ => return None,
    };
    Some(Classification { kind, is_legacy })
}

pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

pub fn is_office_file(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| OFFICE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_backup_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(BACKUP_SUFFIX))
        .unwrap_or(false)
}
