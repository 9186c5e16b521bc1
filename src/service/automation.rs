use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::process::Command;
use log::{debug, warn};
use tempfile::TempDir;
use crate::models::document::{DocumentKind, SaveFormat};
use crate::models::error::ConvertError;

/// 已開啟文件的代號，只在取得它的主機內有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub path: PathBuf,
}

/// Office 自動化主機：開啟、另存新格式、關閉
pub trait AutomationHost {
    fn open(&mut self, path: &Path) -> Result<DocumentHandle, ConvertError>;
    fn save_as(&mut self, doc: &DocumentHandle, target: &Path, format: SaveFormat) -> Result<(), ConvertError>;
    fn close(&mut self, doc: DocumentHandle) -> Result<(), ConvertError>;
    fn quit(&mut self);
}

/// 依文件類型提供自動化主機，每個檔案取得一次、用完即釋放
pub trait AutomationProvider: Send + Sync {
    /// 啟動主機並關閉所有互動式視窗與警示
    fn acquire(&self, kind: DocumentKind) -> Result<Box<dyn AutomationHost>, ConvertError>;

    fn is_available(&self) -> bool;
}

/// 持有主機，離開作用域時一定呼叫 `quit()`
pub struct HostGuard {
    host: Box<dyn AutomationHost>,
}

impl HostGuard {
    pub fn new(host: Box<dyn AutomationHost>) -> Self {
        HostGuard { host }
    }
}

impl Deref for HostGuard {
    type Target = dyn AutomationHost;

    fn deref(&self) -> &Self::Target {
        self.host.as_ref()
    }
}

impl DerefMut for HostGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.host.as_mut()
    }
}

impl Drop for HostGuard {
    fn drop(&mut self) {
        self.host.quit();
    }
}

pub fn extension_for_format(format: SaveFormat) -> Option<&'static str> {
    match format.0 {
        12 => Some("docx"),
        51 => Some("xlsx"),
        24 => Some("pptx"),
        _ => None,
    }
}

/// 以 headless LibreOffice 充當自動化主機
pub struct SofficeProvider {
    binary: PathBuf,
}

impl SofficeProvider {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        SofficeProvider { binary: binary.into() }
    }

    /// 優先使用指定路徑，否則在 PATH 中尋找 `soffice` 或 `libreoffice`
    pub fn locate(explicit: Option<PathBuf>) -> Option<Self> {
        let binary = match explicit {
            Some(path) => path,
            None => which::which("soffice")
                .or_else(|_| which::which("libreoffice"))
                .ok()?,
        };
        Some(SofficeProvider::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl AutomationProvider for SofficeProvider {
    fn acquire(&self, kind: DocumentKind) -> Result<Box<dyn AutomationHost>, ConvertError> {
        if !self.binary.exists() && which::which(&self.binary).is_err() {
            return Err(ConvertError::HostUnavailable {
                host: kind.host_name(),
                reason: format!("{} not found", self.binary.display()),
            });
        }
        debug!("使用 {} 作為 {} 主機", self.binary.display(), kind.host_name());
        Ok(Box::new(SofficeHost {
            binary: self.binary.clone(),
            kind,
            open: None,
        }))
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

pub struct SofficeHost {
    binary: PathBuf,
    kind: DocumentKind,
    open: Option<PathBuf>,
}

impl AutomationHost for SofficeHost {
    fn open(&mut self, path: &Path) -> Result<DocumentHandle, ConvertError> {
        if !path.is_file() {
            return Err(ConvertError::automation("open", format!("{} is not a file", path.display())));
        }
        let absolute = fs::canonicalize(path)?;
        self.open = Some(absolute.clone());
        Ok(DocumentHandle { path: absolute })
    }

    fn save_as(&mut self, doc: &DocumentHandle, target: &Path, format: SaveFormat) -> Result<(), ConvertError> {
        if self.open.as_ref() != Some(&doc.path) {
            return Err(ConvertError::automation("save", "document is not open in this host"));
        }
        let ext = extension_for_format(format).ok_or_else(|| {
            ConvertError::automation("save", format!("unsupported format code {}", format.0))
        })?;
        if ext != self.kind.modern_extension() {
            return Err(ConvertError::automation(
                "save",
                format!("format code {} does not belong to the {} host", format.0, self.kind.host_name()),
            ));
        }

        // 先輸出到暫存目錄，原地重存時才不會與來源檔衝突
        let out_dir = TempDir::new()?;
        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--norestore")
            .arg("--nolockcheck")
            .arg("--convert-to")
            .arg(ext)
            .arg("--outdir")
            .arg(out_dir.path())
            .arg(&doc.path)
            .output()
            .map_err(|e| ConvertError::automation("save", format!("failed to run {}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::automation("save", stderr.trim().to_string()));
        }

        let stem = doc
            .path
            .file_stem()
            .ok_or_else(|| ConvertError::automation("save", "invalid file name"))?;
        let produced = out_dir.path().join(format!("{}.{}", stem.to_string_lossy(), ext));
        if !produced.is_file() {
            return Err(ConvertError::MissingOutput(produced));
        }
        fs::copy(&produced, target)?;
        Ok(())
    }

    fn close(&mut self, doc: DocumentHandle) -> Result<(), ConvertError> {
        match self.open.take() {
            Some(path) if path == doc.path => Ok(()),
            _ => Err(ConvertError::automation("close", "document is not open in this host")),
        }
    }

    fn quit(&mut self) {
        if let Some(path) = self.open.take() {
            warn!("主機結束時文件仍未關閉：{}", path.display());
        }
    }
}
