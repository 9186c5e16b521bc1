use std::fs;
use std::io;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use crossbeam_channel::Sender;
use log::{error, info, warn};
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::facade::worker::CancellationToken;
use crate::models::conversion::{BatchResult, ConversionOutcome, ConversionRequest};
use crate::models::document::{classify, Classification, BACKUP_SUFFIX};
use crate::models::error::ConvertError;
use crate::models::file::FileCollectInput;
use crate::models::progress::ProgressEvent;
use crate::service::archive::resolve_destination;
use crate::service::automation::{AutomationProvider, HostGuard};
use crate::service::traits::i_service::{ArchiveServiceTrait, FileServiceTrait};

pub struct ConversionFacade {
    file_service: Box<dyn FileServiceTrait>,
    archive_service: Box<dyn ArchiveServiceTrait>,
    provider: Box<dyn AutomationProvider>,
}

impl ConversionFacade {
    pub fn new(
        file_service: Box<dyn FileServiceTrait>,
        archive_service: Box<dyn ArchiveServiceTrait>,
        provider: Box<dyn AutomationProvider>,
    ) -> Self {
        ConversionFacade {
            file_service,
            archive_service,
            provider,
        }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(
        &self,
        request: &ConversionRequest,
        events: &Sender<ProgressEvent>,
        cancel: &CancellationToken,
    ) -> BatchResult {
        let archive_folder = match self.archive_service.create_archive_folder() {
            Ok(path) => path,
            Err(e) => {
                error!("無法建立封存目錄，備份檔將保留在原位置：{}", e);
                PathBuf::new()
            }
        };
        let mut result = BatchResult::new(archive_folder.clone());

        let files = match self.file_service.collect_files(FileCollectInput {
            root_path: request.root_path.clone(),
            is_single_file: request.is_single_file,
        }) {
            Ok(output) => output.files,
            Err(e) => {
                error!("搜尋檔案失敗：{}，{}", request.root_path.display(), e);
                Vec::new()
            }
        };

        let total = files.len();
        info!("正在處理 {} 個檔案", total);
        let mut backups = Vec::new();

        for (idx, file_path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("使用者取消轉換，剩餘 {} 個檔案未處理", total - idx);
                break;
            }

            let _ = events.send(ProgressEvent::Overall {
                index: idx + 1,
                total,
                path: file_path.clone(),
            });

            let outcome = self.convert_file(file_path, events, &mut backups);
            let file_name = display_name(file_path);
            match &outcome {
                ConversionOutcome::Converted => info!("轉換完成：{}", file_path.display()),
                ConversionOutcome::Skipped => warn!("不支援的檔案類型，跳過：{}", file_path.display()),
                ConversionOutcome::Errored(message) => error!("處理檔案 {} 失敗: {}", file_path.display(), message),
            }
            result.record(&file_name, outcome);
        }

        if !backups.is_empty() {
            if archive_folder.as_os_str().is_empty() {
                warn!("沒有封存目錄，{} 個備份檔保留在原位置", backups.len());
            } else {
                let archived = self.archive_service.archive_backups(&backups, &archive_folder);
                info!(
                    "封存完成：{} 個備份檔已移至 {}，{} 個失敗",
                    archived.moved.len(),
                    archive_folder.display(),
                    archived.failed.len()
                );
            }
        }

        let _ = events.send(ProgressEvent::Finished(result.clone()));
        result
    }
}

impl ConversionFacade {
    /// 轉換單一檔案；成功產生的備份檔路徑會加入 `backups`
    pub fn convert_file(
        &self,
        file_path: &Path,
        events: &Sender<ProgressEvent>,
        backups: &mut Vec<PathBuf>,
    ) -> ConversionOutcome {
        let Some(class) = classify(file_path) else {
            return ConversionOutcome::Skipped;
        };
        match self.try_convert(file_path, class, events) {
            Ok(backup) => {
                backups.extend(backup);
                ConversionOutcome::Converted
            }
            Err(e) => ConversionOutcome::Errored(e.to_string()),
        }
    }

    fn try_convert(
        &self,
        file_path: &Path,
        class: Classification,
        events: &Sender<ProgressEvent>,
    ) -> Result<Option<PathBuf>, ConvertError> {
        let kind = class.kind;
        // 新格式檔案原地重存
        let target = if class.is_legacy {
            file_path.with_extension(kind.modern_extension())
        } else {
            file_path.to_path_buf()
        };

        emit_sub(events, format!("Initializing {}...", kind.host_name()), 10);
        {
            let mut host = HostGuard::new(self.provider.acquire(kind)?);

            emit_sub(events, format!("Opening {}...", display_name(file_path)), 25);
            let doc = host.open(file_path)?;

            emit_sub(events, "Converting to latest format...", 50);
            emit_sub(events, "Saving converted file...", 75);
            let saved = host.save_as(&doc, &target, kind.save_format());
            let closed = host.close(doc);
            saved?;
            closed?;
        }

        if !class.is_legacy || target.as_path() == file_path {
            emit_sub(events, "Completed!", 100);
            return Ok(None);
        }

        emit_sub(events, "Creating backup...", 90);
        let backup = resolve_destination(&backup_path(file_path));
        fs::rename(file_path, &backup)?;

        if !target.is_file() {
            let _ = rollback(&backup, file_path);
            return Err(ConvertError::MissingOutput(target));
        }

        emit_sub(events, "Completed!", 100);
        Ok(Some(backup))
    }
}

/// `report.doc` -> `report.doc.backup`
pub fn backup_path(file_path: &Path) -> PathBuf {
    let mut name: OsString = file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    file_path.with_file_name(name)
}

/// 只嘗試一次；原檔名已被佔用時不覆寫，保留備份檔由使用者手動處理
fn rollback(backup: &Path, original: &Path) -> io::Result<()> {
    let restored = if original.exists() {
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} 已存在", original.display()),
        ))
    } else {
        fs::rename(backup, original)
    };
    match &restored {
        Ok(()) => warn!("轉換未完成，已還原原始檔案：{}", original.display()),
        Err(e) => error!(
            "還原失敗，原始檔案仍位於 {}：{}",
            backup.display(),
            e
        ),
    }
    restored
}

fn emit_sub(events: &Sender<ProgressEvent>, message: impl Into<String>, percent: u8) {
    let _ = events.send(ProgressEvent::Sub {
        message: message.into(),
        percent,
    });
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
