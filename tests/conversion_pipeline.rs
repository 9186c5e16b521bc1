use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver};
use office_converter::facade::conversion_facade::ConversionFacade;
use office_converter::facade::traits::i_conversion::ConversionFacadeTrait;
use office_converter::facade::worker::{start_conversion, CancellationToken};
use office_converter::models::conversion::{BatchResult, ConversionRequest};
use office_converter::models::document::{DocumentKind, SaveFormat};
use office_converter::models::error::ConvertError;
use office_converter::models::progress::ProgressEvent;
use office_converter::service::archive::ArchiveService;
use office_converter::service::automation::{AutomationHost, AutomationProvider, DocumentHandle};
use office_converter::service::discovery::FileService;
use tempfile::TempDir;

#[derive(Default)]
struct FakeState {
    fail_on: HashSet<String>,
    write_nothing_on: HashSet<String>,
    cancel_on_save: Option<(usize, CancellationToken)>,
    save_gate: Option<Receiver<()>>,
    saves: AtomicUsize,
    acquired: AtomicUsize,
    quit: AtomicUsize,
    saved_formats: Mutex<Vec<(DocumentKind, SaveFormat)>>,
}

struct FakeProvider(Arc<FakeState>);

struct FakeHost {
    state: Arc<FakeState>,
    kind: DocumentKind,
}

impl AutomationProvider for FakeProvider {
    fn acquire(&self, kind: DocumentKind) -> Result<Box<dyn AutomationHost>, ConvertError> {
        self.0.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeHost { state: self.0.clone(), kind }))
    }

    fn is_available(&self) -> bool {
        true
    }
}

impl AutomationHost for FakeHost {
    fn open(&mut self, path: &Path) -> Result<DocumentHandle, ConvertError> {
        if !path.is_file() {
            return Err(ConvertError::automation("open", "no such document"));
        }
        Ok(DocumentHandle { path: path.to_path_buf() })
    }

    fn save_as(&mut self, doc: &DocumentHandle, target: &Path, format: SaveFormat) -> Result<(), ConvertError> {
        if let Some(gate) = &self.state.save_gate {
            let _ = gate.recv();
        }
        let count = self.state.saves.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, token)) = &self.state.cancel_on_save {
            if *n == count {
                token.cancel();
            }
        }
        self.state.saved_formats.lock().unwrap().push((self.kind, format));

        let name = doc.path.file_name().unwrap().to_string_lossy().to_string();
        if self.state.fail_on.contains(&name) {
            return Err(ConvertError::automation("save", "document is corrupt"));
        }
        if self.state.write_nothing_on.contains(&name) {
            return Ok(());
        }
        let mut content = b"converted:".to_vec();
        content.extend(fs::read(&doc.path)?);
        fs::write(target, content)?;
        Ok(())
    }

    fn close(&mut self, _doc: DocumentHandle) -> Result<(), ConvertError> {
        Ok(())
    }

    fn quit(&mut self) {
        self.state.quit.fetch_add(1, Ordering::SeqCst);
    }
}

struct Fixture {
    _tmp: TempDir,
    source: PathBuf,
    desktop: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let desktop = tmp.path().join("desktop");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&desktop).unwrap();
        Fixture { _tmp: tmp, source, desktop }
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.source.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn facade(&self, state: Arc<FakeState>) -> ConversionFacade {
        ConversionFacade::new(
            Box::new(FileService::new()),
            Box::new(ArchiveService::new(&self.desktop)),
            Box::new(FakeProvider(state)),
        )
    }

    fn run(&self, state: Arc<FakeState>, request: ConversionRequest) -> (BatchResult, Vec<ProgressEvent>) {
        let facade: Arc<dyn ConversionFacadeTrait> = Arc::new(self.facade(state));
        let handle = start_conversion(facade, request).unwrap();
        let events: Vec<ProgressEvent> = handle.events().iter().collect();
        let result = handle.join().unwrap();
        (result, events)
    }
}

#[test]
fn legacy_file_is_converted_and_backup_archived() {
    let fx = Fixture::new();
    let original = fx.write("docs/report.doc", "legacy bytes");
    let state = Arc::new(FakeState::default());

    let (result, _) = fx.run(state.clone(), ConversionRequest::new(&fx.source, false));

    assert_eq!(result.converted, 1);
    assert_eq!(result.errors, 0);
    assert!(!original.exists());
    let converted = fx.source.join("docs/report.docx");
    assert_eq!(fs::read_to_string(converted).unwrap(), "converted:legacy bytes");

    assert!(result.archive_folder.starts_with(&fx.desktop));
    let archived = result.archive_folder.join("docs/report.doc.backup");
    assert_eq!(fs::read_to_string(archived).unwrap(), "legacy bytes");
    assert!(!fx.source.join("docs/report.doc.backup").exists());

    assert_eq!(state.acquired.load(Ordering::SeqCst), 1);
    assert_eq!(state.quit.load(Ordering::SeqCst), 1);
    assert_eq!(
        *state.saved_formats.lock().unwrap(),
        vec![(DocumentKind::WordProcessor, SaveFormat(12))]
    );
}

#[test]
fn modern_file_is_resaved_in_place_without_backup() {
    let fx = Fixture::new();
    let deck = fx.write("slides.pptx", "deck");
    let state = Arc::new(FakeState::default());

    let (result, events) = fx.run(state, ConversionRequest::new(&deck, true));

    assert_eq!(result.converted, 1);
    assert_eq!(fs::read_to_string(&deck).unwrap(), "converted:deck");
    assert!(result.archive_folder.is_dir());
    assert_eq!(fs::read_dir(&result.archive_folder).unwrap().count(), 0);

    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Sub { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![10, 25, 50, 75, 100]);
}

#[test]
fn one_failing_file_does_not_stop_the_batch() {
    let fx = Fixture::new();
    for name in ["a.doc", "b.xls", "c.ppt", "d.docx"] {
        fx.write(name, name);
    }
    let bad = fx.write("bad.doc", "keep me");
    let state = Arc::new(FakeState {
        fail_on: ["bad.doc".to_string()].into_iter().collect(),
        ..Default::default()
    });

    let (result, _) = fx.run(state.clone(), ConversionRequest::new(&fx.source, false));

    assert_eq!(result.converted, 4);
    assert_eq!(result.errors, 1);
    assert_eq!(result.error_details.len(), 1);
    assert!(result.error_details[0].starts_with("bad.doc: "));
    assert!(result.error_details[0].contains("document is corrupt"));

    assert_eq!(fs::read_to_string(&bad).unwrap(), "keep me");
    assert!(!fx.source.join("bad.docx").exists());
    assert_eq!(state.acquired.load(Ordering::SeqCst), 5);
    assert_eq!(state.quit.load(Ordering::SeqCst), 5);
}

#[test]
fn missing_output_rolls_back_the_backup() {
    let fx = Fixture::new();
    let original = fx.write("budget.xls", "numbers");
    let state = Arc::new(FakeState {
        write_nothing_on: ["budget.xls".to_string()].into_iter().collect(),
        ..Default::default()
    });

    let (result, _) = fx.run(state, ConversionRequest::new(&fx.source, false));

    assert_eq!(result.converted, 0);
    assert_eq!(result.errors, 1);
    assert_eq!(fs::read_to_string(&original).unwrap(), "numbers");
    assert!(!fx.source.join("budget.xls.backup").exists());
    assert_eq!(fs::read_dir(&result.archive_folder).unwrap().count(), 0);
}

#[test]
fn cancellation_stops_before_the_next_file() {
    let fx = Fixture::new();
    for i in 0..10 {
        fx.write(&format!("file{}.doc", i), "x");
    }
    let token = CancellationToken::new();
    let state = Arc::new(FakeState {
        cancel_on_save: Some((3, token.clone())),
        ..Default::default()
    });
    let facade = fx.facade(state);
    let (tx, rx) = unbounded();

    let result = facade.execute_conversion(&ConversionRequest::new(&fx.source, false), &tx, &token);
    drop(tx);

    assert_eq!(result.processed(), 3);
    assert_eq!(result.converted, 3);

    let mut converted = 0;
    let mut untouched = 0;
    for i in 0..10 {
        let doc = fx.source.join(format!("file{}.doc", i));
        let docx = fx.source.join(format!("file{}.docx", i));
        if docx.exists() {
            assert!(!doc.exists());
            converted += 1;
        } else {
            assert_eq!(fs::read_to_string(&doc).unwrap(), "x");
            untouched += 1;
        }
    }
    assert_eq!((converted, untouched), (3, 7));

    let overall = rx
        .try_iter()
        .filter(|e| matches!(e, ProgressEvent::Overall { .. }))
        .count();
    assert_eq!(overall, 3);
}

#[test]
fn cancel_from_handle_lets_current_file_finish() {
    let fx = Fixture::new();
    for name in ["a.doc", "b.doc", "c.doc"] {
        fx.write(name, name);
    }
    let (release, gate) = unbounded();
    let state = Arc::new(FakeState {
        save_gate: Some(gate),
        ..Default::default()
    });
    let facade: Arc<dyn ConversionFacadeTrait> = Arc::new(fx.facade(state.clone()));
    let handle = start_conversion(facade, ConversionRequest::new(&fx.source, false)).unwrap();

    // 第一個檔案卡在儲存步驟時取消，再放行
    let mut release = Some(release);
    let mut overall = 0;
    for event in handle.events().iter() {
        if let ProgressEvent::Overall { total, .. } = event {
            assert_eq!(total, 3);
            overall += 1;
            if let Some(release) = release.take() {
                handle.cancel();
                release.send(()).unwrap();
            }
        }
    }
    let result = handle.join().unwrap();

    assert_eq!(overall, 1);
    assert_eq!(result.processed(), 1);
    assert_eq!(result.converted, 1);
    assert_eq!(state.saves.load(Ordering::SeqCst), 1);

    let docx = ["a", "b", "c"]
        .iter()
        .filter(|stem| fx.source.join(format!("{}.docx", stem)).exists())
        .count();
    let untouched = ["a", "b", "c"]
        .iter()
        .filter(|stem| fx.source.join(format!("{}.doc", stem)).exists())
        .count();
    assert_eq!((docx, untouched), (1, 2));
    let archived = fs::read_dir(result.archive_folder.join("source")).unwrap().count();
    assert_eq!(archived, 1);
}

#[test]
fn cancelled_run_processes_nothing() {
    let fx = Fixture::new();
    let doc = fx.write("a.doc", "x");
    let facade = fx.facade(Arc::new(FakeState::default()));
    let token = CancellationToken::new();
    token.cancel();
    let (tx, _rx) = unbounded();

    let result = facade.execute_conversion(&ConversionRequest::new(&fx.source, false), &tx, &token);

    assert_eq!(result.processed(), 0);
    assert!(doc.exists());
    assert!(result.archive_folder.is_dir());
}

#[test]
fn progress_events_are_ordered() {
    let fx = Fixture::new();
    for name in ["one.doc", "two.xlsx", "three.ppt", "nested/four.xls"] {
        fx.write(name, name);
    }
    let state = Arc::new(FakeState::default());

    let (result, events) = fx.run(state, ConversionRequest::new(&fx.source, false));
    assert_eq!(result.converted, 4);

    assert!(matches!(events.last(), Some(ProgressEvent::Finished(r)) if *r == result));
    let finished = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Finished(_)))
        .count();
    assert_eq!(finished, 1);

    let mut last_index = 0;
    let mut last_percent = 0;
    for event in &events {
        match event {
            ProgressEvent::Overall { index, total, .. } => {
                assert_eq!(*index, last_index + 1);
                assert!(*index <= *total);
                assert_eq!(*total, 4);
                last_index = *index;
                last_percent = 0;
            }
            ProgressEvent::Sub { percent, .. } => {
                assert!(last_index > 0);
                assert!(*percent >= last_percent);
                last_percent = *percent;
            }
            ProgressEvent::Finished(_) => {}
        }
    }
    assert_eq!(last_index, 4);
}

#[test]
fn single_file_mode_ignores_unrecognized_extension() {
    let fx = Fixture::new();
    let notes = fx.write("notes.txt", "plain");
    fx.write("sibling.doc", "should stay");
    let state = Arc::new(FakeState::default());

    let (result, events) = fx.run(state.clone(), ConversionRequest::new(&notes, true));

    assert_eq!(result.processed(), 0);
    assert_eq!(events.len(), 1);
    assert!(fx.source.join("sibling.doc").exists());
    assert_eq!(state.acquired.load(Ordering::SeqCst), 0);
}

#[test]
fn backups_from_same_named_folders_do_not_collide() {
    let fx = Fixture::new();
    fx.write("north/docs/plan.doc", "north");
    fx.write("south/docs/plan.doc", "south");
    let state = Arc::new(FakeState::default());

    let (result, _) = fx.run(state, ConversionRequest::new(&fx.source, false));

    assert_eq!(result.converted, 2);
    let archive_docs = result.archive_folder.join("docs");
    let mut contents: Vec<String> = fs::read_dir(&archive_docs)
        .unwrap()
        .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["north".to_string(), "south".to_string()]);
    assert!(archive_docs.join("plan.doc.backup").exists());
    assert!(archive_docs.join("plan.doc_1.backup").exists());
}

#[test]
fn existing_backups_are_not_rediscovered() {
    let fx = Fixture::new();
    let stale = fx.write("old.doc.backup", "stale");
    let state = Arc::new(FakeState::default());

    let (result, _) = fx.run(state.clone(), ConversionRequest::new(&fx.source, false));

    assert_eq!(result.processed(), 0);
    assert!(stale.exists());
    assert_eq!(state.acquired.load(Ordering::SeqCst), 0);
}
