//! High-level API for bytepatch operations

use crate::exit_codes::{EXIT_SUCCESS, exit_code_for};
use crate::patch::{FilePatcher, PatchOutcome, PatchRequest, Platform};
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use log::debug;

/// How the outcome is presented to the operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// Options controlling a patch run
#[derive(Debug, Default)]
pub struct PatchOptions {
    /// Output format for the final message
    pub format: ReportFormat,
    /// Show the final message in a native dialog (Windows only)
    pub dialog: bool,
}

/// Apply a patch to the real filesystem
pub fn apply_patch(request: &PatchRequest) -> PatchOutcome {
    FilePatcher::new().apply(request)
}

/// Pick the reporter for `options`
pub fn reporter_for(options: &PatchOptions) -> Box<dyn Reporter> {
    if options.dialog {
        #[cfg(target_os = "windows")]
        {
            return Box::new(crate::report::DialogReporter);
        }
        #[cfg(not(target_os = "windows"))]
        log::warn!("Dialog reporting is only available on Windows, using the console");
    }

    match options.format {
        ReportFormat::Text => Box::new(ConsoleReporter),
        ReportFormat::Json => Box::new(JsonReporter),
    }
}

/// Apply `request` with `patcher`, report the outcome once, and return the exit code
pub fn run_with<P: Platform>(
    patcher: &FilePatcher<P>,
    request: &PatchRequest,
    reporter: &dyn Reporter,
) -> i32 {
    let outcome = patcher.apply(request);

    let code = match &outcome {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            debug!("Patch failed [{}]: {}", e.kind_name(), e);
            exit_code_for(e)
        }
    };

    reporter.report(&outcome);
    code
}

/// Patch the real filesystem and report through the reporter chosen by `options`
pub fn run_patch(request: &PatchRequest, options: &PatchOptions) -> i32 {
    let reporter = reporter_for(options);
    run_with(&FilePatcher::new(), request, reporter.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{
        EXIT_ATTRIBUTE_QUERY_FAILED, EXIT_OFFSET_OUT_OF_BOUNDS, EXIT_READ_ONLY_TARGET,
    };
    use crate::logger::{DEFAULT_LEVEL, parse_level_filter};
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::cell::RefCell;
    use std::fs;
    use std::sync::{Mutex, Once};
    use tempfile::TempDir;

    /// Keeps every record emitted by the crate while tests run
    struct CaptureLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    fn install_capture() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
    }

    #[derive(Debug, Default)]
    struct RecordingReporter {
        messages: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn report(&self, outcome: &PatchOutcome) {
            self.messages
                .borrow_mut()
                .push(crate::report::outcome_message(outcome));
        }
    }

    #[test]
    fn test_run_success_reports_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.exe");
        fs::write(&path, [0u8; 16]).unwrap();
        let request = PatchRequest::new(&path, vec![0x90, 0x90], 2).unwrap();
        let reporter = RecordingReporter::default();

        let code = run_with(&FilePatcher::new(), &request, &reporter);

        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(reporter.messages.borrow().len(), 1);
        assert_eq!(&fs::read(&path).unwrap()[2..4], &[0x90, 0x90]);
    }

    #[test]
    fn test_run_failure_maps_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();

        let request = PatchRequest::new(temp_dir.path().join("nope.exe"), vec![1], 0).unwrap();
        let code = run_with(&FilePatcher::new(), &request, &reporter);
        assert_eq!(code, EXIT_ATTRIBUTE_QUERY_FAILED);

        let path = temp_dir.path().join("small.exe");
        fs::write(&path, [0u8; 4]).unwrap();
        let request = PatchRequest::new(&path, vec![1, 2], 3).unwrap();
        let code = run_with(&FilePatcher::new(), &request, &reporter);
        assert_eq!(code, EXIT_OFFSET_OUT_OF_BOUNDS);

        assert_eq!(reporter.messages.borrow().len(), 2);
    }

    #[test]
    fn test_failure_is_reported_once_at_default_level() {
        install_capture();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("once-readonly.exe");
        fs::write(&path, [0u8; 8]).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let request = PatchRequest::new(&path, vec![0x90], 0).unwrap();
        let reporter = RecordingReporter::default();
        let code = run_with(&FilePatcher::new(), &request, &reporter);
        assert_eq!(code, EXIT_READ_ONLY_TARGET);

        let messages = reporter.messages.borrow();
        assert_eq!(messages.len(), 1);

        // Nothing at or above the default level repeats the operator message
        let default_filter = parse_level_filter(DEFAULT_LEVEL);
        let repeated = CAPTURE
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, message)| *level <= default_filter && message.contains(&messages[0]))
            .count();
        assert_eq!(repeated, 0);
    }

    #[test]
    fn test_apply_patch_uses_real_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("real.exe");
        fs::write(&path, [0u8; 4]).unwrap();

        let request = PatchRequest::new(&path, vec![0xFF], 3).unwrap();
        let summary = apply_patch(&request).unwrap();
        assert_eq!(summary.offset, 3);
        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 0, 0xFF]);
    }
}
