//! Operator notification
//!
//! Every invocation ends with exactly one message describing the outcome. The
//! channel is pluggable: console text, a JSON line for scripted consoles, or a
//! native message box on Windows.

use crate::exit_codes::{EXIT_SUCCESS, exit_code_for};
use crate::patch::PatchOutcome;
use serde_json::json;

/// Message shown when the patch was applied
pub const SUCCESS_MESSAGE: &str = "File successfully patched";

/// Surfaces the outcome of one patch invocation to the operator
pub trait Reporter {
    /// Emit exactly one message for `outcome`
    fn report(&self, outcome: &PatchOutcome);
}

/// Human-readable one-line description of an outcome
pub fn outcome_message(outcome: &PatchOutcome) -> String {
    match outcome {
        Ok(summary) => format!(
            "{SUCCESS_MESSAGE}: {} byte(s) written at 0x{:x} in {}",
            summary.bytes_written,
            summary.offset,
            summary.target.display()
        ),
        Err(err) => err.to_string(),
    }
}

/// Machine-readable form of an outcome
pub fn outcome_json(outcome: &PatchOutcome) -> serde_json::Value {
    match outcome {
        Ok(summary) => json!({
            "status": "success",
            "kind": "success",
            "exit_code": EXIT_SUCCESS,
            "message": SUCCESS_MESSAGE,
            "target": summary.target.display().to_string(),
            "offset": summary.offset,
            "bytes_written": summary.bytes_written,
            "file_size": summary.file_size,
        }),
        Err(err) => json!({
            "status": "error",
            "kind": err.kind_name(),
            "exit_code": exit_code_for(err),
            "message": err.to_string(),
        }),
    }
}

/// Plain text on stdout (success) or stderr (failure)
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, outcome: &PatchOutcome) {
        match outcome {
            Ok(_) => println!("✅ {}", outcome_message(outcome)),
            Err(_) => eprintln!("❌ {}", outcome_message(outcome)),
        }
    }
}

/// One JSON object per invocation on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, outcome: &PatchOutcome) {
        println!("{}", outcome_json(outcome));
    }
}

/// Native message box, as an interactive operator on Windows would expect
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogReporter;

#[cfg(target_os = "windows")]
impl Reporter for DialogReporter {
    #[allow(unsafe_code)] // Required for Windows API FFI calls
    fn report(&self, outcome: &PatchOutcome) {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{
            MB_ICONERROR, MB_ICONINFORMATION, MessageBoxW,
        };
        use windows::core::PCWSTR;

        let (caption, text, style) = match outcome {
            Ok(_) => ("Information", SUCCESS_MESSAGE.to_string(), MB_ICONINFORMATION),
            Err(err) => ("Error", err.to_string(), MB_ICONERROR),
        };

        let wide_text: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
        let wide_caption: Vec<u16> = caption.encode_utf16().chain(std::iter::once(0)).collect();

        unsafe {
            let _ = MessageBoxW(
                HWND::default(),
                PCWSTR(wide_text.as_ptr()),
                PCWSTR(wide_caption.as_ptr()),
                style,
            );
        }
    }
}
