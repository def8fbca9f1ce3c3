//! # Format Conversion
//!
//! The external conversion tool behind a narrow trait. Production uses
//! pandoc as an opaque child process; tests substitute a mock. The engine is
//! responsible for running the call off the request-handling threads and
//! bounding it with a timeout.

use std::process::Command;
use std::time::Duration;

use super::errors::{LifecycleError, LifecycleResult};

/// Default wall-clock bound for a single conversion
pub const DEFAULT_CONVERT_TIMEOUT: Duration = Duration::from_secs(30);

/// External format conversion tool
///
/// `convert` is synchronous and may block for the duration of the external
/// process; callers must not invoke it on an async worker directly.
pub trait ConversionTool: Send + Sync {
    /// Transcode the artifact at `source_path` from `source_format` to
    /// `target_format`, writing the result to `output_path`.
    ///
    /// Both paths are real on-disk paths; callers resolve blob locators
    /// against the storage root before invoking the tool.
    fn convert(
        &self,
        source_path: &str,
        output_path: &str,
        source_format: &str,
        target_format: &str,
    ) -> LifecycleResult<()>;
}

/// Pandoc-backed converter
#[derive(Debug, Default)]
pub struct PandocConverter;

impl PandocConverter {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionTool for PandocConverter {
    fn convert(
        &self,
        source_path: &str,
        output_path: &str,
        source_format: &str,
        target_format: &str,
    ) -> LifecycleResult<()> {
        let output = Command::new("pandoc")
            .arg(source_path)
            .arg("-o")
            .arg(output_path)
            .arg("-f")
            .arg(source_format)
            .arg("-t")
            .arg(target_format)
            .output()
            .map_err(|e| LifecycleError::Conversion(format!("failed to run pandoc: {}", e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(LifecycleError::Conversion(format!(
                "pandoc exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

/// Mock converter for tests
///
/// Records invocations and fails on demand.
#[derive(Debug, Default)]
pub struct MockConverter {
    /// Recorded (source_path, output_path, source_format, target_format)
    pub calls: std::sync::Mutex<Vec<(String, String, String, String)>>,
    /// When true, every call fails with a conversion error
    pub fail: std::sync::atomic::AtomicBool,
}

impl MockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        mock
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ConversionTool for MockConverter {
    fn convert(
        &self,
        source_path: &str,
        output_path: &str,
        source_format: &str,
        target_format: &str,
    ) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push((
            source_path.to_string(),
            output_path.to_string(),
            source_format.to_string(),
            target_format.to_string(),
        ));

        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            Err(LifecycleError::Conversion("mock tool failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let mock = MockConverter::new();
        mock.convert("uploads/1-a.txt", "uploads/2-converted.pdf", "txt", "pdf")
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0].2, "txt");
        assert_eq!(calls[0].3, "pdf");
    }

    #[test]
    fn test_mock_failure_mode() {
        let mock = MockConverter::failing();
        let result = mock.convert("a", "b", "txt", "pdf");
        assert!(matches!(result, Err(LifecycleError::Conversion(_))));
        // The call is still recorded even when it fails
        assert_eq!(mock.call_count(), 1);
    }
}
