//! Invoice PDF export.
//!
//! The invoice is rendered to HTML by the web layer and handed to an
//! external HTML-to-PDF program (`wkhtmltopdf` by default) that reads HTML
//! on stdin and writes PDF to stdout. When the program is missing or fails,
//! callers get [`CoreError::UnavailableExport`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

/// Converts a rendered HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Whether export can be offered in the UI.
    fn is_available(&self) -> bool;

    async fn render(&self, html: &str) -> Result<Vec<u8>, CoreError>;
}

/// Renderer backed by an external program found on `PATH`.
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    program: PathBuf,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate `name` on `PATH`.
    pub fn detect(name: &str) -> Option<Self> {
        which::which(name).ok().map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    fn is_available(&self) -> bool {
        true
    }

    async fn render(&self, html: &str) -> Result<Vec<u8>, CoreError> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(["--quiet", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CoreError::UnavailableExport(format!(
                    "failed to start {}: {e}",
                    self.program.display()
                ))
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            CoreError::UnavailableExport("PDF renderer stdin unavailable".to_string())
        })?;
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child.wait_with_output().await.map_err(|e| {
            CoreError::UnavailableExport(format!("PDF renderer did not finish: {e}"))
        })?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(CoreError::UnavailableExport(format!(
                    "failed to send invoice to PDF renderer: {e}"
                )))
            }
            Err(e) => return Err(CoreError::Internal(format!("PDF writer task failed: {e}"))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                program = %self.program.display(),
                exit_code = ?output.status.code(),
                stderr = %stderr,
                "PDF renderer failed",
            );
            return Err(CoreError::UnavailableExport(format!(
                "PDF renderer exited with {:?}",
                output.status.code()
            )));
        }
        if output.stdout.is_empty() {
            return Err(CoreError::UnavailableExport(
                "PDF renderer produced no output".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

/// Stand-in used when no renderer program is installed.
#[derive(Debug, Clone, Default)]
pub struct UnavailablePdfRenderer {
    reason: String,
}

impl UnavailablePdfRenderer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for UnavailablePdfRenderer {
    fn is_available(&self) -> bool {
        false
    }

    async fn render(&self, _html: &str) -> Result<Vec<u8>, CoreError> {
        Err(CoreError::UnavailableExport(if self.reason.is_empty() {
            "PDF generation is not available".to_string()
        } else {
            self.reason.clone()
        }))
    }
}

/// Pick the renderer for `program`, degrading to [`UnavailablePdfRenderer`]
/// when it cannot be found.
pub fn renderer_for(program: &str) -> Arc<dyn PdfRenderer> {
    match CommandPdfRenderer::detect(program) {
        Some(renderer) => {
            tracing::info!(program = %renderer.program().display(), "PDF export enabled");
            Arc::new(renderer)
        }
        None => {
            tracing::warn!(program, "PDF renderer not found on PATH, export disabled");
            Arc::new(UnavailablePdfRenderer::new(format!(
                "PDF generation is not available ({program} is not installed)"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn unavailable_renderer_signals_unavailable_export() {
        let renderer = UnavailablePdfRenderer::new("no renderer");
        assert!(!renderer.is_available());
        assert_matches!(
            renderer.render("<p>hi</p>").await,
            Err(CoreError::UnavailableExport(ref msg)) if msg == "no renderer"
        );
    }

    #[tokio::test]
    async fn missing_program_degrades_gracefully() {
        let renderer = renderer_for("definitely-not-a-real-pdf-tool-7f3a");
        assert!(!renderer.is_available());
        assert_matches!(
            renderer.render("<p>hi</p>").await,
            Err(CoreError::UnavailableExport(_))
        );
    }

    #[tokio::test]
    async fn spawn_failure_is_unavailable_export() {
        let renderer = CommandPdfRenderer::new("/nonexistent/bin/wkhtmltopdf");
        assert_matches!(
            renderer.render("<p>hi</p>").await,
            Err(CoreError::UnavailableExport(_))
        );
    }
}
