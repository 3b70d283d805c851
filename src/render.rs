//! External score rendering.
//!
//! Hands a generated `.ly` file to the `lilypond` program to produce an SVG, PNG or PDF.
//! Everything here is optional: LilyPond source generation never depends on it, and a
//! missing program is reported as a configuration problem rather than a failed
//! transcription.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::TabError;

/// Program name searched on `PATH`
pub const LILYPOND_PROGRAM: &str = "lilypond";

/// Environment variable that may point at the program
pub const LILYPOND_PATH_ENV: &str = "LILYPOND_PATH";

/// Target formats the renderer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Svg,
    Png,
    Pdf,
}

impl RenderFormat {
    /// Pick a format from the output path's extension.
    pub fn from_path(path: &Path) -> Result<Self, TabError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(RenderFormat::Svg),
            "png" => Ok(RenderFormat::Png),
            "pdf" => Ok(RenderFormat::Pdf),
            _ => Err(TabError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn flag(&self) -> &'static str {
        match self {
            RenderFormat::Svg => "--svg",
            RenderFormat::Png => "--png",
            RenderFormat::Pdf => "--pdf",
        }
    }
}

/// A located `lilypond` executable.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: PathBuf,
}

impl Renderer {
    /// Find the program.
    ///
    /// An explicit path is used as-is and must exist. Otherwise `LILYPOND_PATH` is
    /// consulted, then `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, TabError> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Self {
                    program: path.to_path_buf(),
                });
            }
            return Err(TabError::RendererNotFound {
                program: path.display().to_string(),
            });
        }

        if let Ok(path) = std::env::var(LILYPOND_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Self { program: path });
            }
        }

        which::which(LILYPOND_PROGRAM)
            .map(|program| Self { program })
            .map_err(|_| TabError::RendererNotFound {
                program: LILYPOND_PROGRAM.to_string(),
            })
    }

    /// Render `source_path` into `output`, returning the written path.
    pub fn render(&self, source_path: &Path, output: &Path) -> Result<PathBuf, TabError> {
        let format = RenderFormat::from_path(output)?;

        // lilypond appends the extension itself
        let stem = output.with_extension("");

        log::info!(
            "rendering {} -> {} with {}",
            source_path.display(),
            output.display(),
            self.program.display()
        );

        let result = Command::new(&self.program)
            .arg(format.flag())
            .arg("-o")
            .arg(&stem)
            .arg(source_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if !result.status.success() {
            return Err(TabError::RenderFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(output.to_path_buf())
    }
}

/// Write LilyPond `source` next to `output` and render it.
///
/// The `.ly` file is written before the renderer is looked up, so it survives a
/// missing program.
pub fn render_source(
    source: &str,
    output: &Path,
    renderer_path: Option<&Path>,
) -> Result<PathBuf, TabError> {
    RenderFormat::from_path(output)?;

    let source_path = output.with_extension("ly");
    std::fs::write(&source_path, source)?;

    let renderer = Renderer::locate(renderer_path)?;
    renderer.render(&source_path, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RenderFormat::from_path(Path::new("a.svg")).unwrap(), RenderFormat::Svg);
        assert_eq!(RenderFormat::from_path(Path::new("a.PNG")).unwrap(), RenderFormat::Png);
        assert_eq!(RenderFormat::from_path(Path::new("dir/a.pdf")).unwrap(), RenderFormat::Pdf);
        assert!(matches!(
            RenderFormat::from_path(Path::new("a.gif")),
            Err(TabError::UnsupportedFormat(_))
        ));
        assert!(RenderFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_missing_explicit_program() {
        let err = Renderer::locate(Some(Path::new("/nonexistent/bin/lilypond"))).unwrap_err();
        assert!(matches!(err, TabError::RendererNotFound { .. }));
    }

    #[test]
    fn test_source_is_written_even_without_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("score.svg");

        let err = render_source(
            "\\version \"2.24.0\"\n",
            &output,
            Some(Path::new("/nonexistent/bin/lilypond")),
        )
        .unwrap_err();

        assert!(matches!(err, TabError::RendererNotFound { .. }));
        let written = std::fs::read_to_string(dir.path().join("score.ly")).unwrap();
        assert!(written.starts_with("\\version"));
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("score.bmp");

        let err = render_source("", &output, None).unwrap_err();
        assert!(matches!(err, TabError::UnsupportedFormat(_)));
        assert!(!dir.path().join("score.ly").exists());
    }
}
