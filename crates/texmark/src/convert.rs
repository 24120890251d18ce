//! Markdown to LaTeX conversion command.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use texmark_config::{CliSettings, Config};
use texmark_renderer::{MarkdownRenderer, RendererConfig};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the conversion.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown file to convert (default: read stdin; `-` also reads stdin).
    input: Option<PathBuf>,

    /// Write LaTeX to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover texmark.toml).
    #[arg(short, long, env = "TEXMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Document title (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Document author (overrides config).
    #[arg(long)]
    author: Option<String>,

    /// Disable GitHub Flavored Markdown tables and strikethrough.
    #[arg(long)]
    no_gfm: bool,

    /// Disable `$...$` and `$$...$$` math.
    #[arg(long)]
    no_math: bool,

    /// Emit only the document body, without preamble or `\end{document}`.
    #[arg(long)]
    fragment: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rendering or writing fails.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            title: self.title,
            author: self.author,
            gfm: self.no_gfm.then_some(false),
            math: self.no_math.then_some(false),
            standalone: self.fragment.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(self.input.as_deref())?;
        let result = renderer_from_config(&config, version).render_markdown(&markdown)?;

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        write_output(self.output.as_deref(), &result.latex)?;
        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }

        Ok(())
    }
}

/// Build a renderer from loaded configuration.
///
/// Without a configured generator, the PDF author records this binary's
/// name and `version`.
fn renderer_from_config(config: &Config, version: &str) -> MarkdownRenderer {
    let generator = config
        .document
        .generator
        .clone()
        .unwrap_or_else(|| format!("texmark {version}"));
    let renderer_config =
        RendererConfig::new(config.document.title.as_str(), config.document.author.as_str())
            .with_generator(generator);

    MarkdownRenderer::new(renderer_config)
        .with_gfm(config.markdown.gfm)
        .with_math(config.markdown.math)
        .with_footnotes(config.markdown.footnotes)
        .with_standalone(config.markdown.standalone)
}

/// Read markdown from `path`, or from stdin when absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            tracing::info!(path = %path.display(), "Reading markdown");
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut markdown = String::new();
            std::io::stdin().lock().read_to_string(&mut markdown)?;
            Ok(markdown)
        }
    }
}

/// Write LaTeX to `path`, or to stdout when absent.
fn write_output(path: Option<&Path>, latex: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, latex)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(latex.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_renderer_uses_binary_version_as_generator() {
        let renderer = renderer_from_config(&Config::default(), "1.2.3");
        assert_eq!(renderer.latex().config().generator(), "texmark 1.2.3");
    }

    #[test]
    fn test_renderer_uses_configured_generator() {
        let mut config = Config::default();
        config.document.generator = Some("acme-docs".to_owned());

        let renderer = renderer_from_config(&config, "1.2.3");

        assert_eq!(renderer.latex().config().generator(), "acme-docs");
    }

    #[test]
    fn test_renderer_uses_document_metadata() {
        let mut config = Config::default();
        config.document.title = "Field Guide".to_owned();
        config.document.author = "R&D".to_owned();

        let result = renderer_from_config(&config, "0.1.0")
            .render_markdown("")
            .unwrap();

        assert!(result.latex.contains("\\title{Field Guide}\n\\author{R\\&D}\n"));
        assert!(result.latex.contains("pdfauthor={texmark 0.1.0}}"));
    }

    #[test]
    fn test_renderer_fragment_mode() {
        let mut config = Config::default();
        config.markdown.standalone = false;

        let result = renderer_from_config(&config, "0.1.0")
            .render_markdown("Body text")
            .unwrap();

        assert_eq!(result.latex, "\nBody text\n");
    }

    #[test]
    fn test_renderer_respects_markdown_switches() {
        let mut config = Config::default();
        config.markdown.gfm = false;
        config.markdown.math = false;
        config.markdown.footnotes = false;

        let options = renderer_from_config(&config, "0.1.0").parser_options();

        assert!(options.is_empty());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes\n").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "# Notes\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.md"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tex");

        write_output(Some(&path), "\\section{X}\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\\section{X}\n");
    }
}
