use std::path::{Path, PathBuf};

use crate::model::output::OutputKind;

/// Default directory for exported outputs: `<cache_dir>/escrivao/outputs`.
pub fn outputs_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("escrivao").join("outputs"))
}

/// Write `text` as Markdown to `<dir>/<timestamp>_<kind>.md`, creating `dir`
/// if needed. Returns the written path.
pub fn write_output(
    dir: &Path,
    kind: OutputKind,
    source_url: Option<&str>,
    text: &str,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let now = chrono::Local::now();
    let path = dir.join(format!("{}_{}.md", now.format("%Y%m%d_%H%M%S"), kind.slug()));

    let mut out = format!("# {}\n\n", kind.label());
    if let Some(url) = source_url {
        out.push_str(&format!("Documento: {url}\n\n"));
    }
    out.push_str(&format!("Gerado em: {}\n\n---\n\n", now.format("%d/%m/%Y %H:%M")));
    out.push_str(text.trim_end());
    out.push('\n');

    std::fs::write(&path, out)?;
    tracing::info!(path = %path.display(), "output exported");
    Ok(path)
}
