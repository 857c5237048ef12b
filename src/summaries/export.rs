use std::path::PathBuf;

use tracing::info;

use crate::error::{AppError, Result};
use crate::files::ScopedFs;
use crate::summaries::store::Summary;

/// Directory (relative to the app base dir) exported analyses are written to
pub const EXPORTS_DIR: &str = "exports";

/// Characters that are invalid in file names on at least one platform
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// `<title without extension>_analysis.md`, with forbidden characters dropped
pub fn export_file_name(title: &str) -> String {
    let clean: String = title.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let stem = match clean.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            stem
        }
        _ => clean.as_str(),
    };
    let stem = stem.trim();
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("{}_analysis.md", stem)
}

/// Markdown rendering of one record
pub fn render_markdown(summary: &Summary) -> String {
    let mut out = format!(
        "# Document Analysis: {}\n\n**Analysis date:** {}\n\n",
        summary.title, summary.date
    );
    if !summary.preview.trim().is_empty() {
        out.push_str(&format!("## Summary\n\n{}\n\n", summary.preview));
    }
    out.push_str(&format!("## Detailed Analysis\n\n{}\n", summary.analyse));
    out
}

/// Write a record to `exports/` and return the absolute path written
pub async fn export_summary(fs: &ScopedFs, summary: &Summary) -> Result<PathBuf> {
    if summary.analyse.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Summary {} has no analysis to export",
            summary.id
        )));
    }

    let relative = format!("{}/{}", EXPORTS_DIR, export_file_name(&summary.title));
    fs.write_text(&relative, &render_markdown(summary)).await?;

    let path = fs.resolve(&relative)?;
    info!(id = summary.id, path = %path.display(), "Summaries: exported analysis");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_extension_and_forbidden_chars() {
        assert_eq!(export_file_name("report.pdf"), "report_analysis.md");
        assert_eq!(export_file_name("a/b:c?.docx"), "abc_analysis.md");
        assert_eq!(export_file_name("archive.tar.gz"), "archive.tar_analysis.md");
        assert_eq!(export_file_name("README"), "README_analysis.md");
        assert_eq!(export_file_name("???"), "document_analysis.md");
    }

    #[test]
    fn test_render_skips_empty_preview() {
        let s = Summary::new(1, "a.txt", "16/10/2026", "", "Body");
        let md = render_markdown(&s);
        assert!(md.starts_with("# Document Analysis: a.txt\n\n**Analysis date:** 16/10/2026"));
        assert!(!md.contains("## Summary"));
        assert!(md.ends_with("## Detailed Analysis\n\nBody\n"));
    }

    #[tokio::test]
    async fn test_export_writes_under_exports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fs = ScopedFs::with_base_dir(dir.path().to_path_buf()).unwrap();
        let s = Summary::new(5, "contract.pdf", "16/10/2026", "Lease", "# Full");

        let path = export_summary(&fs, &s).await.unwrap();

        assert_eq!(path, dir.path().join("exports").join("contract_analysis.md"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("## Summary\n\nLease"));
        assert!(written.contains("# Full"));
    }

    #[tokio::test]
    async fn test_export_rejects_empty_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let fs = ScopedFs::with_base_dir(dir.path().to_path_buf()).unwrap();
        let s = Summary::new(5, "x.txt", "16/10/2026", "", "  ");
        assert!(matches!(
            export_summary(&fs, &s).await,
            Err(AppError::Validation(_))
        ));
    }
}
