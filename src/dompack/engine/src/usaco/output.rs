//! Files written into problem directory
use super::Scraper;
use crate::{render::RenderContext, statement::Problem};
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// LaTeX style shipped with templates as is
const VERBATIM_FILE: &str = "olymp.sty";

async fn write_file(dest: &Path, content: impl AsRef<[u8]>) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    tokio::fs::write(dest, content)
        .await
        .with_context(|| format!("write {}", dest.display()))
}

/// Lists template files relative to `template_dir`
pub(crate) fn template_files(template_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&template_dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).context("invalid template dir")? {
        let path = entry.context("failed to list templates")?;
        if !path.is_file() {
            continue;
        }
        let rel = path
            .strip_prefix(template_dir)
            .context("glob returned path outside of template dir")?;
        files.push(rel.to_path_buf());
    }
    Ok(files)
}

impl Scraper {
    pub async fn dump_html(&self, problem_root: &Path, html: &str) -> anyhow::Result<()> {
        write_file(&problem_root.join("origin.html"), html).await
    }

    /// Renders every template file into problem directory
    #[tracing::instrument(skip_all, fields(problem = %problem.letter_id))]
    pub async fn render_templates(
        &self,
        problem_root: &Path,
        problem: &Problem,
    ) -> anyhow::Result<()> {
        let template_dir = &self.config.template_dir;
        let context: RenderContext = problem.render_context();
        for rel in template_files(template_dir)? {
            let src = template_dir.join(&rel);
            let dest = problem_root.join(&rel);
            let content = tokio::fs::read(&src)
                .await
                .with_context(|| format!("read {}", src.display()))?;
            if rel.file_name().map_or(false, |n| n == VERBATIM_FILE) {
                write_file(&dest, content).await?;
                continue;
            }
            let template = String::from_utf8(content)
                .with_context(|| format!("template {} is not utf-8", src.display()))?;
            tracing::debug!(template = %src.display(), dest = %dest.display(), "render");
            let rendered = self
                .render
                .render(&template, &context)
                .with_context(|| format!("failed to render {}", src.display()))?;
            write_file(&dest, rendered).await?;
        }
        Ok(())
    }
}
