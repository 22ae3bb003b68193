//! `problem_statement/`: LaTeX sources, `wrap.tex` and `olymp.sty` link
use super::metadata::problem_id;
use super::package_index::PackageIndex;
use crate::fs_util;
use anyhow::Context as _;
use dompack_api::{
    convert_problem::{Request, Update},
    EventTx,
};
use std::path::Path;

/// Position of problem inside contest, guessed from its id.
///
/// Single latin letter maps to its offset from `a`/`A`, anything else to 0.
pub fn guess_id(probid: &str) -> usize {
    let mut chars = probid.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => (c as u8 - b'A') as usize,
        (Some(c), None) if c.is_ascii_lowercase() => (c as u8 - b'a') as usize,
        _ => 0,
    }
}

pub fn wrap_tex(problem_offset: usize) -> String {
    format!(
        "\\input{{../../../common.tex}}\n\
         \\begin{{document}}\n\
         \\raggedbottom\n\
         \\addtocounter{{problem}}{{{}}}\n\
         \\import{{}}{{problem}}\n\
         \\end{{document}}\n",
        problem_offset
    )
}

fn copy_tree(src: &Path, dest: &Path) -> anyhow::Result<usize> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&src.to_string_lossy()));
    let mut copied = 0;
    for entry in glob::glob(&pattern).context("invalid statement path")? {
        let path = entry.context("failed to list statement files")?;
        if !path.is_file() {
            continue;
        }
        let rel = path
            .strip_prefix(src)
            .context("glob returned path outside of statement dir")?;
        fs_util::copy(&path, &dest.join(rel))?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Other,
        "symlinks are only supported on unix",
    ))
}

#[tracing::instrument(skip_all)]
pub fn copy_statement(
    req: &Request,
    olymp_sty_link: &Path,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let src = req.src_path.join("statements").join(&req.language);
    let dest = req.out_path.join("problem_statement");
    let copied = copy_tree(&src, &dest)?;
    tracing::debug!(copied, from = %src.display(), "statement files copied");

    let probid = problem_id(req, index)?;
    fs_util::write(&dest.join("wrap.tex"), wrap_tex(guess_id(&probid)))?;

    let link = dest.join("olymp.sty");
    if let Err(err) = symlink(olymp_sty_link, &link) {
        let message = format!("failed to create symlink {}: {}", link.display(), err);
        tracing::warn!("{}", message);
        tx.send_event(Update::Warning(message));
    }
    Ok(())
}
