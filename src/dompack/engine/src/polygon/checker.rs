//! Output validator: sources, testlib.h and `build` script
use super::{
    package_index::{attribute, find_unique, Node, PackageIndex, Tag},
    PackageError,
};
use crate::fs_util;
use dompack_api::{convert_problem::Update, EventTx};
use std::path::{Path, PathBuf};

/// Exit code meaning "accepted" for both checker and interactor
pub const ACCEPT_EXIT_CODE: i32 = 42;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Compiler {
    Cpp,
    C,
}

impl Compiler {
    pub fn from_source_type(source_type: &str) -> Result<Compiler, PackageError> {
        if source_type.starts_with("cpp.") {
            Ok(Compiler::Cpp)
        } else if source_type.starts_with("c.") {
            Ok(Compiler::C)
        } else {
            Err(PackageError::UnsupportedSourceType(source_type.to_string()))
        }
    }

    fn executable(self) -> &'static str {
        match self {
            Compiler::Cpp => "g++",
            Compiler::C => "gcc",
        }
    }

    pub fn build_command(self, src: &str, target: &str) -> String {
        format!(
            "{} -Wall -DDOMJUDGE -O2 {} -o {}",
            self.executable(),
            src,
            target
        )
    }
}

/// Checker or interactor source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub source_type: String,
    /// File name inside validator directory
    pub file_name: String,
}

impl Program {
    fn build_command(&self, target: &str) -> Result<String, PackageError> {
        Ok(Compiler::from_source_type(&self.source_type)?.build_command(&self.file_name, target))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildScript {
    /// Checker itself is the `run` executable
    Standalone { checker: Program },
    /// `run` is a wrapper: interactor first, then checker on the transcript
    Interactive {
        checker: Program,
        interactor: Program,
    },
}

impl BuildScript {
    pub fn is_interactive(&self) -> bool {
        matches!(self, BuildScript::Interactive { .. })
    }

    pub fn render(&self) -> Result<String, PackageError> {
        let mut s = String::from("#!/bin/sh\n");
        match self {
            BuildScript::Standalone { checker } => {
                s.push_str(&checker.build_command("run")?);
                s.push('\n');
                s.push_str("chmod +x run\n");
            }
            BuildScript::Interactive {
                checker,
                interactor,
            } => {
                s.push_str(&checker.build_command("checker_run")?);
                s.push('\n');
                s.push_str(&interactor.build_command("interactor_run")?);
                s.push('\n');
                s.push_str("chmod +x checker_run interactor_run\n");
                s.push_str("cat > run << EOF\n");
                s.push_str(&run_wrapper());
                s.push_str("EOF\n");
                s.push_str("chmod +x run\n");
            }
        }
        Ok(s)
    }
}

/// Body of interactive `run`, escaped for unquoted heredoc.
/// Arguments: `$1` test input, `$2` test answer, `$3` feedback dir.
fn run_wrapper() -> String {
    let code = ACCEPT_EXIT_CODE;
    format!(
        r#"#!/bin/sh
./interactor_run "\$1" "\$3"/teammessage.txt "\$2" "\$3"/judgemessage.txt <&0
status=\$?
if [ \$status -ne {code} ]; then
    exit \$status
fi
./checker_run "\$1" "\$3"/teammessage.txt "\$2" "\$3"/judgeerror.txt
status=\$?
if [ \$status -ne {code} ]; then
    exit \$status
fi
cat "\$3"/judgeerror.txt >> "\$3"/judgemessage.txt
rm "\$3"/judgeerror.txt
exit {code}
"#,
        code = code
    )
}

struct ProgramSource {
    src: PathBuf,
    program: Program,
}

fn program_source(src_root: &Path, node: Node) -> Result<ProgramSource, PackageError> {
    let source = find_unique(node, "source")?;
    let rel_path = attribute(source, "path")?;
    let src = src_root.join(rel_path);
    let file_name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackageError::BadValue {
            tag: "source".to_string(),
            value: rel_path.to_string(),
        })?;
    Ok(ProgramSource {
        src,
        program: Program {
            source_type: attribute(source, "type")?.to_string(),
            file_name,
        },
    })
}

#[tracing::instrument(skip_all)]
pub fn copy_checker_and_interactor(
    src_root: &Path,
    dest_root: &Path,
    testlib: &Path,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let validator_dir = dest_root.join("output_validators/checker");
    fs_util::copy(testlib, &validator_dir.join("testlib.h"))?;

    let checker = program_source(src_root, index.node(Tag::Checker))?;
    fs_util::copy(&checker.src, &validator_dir.join(&checker.program.file_name))?;

    let script = match index.get(Tag::Interactor) {
        None => BuildScript::Standalone {
            checker: checker.program,
        },
        Some(node) => {
            let interactor = program_source(src_root, node)?;
            fs_util::copy(
                &interactor.src,
                &validator_dir.join(&interactor.program.file_name),
            )?;
            BuildScript::Interactive {
                checker: checker.program,
                interactor: interactor.program,
            }
        }
    };

    let build_path = validator_dir.join("build");
    fs_util::write(&build_path, script.render()?)?;
    fs_util::make_executable(&build_path)?;
    tx.send_event(Update::CheckerScript {
        interactive: script.is_interactive(),
    });
    Ok(())
}
