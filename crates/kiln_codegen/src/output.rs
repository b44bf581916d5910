use std::fs::{self, File};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use kiln_session::config::OutputKind;
use target_lexicon::OperatingSystem;

/// Derive the output filename from the input name, the output kind, the
/// resolved backend name and the target OS.
///
/// A trailing `.bc`/`.ll` is stripped first. The C-emitting backends get
/// source-file extensions for "assembly" output; object files use `.obj`
/// on Windows and `.o` everywhere else.
pub fn output_filename(
    input: &str,
    kind: OutputKind,
    target_name: &str,
    os: &OperatingSystem,
) -> String {
    let root = input
        .strip_suffix(".bc")
        .or_else(|| input.strip_suffix(".ll"))
        .unwrap_or(input);

    match kind {
        OutputKind::Assembly => {
            if target_name == "c" {
                format!("{root}.cbe.c")
            } else if target_name.starts_with("cpp") {
                format!("{root}.cpp")
            } else {
                format!("{root}.s")
            }
        }
        OutputKind::Object => {
            if matches!(os, OperatingSystem::Windows) {
                format!("{root}.obj")
            } else {
                format!("{root}.o")
            }
        }
        OutputKind::Null => format!("{root}.null"),
    }
}

/// The destination stream for one assembly-and-execution cycle.
///
/// A file destination is removed again when this value is dropped, unless
/// [`OutputFile::keep`] was called: the sink is either fully committed or
/// fully discarded. `-` writes to stdout and is never removed.
pub struct OutputFile {
    dest: Dest,
    binary: bool,
    keep: bool,
}

enum Dest {
    Stdout(Stdout),
    File { path: PathBuf, file: File },
}

impl OutputFile {
    pub fn open(name: &str, binary: bool) -> io::Result<Self> {
        let dest = if name == "-" {
            Dest::Stdout(io::stdout())
        } else {
            let path = PathBuf::from(name);
            let file = File::create(&path)?;
            Dest::File { path, file }
        };

        Ok(Self {
            dest,
            binary,
            keep: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.dest {
            Dest::File { path, .. } => Some(path),
            Dest::Stdout(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Commit the destination; it survives this value being dropped.
    pub fn keep(mut self) {
        self.keep = true;
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.dest {
            Dest::Stdout(out) => out.write(buf),
            Dest::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.dest {
            Dest::Stdout(out) => out.flush(),
            Dest::File { file, .. } => file.flush(),
        }
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }

        if let Dest::File { path, .. } = &self.dest {
            let _ = fs::remove_file(path);
        }
    }
}
