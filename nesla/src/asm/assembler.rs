use crate::asm::error_codes::ErrorCode;
use crate::asm::reader::Reader;
use crate::asm::tokens::Lexer;
use crate::asm::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// What to assemble and where to put the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

impl Context {
    pub fn new(input: impl Into<PathBuf>) -> Context {
        Context {
            input: input.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Context {
        self.output = Some(output.into());
        self
    }

    /// The file the token listing is written to.
    /// `None` means standard output.
    pub fn listing_path(&self) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        let mut name = self
            .input
            .file_stem()
            .unwrap_or(self.input.as_os_str())
            .to_os_string();
        name.push(".tokens");
        Some(output.join(name))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

pub fn version() -> Version {
    Version {
        major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
        minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
        patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
    }
}

/// Writes one listing line per token, starting at the lexer's cursor.
pub fn dump<R, W>(lexer: &mut Lexer<R>, writer: &mut W) -> Result<(), Error>
where
    R: Reader + Sized,
    W: Write,
{
    loop {
        let token = lexer.get()?;
        writeln!(writer, "{token}")
            .map_err(|err| raise!(ErrorCode::IOError, "Failed to write token: {err}"))?;
        match lexer.next() {
            Ok(()) => {}
            Err(err) if err.is(ErrorCode::NoNextToken) => break,
            Err(err) => return Err(err),
        }
    }
    writer
        .flush()
        .map_err(|err| raise!(ErrorCode::IOError, "Failed to flush output: {err}"))
}

/// Tokenizes the input file and writes the token listing.
pub fn assemble(context: &Context) -> Result<(), Error> {
    let mut lexer = Lexer::open(&context.input)?;
    match context.listing_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| {
                    raise!(
                        ErrorCode::IOError,
                        "Failed to create directory: {}: {err}",
                        parent.display()
                    )
                })?;
            }
            let file = File::create(&path).map_err(|err| {
                raise!(
                    ErrorCode::IOError,
                    "Failed to open file: {}: {err}",
                    path.display()
                )
            })?;
            dump(&mut lexer, &mut BufWriter::new(file))?;
            tracing::debug!("wrote {}", path.display());
        }
        None => dump(&mut lexer, &mut io::stdout().lock())?,
    }
    lexer.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::asm::assembler::{assemble, dump, version, Context, Version};
    use crate::asm::error_codes::ErrorCode;
    use crate::asm::test::Code;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn dump_writes_listing() {
        let mut lexer = Code::new("LOOP: LDA #$10\n  .INC \"chr.bin\"\n")
            .lexer()
            .unwrap();
        let mut output = Vec::new();
        dump(&mut lexer, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "\
[LABEL:0] \"LOOP\" (inline source@1)
[INSTRUCTION:29] (inline source@1)
[SYMBOL:1] (inline source@1)
[SCALAR:0] 0010 (16) (inline source@1)
[DIRECTIVE:4] (inline source@2)
[LITERAL:0] \"chr.bin\" (inline source@2)
[END:0] END
"
        );
        assert_eq!(lexer.index(), 6);
    }

    #[test]
    fn dump_starts_at_cursor() {
        let mut lexer = Code::new("NOP BRK").lexer().unwrap();
        lexer.next().unwrap();
        let mut output = Vec::new();
        dump(&mut lexer, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "[INSTRUCTION:10] (inline source@1)\n[END:0] END\n"
        );
    }

    #[test]
    fn listing_path() {
        assert_eq!(Context::new("game.asm").listing_path(), None);
        assert_eq!(
            Context::new("src/game.asm").with_output("out").listing_path(),
            Some(PathBuf::from("out/game.tokens"))
        );
        assert_eq!(
            Context::new("src/game.v2.asm")
                .with_output("out")
                .listing_path(),
            Some(PathBuf::from("out/game.v2.tokens"))
        );
    }

    #[test]
    fn assemble_into_output_directory() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("reset.asm");
        fs::write(&input, "RESET:\n\tSEI\n").unwrap();
        let output = dir.path().join("build");

        let context = Context::new(&input).with_output(&output);
        assemble(&context).unwrap();

        let listing = fs::read_to_string(output.join("reset.tokens")).unwrap();
        let path = input.display();
        assert_eq!(
            listing,
            format!("[LABEL:0] \"RESET\" ({path}@1)\n[INSTRUCTION:46] ({path}@2)\n[END:0] END\n")
        );
    }

    #[test]
    fn assemble_missing_input() {
        let dir = tempdir().unwrap();
        let context = Context::new(dir.path().join("missing.asm"));
        assert_eq!(assemble(&context).unwrap_err().code(), ErrorCode::IOError);
    }

    #[test]
    fn assemble_reports_lexical_errors() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.asm");
        fs::write(&input, "LDA #$10000\n").unwrap();
        let context = Context::new(&input).with_output(dir.path());
        let error = assemble(&context).unwrap_err();
        assert_eq!(error.code(), ErrorCode::ScalarOverflow);
        assert!(!dir.path().join("bad.tokens").exists());
    }

    #[test]
    fn version_matches_package() {
        assert_eq!(
            version(),
            Version {
                major: 0,
                minor: 1,
                patch: 1
            }
        );
        assert_eq!(version().to_string(), env!("CARGO_PKG_VERSION"));
    }
}
