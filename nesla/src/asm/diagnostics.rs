use crate::asm::data::Position;
use crate::asm::error_codes::{Category, CategoryMap, ErrorCode};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

/// Expands to the [`Location`] of the enclosing function.
macro_rules! location {
    () => {{
        fn here() {}
        let name = ::std::any::type_name_of_val(&here);
        $crate::asm::Location::new(
            name.strip_suffix("::here").unwrap_or(name),
            file!(),
            line!(),
        )
    }};
}

/// Creates an [`Error`] with the given code and formatted message,
/// recording where it was raised.
macro_rules! raise {
    ($code:expr, $($arg:tt)+) => {
        $crate::asm::Error::new($code, format!($($arg)+), location!())
    };
}

/// The place in this crate's code that raised an error.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Location {
    function: &'static str,
    file: &'static str,
    line: u32,
}

impl Location {
    pub fn new(function: &'static str, file: &'static str, line: u32) -> Location {
        Location {
            function,
            file,
            line,
        }
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}@{}", self.function, self.file, self.line)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Error {
    code: ErrorCode,
    message: String,
    source: Option<Arc<Path>>,
    position: Option<Position>,
    location: Location,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, location: Location) -> Error {
        Error {
            code,
            message: message.into(),
            source: None,
            position: None,
            location,
        }
    }

    /// Attaches the source file position the error refers to.
    pub fn at(mut self, source: Arc<Path>, position: Position) -> Error {
        self.source = Some(source);
        self.position = Some(position);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&Arc<Path>> {
        self.source.as_ref()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn category(&self, map: &CategoryMap) -> Category {
        map[self.code]
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(source), Some(position)) = (&self.source, self.position) {
            write!(f, " ({}@{})", source.display(), position.line())?;
        }
        write!(f, " ({})", self.location)
    }
}

impl std::error::Error for Error {}

/// Renders errors together with the source line they point at.
pub struct DiagnosticPrinter<'a> {
    pub errors: &'a [Error],
    pub code: Vec<String>,
    pub category_map: CategoryMap,
}

impl<'a> DiagnosticPrinter<'a> {
    pub fn new(errors: &'a [Error], code: &str) -> DiagnosticPrinter<'a> {
        DiagnosticPrinter {
            errors,
            code: code.lines().map(|line| line.to_string()).collect_vec(),
            category_map: CategoryMap::default(),
        }
    }

    fn fmt_error(&self, f: &mut Formatter<'_>, error: &Error) -> std::fmt::Result {
        let category = error.category(&self.category_map);
        let (Some(source), Some(position)) = (error.source(), error.position()) else {
            return write!(f, "{category}: {}", error.message());
        };
        let line = self
            .code
            .get(position.line().saturating_sub(1) as usize)
            .map(String::as_str)
            .unwrap_or("");
        // take tabs into consideration
        let line_empty: String = line
            .chars()
            .map(|ch| if !ch.is_ascii_whitespace() { ' ' } else { ch })
            .take(position.column() as usize)
            .collect();

        let prefix = format!("{}", position.line());
        let prefix_empty = " ".repeat(prefix.len());
        writeln!(
            f,
            "{} --> {}:{}:{}",
            category,
            source.display(),
            position.line(),
            position.column() + 1
        )?;
        writeln!(f, "{} |", prefix_empty)?;
        writeln!(f, "{} | {}", prefix, line)?;
        write!(f, "{} | {}^", prefix_empty, line_empty)?;
        write!(f, " {}", error.message())?;
        Ok(())
    }
}

impl Display for DiagnosticPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for error in self.errors.iter() {
            self.fmt_error(f, error)?;
            writeln!(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
