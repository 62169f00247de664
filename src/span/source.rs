use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Where a piece of program text comes from. The parser reads the content
/// exactly once per parse.
pub trait Source {
    fn description(&self) -> String;
    fn read_content(&self) -> io::Result<String>;
}

/// A source file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> FileSource {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn read_content(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Program text that is already in memory.
#[derive(Clone, Debug)]
pub struct TextSource {
    description: String,
    text: String,
}

impl TextSource {
    pub fn new(description: impl Into<String>, text: impl Into<String>) -> TextSource {
        TextSource {
            description: description.into(),
            text: text.into(),
        }
    }

    /// An anonymous in-memory source, mostly useful in tests.
    pub fn anonymous(text: impl Into<String>) -> TextSource {
        TextSource::new("<text>", text)
    }
}

impl Source for TextSource {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn read_content(&self) -> io::Result<String> {
        Ok(self.text.clone())
    }
}

/// One entry typed at an interactive prompt.
#[derive(Clone, Debug)]
pub struct ReplSource {
    entry: usize,
    text: String,
}

impl ReplSource {
    pub fn new(entry: usize, text: impl Into<String>) -> ReplSource {
        ReplSource {
            entry,
            text: text.into(),
        }
    }
}

impl Source for ReplSource {
    fn description(&self) -> String {
        format!("<repl:{}>", self.entry)
    }

    fn read_content(&self) -> io::Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod source_tests {
    use super::{FileSource, ReplSource, Source, TextSource};

    #[test]
    fn in_memory_sources_describe_themselves() {
        let text = TextSource::new("prelude", "fun main() {}");
        assert_eq!(text.description(), "prelude");
        assert_eq!(text.read_content().unwrap(), "fun main() {}");

        let repl = ReplSource::new(3, "1 + 2");
        assert_eq!(repl.description(), "<repl:3>");
        assert_eq!(repl.read_content().unwrap(), "1 + 2");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let src = FileSource::new("/definitely/not/here.sprig");
        assert_eq!(src.description(), "/definitely/not/here.sprig");
        assert!(src.read_content().is_err());
    }
}
