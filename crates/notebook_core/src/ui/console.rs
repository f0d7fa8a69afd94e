//! Line-oriented console front end.

use super::UserInterface;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Console front end over any buffered reader and writer.
pub struct ConsoleInterface<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleInterface<BufReader<Stdin>, Stdout> {
    /// Creates a console bound to process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleInterface<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Returns the writer, consuming the console.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> UserInterface for ConsoleInterface<R, W> {
    fn get_input(&mut self, prompt: &str) -> io::Result<String> {
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed",
            ));
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn display_message(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{message}")
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleInterface;
    use crate::ui::UserInterface;
    use std::io::{Cursor, ErrorKind};

    #[test]
    fn get_input_writes_prompt_and_strips_line_ending() {
        let mut console = ConsoleInterface::new(Cursor::new("trip\r\n"), Vec::new());
        assert_eq!(console.get_input("Name: ").unwrap(), "trip");
        assert_eq!(console.into_writer(), b"Name: ".to_vec());
    }

    #[test]
    fn get_input_keeps_inner_whitespace() {
        let mut console = ConsoleInterface::new(Cursor::new("  spaced out  \n"), Vec::new());
        assert_eq!(console.get_input("").unwrap(), "  spaced out  ");
    }

    #[test]
    fn exhausted_input_reports_eof() {
        let mut console = ConsoleInterface::new(Cursor::new(""), Vec::new());
        let err = console.get_input("> ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn invalid_utf8_input_reports_invalid_data() {
        let mut console = ConsoleInterface::new(Cursor::new(b"\xff\xfe\n".to_vec()), Vec::new());
        let err = console.get_input("> ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn display_message_appends_newline() {
        let mut console = ConsoleInterface::new(Cursor::new(""), Vec::new());
        console.display_message("Goodbye!").unwrap();
        assert_eq!(String::from_utf8(console.into_writer()).unwrap(), "Goodbye!\n");
    }
}
