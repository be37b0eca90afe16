//! Interactive prompts behind a trait so commands can run against scripted input.

use anyhow::Result;
use std::fs::File;
use std::io::{self, Read, Write};

pub trait Prompt {
    /// Ask a yes/no question. Only `y` / `yes` (any case) is yes; EOF is no.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Show `message` and block until the user presses Enter (or input ends).
    fn acknowledge(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented prompt over any reader/writer pair.
///
/// Answers are read one byte at a time and stop at the newline, so input after
/// the answer line stays in the reader.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Unbuffered reader over the process's standard input.
///
/// `io::stdin()` fills an internal buffer, and whatever it reads ahead of the
/// answer would never reach the application, which inherits the same stdin.
/// Each read goes through a fresh duplicate of the descriptor instead.
pub struct RawStdin;

impl Read for RawStdin {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let stdin = io::stdin();
        #[cfg(unix)]
        let owned = std::os::fd::AsFd::as_fd(&stdin).try_clone_to_owned()?;
        #[cfg(windows)]
        let owned = std::os::windows::io::AsHandle::as_handle(&stdin).try_clone_to_owned()?;
        File::from(owned).read(buf)
    }
}

impl Console<RawStdin, io::Stderr> {
    /// Prompts on stderr, answers from stdin.
    pub fn stdio() -> Self {
        Self::new(RawStdin, io::stderr())
    }
}

impl<R: Read, W: Write> Prompt for Console<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        let answer = self.read_answer()?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn acknowledge(&mut self, message: &str) -> Result<()> {
        write!(self.output, "{} ", message)?;
        self.output.flush()?;
        self.read_answer()?;
        Ok(())
    }
}
