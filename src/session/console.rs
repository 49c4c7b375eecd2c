// wpsync/src/session/console.rs
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::errors::{AppError, Result};

/// Line-oriented user interaction used by the configuration session.
pub trait Console {
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Shows `prompt` followed by `": "` and blocks for one line of input.
    ///
    /// The returned answer has its line terminator removed and nothing else.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// [`Console`] over any buffered reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConsole { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineConsole<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        LineConsole::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(AppError::InputClosed);
        }
        if answer.ends_with('\n') {
            answer.pop();
            if answer.ends_with('\r') {
                answer.pop();
            }
        }
        Ok(answer)
    }
}
