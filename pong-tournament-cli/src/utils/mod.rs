use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::{Error, Result};

/// A question asked on stdout and answered on a single line of stdin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    msg: &'a str,
}

impl<'a> Prompt<'a> {
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { msg }
    }

    /// Reads a single line without the line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Eof`] when stdin is closed.
    pub fn read_line(&self) -> Result<String> {
        {
            let mut writer = io::stdout().lock();
            writer.write_all(self.msg.as_bytes())?;
            writer.write_all(b": ")?;
            writer.flush()?;
        }

        let mut string = String::new();
        if io::stdin().lock().read_line(&mut string)? == 0 {
            return Err(Error::Eof);
        }

        Ok(trim_newline(string))
    }

    /// Read until a valid element is input.
    pub fn read_valid<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            match self.read_line()?.trim().parse() {
                Ok(val) => return Ok(val),
                Err(err) => println!("Failed to parse input: {}", err),
            }
        }
    }

    /// Asks a yes/no question. Anything but `y` or `yes` counts as no.
    pub fn confirm(&self) -> Result<bool> {
        let answer = self.read_line()?;

        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

fn trim_newline(mut string: String) -> String {
    if string.ends_with('\n') {
        string.pop();

        if string.ends_with('\r') {
            string.pop();
        }
    }

    string
}

#[cfg(test)]
mod tests {
    use super::trim_newline;

    #[test]
    fn test_trim_newline() {
        assert_eq!(trim_newline("alias\n".to_owned()), "alias");
        assert_eq!(trim_newline("alias\r\n".to_owned()), "alias");
        assert_eq!(trim_newline("alias".to_owned()), "alias");
        assert_eq!(trim_newline(" spaced \n".to_owned()), " spaced ");
    }
}
