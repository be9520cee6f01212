#![allow(clippy::module_inception)]

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Source position, 1-based. Either half may be unknown for synthesized nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: Option<u32>,
    pub col: Option<u32>,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Position {
            row: Some(row),
            col: Some(col),
        }
    }

    pub fn null() -> Self {
        Position { row: None, col: None }
    }

    pub fn is_null(&self) -> bool {
        self.row.is_none() && self.col.is_none()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.row, self.col) {
            (Some(row), Some(col)) => write!(f, "row: {}, col: {}", row, col),
            (Some(row), None) => write!(f, "row: {}", row),
            (None, Some(col)) => write!(f, "col: {}", col),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the text of the 1-based `row` in `content`, without its line terminator.
pub fn get_line_at_row(content: &str, row: u32) -> Option<String> {
    content
        .lines()
        .nth(row.checked_sub(1)? as usize)
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_row() {
        let content = "Hello, world!\nsecond\n\nTesting { }\n";

        assert_eq!(super::get_line_at_row(content, 1).as_deref(), Some("Hello, world!"));
        assert_eq!(super::get_line_at_row(content, 4).as_deref(), Some("Testing { }"));
        assert_eq!(super::get_line_at_row(content, 3).as_deref(), Some(""));
        assert_eq!(super::get_line_at_row(content, 9), None);
        assert_eq!(super::get_line_at_row(content, 0), None);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(super::Position::new(3, 7).to_string(), "row: 3, col: 7");
        assert_eq!(super::Position::null().to_string(), "<unknown>");
    }
}

pub fn display_error(error: &Error, file_name: &str, content: &str) {
    /*
        Error: message
        -> final.mel
           |
        20 | int a = "x";
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file_name);

    let (Some(row), col) = error
        .get_position()
        .map(|position| (position.row, position.col))
        .unwrap_or((None, None))
    else {
        eprintln!("   {}", error);
        return;
    };

    let Some(line_text) = get_line_at_row(content, row) else {
        eprintln!("   {}", error);
        return;
    };

    let line_string = row.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    if let Some(col) = col {
        let arrows = (col as usize).saturating_sub(removed_whitespace).max(1);
        eprintln!("{:>padding$} {:->arrows$}", "|", "^");
    }
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
