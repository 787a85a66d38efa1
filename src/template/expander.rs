//! # Template Expansion
//!
//! A command template is parsed once into literal and placeholder segments.
//! Expansion walks the cross product of the placeholder value lists with the
//! placeholder that occurs first in the template as the outermost loop and
//! the last-discovered one varying fastest:
//!
//! ```text
//! "create %{x} %{y}"   x = [1, 2]   y = [a, b]
//!
//!   create 1 a
//!   create 1 b
//!   create 2 a
//!   create 2 b
//! ```
//!
//! Every occurrence of the same placeholder receives the same value within
//! one generated command. A placeholder bound to no values makes the whole
//! expansion empty.

use super::variables::VariableSet;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Index into `CommandTemplate::placeholders`
    Placeholder(usize),
}

/// A command line with zero or more `%{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    raw: String,
    segments: Vec<Segment>,
    /// Distinct placeholder names in first-occurrence order
    placeholders: Vec<String>,
}

impl CommandTemplate {
    /// Parse a template string into segments
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut segments = Vec::new();
        let mut placeholders: Vec<String> = Vec::new();
        let mut cursor = 0;

        for caps in PLACEHOLDER.captures_iter(&raw) {
            let Some(marker) = caps.get(0) else { continue };
            if marker.start() > cursor {
                segments.push(Segment::Literal(raw[cursor..marker.start()].to_string()));
            }

            let name = &caps[1];
            let index = match placeholders.iter().position(|p| p == name) {
                Some(index) => index,
                None => {
                    placeholders.push(name.to_string());
                    placeholders.len() - 1
                }
            };
            segments.push(Segment::Placeholder(index));
            cursor = marker.end();
        }

        if cursor < raw.len() {
            segments.push(Segment::Literal(raw[cursor..].to_string()));
        }

        Self {
            raw,
            segments,
            placeholders,
        }
    }

    /// Build a template from the raw tokens following the `--` marker,
    /// prefixed with the control-plane binary
    pub fn from_tokens<S: AsRef<str>>(binary: &str, tokens: &[S]) -> Self {
        let body = tokens
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self::parse(format!("{binary} {body}"))
    }

    /// The template text as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Distinct placeholder names, in the order they first occur
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// True when the template contains no placeholder at all
    pub fn is_concrete(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Number of commands `expand` will produce for these variables
    pub fn expansion_len(&self, variables: &VariableSet) -> usize {
        self.placeholders
            .iter()
            .map(|name| variables.values(name).len())
            .try_fold(1usize, usize::checked_mul)
            .unwrap_or(usize::MAX)
    }

    /// Generate every concrete command, in cross-product order
    pub fn expand(&self, variables: &VariableSet) -> Vec<String> {
        if self.is_concrete() {
            return vec![self.raw.clone()];
        }

        let lists: Vec<&[String]> = self
            .placeholders
            .iter()
            .map(|name| variables.values(name))
            .collect();
        if lists.iter().any(|values| values.is_empty()) {
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(self.expansion_len(variables).min(4096));
        let mut indices = vec![0usize; lists.len()];
        loop {
            commands.push(self.render(&lists, &indices));

            // Odometer increment: the last placeholder turns fastest.
            let mut position = lists.len();
            loop {
                if position == 0 {
                    return commands;
                }
                position -= 1;
                indices[position] += 1;
                if indices[position] < lists[position].len() {
                    break;
                }
                indices[position] = 0;
            }
        }
    }

    fn render(&self, lists: &[&[String]], indices: &[usize]) -> String {
        let mut command = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => command.push_str(text),
                Segment::Placeholder(index) => command.push_str(&lists[*index][indices[*index]]),
            }
        }
        command
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
