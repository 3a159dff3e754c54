//! Parsed data files and read-only views of their nodes.
//!
//! A [`DataFile`] owns every node of a parsed file in a flat arena; a
//! [`DataNode`] is a cheap `Copy` view into it. Parent links are arena
//! indices, so cloning or moving a file can never leave a node pointing at
//! a parent that lives somewhere else.

use std::fmt;

use sky_core::Arithmetic;

use crate::parser;
use crate::trace::{DiagnosticSink, TracingSink};

#[derive(Clone, Debug, Default)]
struct NodeData {
    tokens: Vec<String>,
    children: Vec<usize>,
    parent: Option<usize>,
    line: usize,
}

/// A parsed data file: an ordered forest of top-level nodes.
#[derive(Clone, Debug, Default)]
pub struct DataFile {
    nodes: Vec<NodeData>,
    roots: Vec<usize>,
}

impl DataFile {
    /// Parses `text`, sending warnings to `tracing`.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &mut TracingSink)
    }

    /// Parses `text`, sending warnings to `sink`.
    pub fn parse_with<S: DiagnosticSink + ?Sized>(text: &str, sink: &mut S) -> Self {
        let mut file = Self::default();
        parser::parse_into(&mut file, text, sink);
        file
    }

    /// Deep copy of `node` and its descendants, with `node` as the only top-level node.
    pub fn from_subtree(node: DataNode<'_>) -> Self {
        let mut file = Self::default();
        file.copy_subtree(node, None);
        file
    }

    /// Top-level nodes in file order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = DataNode<'_>> {
        self.roots.iter().map(move |&index| DataNode { file: self, index })
    }

    /// Number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push_node(
        &mut self,
        parent: Option<usize>,
        tokens: Vec<String>,
        line: usize,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tokens,
            children: Vec::new(),
            parent,
            line,
        });
        match parent {
            Some(parent) => self.nodes[parent].children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    pub(crate) fn node(&self, index: usize) -> DataNode<'_> {
        DataNode { file: self, index }
    }

    fn copy_subtree(&mut self, source: DataNode<'_>, parent: Option<usize>) {
        let index = self.push_node(parent, source.tokens().to_vec(), source.line());
        for child in source.children() {
            self.copy_subtree(child, Some(index));
        }
    }
}

/// One line of a data file: its tokens plus the more-indented lines below it.
#[derive(Clone, Copy)]
pub struct DataNode<'a> {
    file: &'a DataFile,
    index: usize,
}

impl<'a> DataNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.file.nodes[self.index]
    }

    pub fn size(&self) -> usize {
        self.data().tokens.len()
    }

    pub fn tokens(&self) -> &'a [String] {
        &self.data().tokens
    }

    /// The token at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    pub fn token(&self, index: usize) -> &'a str {
        &self.data().tokens[index]
    }

    /// The token at `index` as a number, or 0 with a warning if it is
    /// missing or not numeric.
    pub fn value(&self, index: usize) -> f64 {
        self.value_with(&mut TracingSink, index)
    }

    pub fn value_with<S: DiagnosticSink + ?Sized>(&self, sink: &mut S, index: usize) -> f64 {
        match self.tokens().get(index) {
            Some(token) if Self::is_number_token(token) => Self::parse_value(token),
            Some(token) => {
                self.write_trace(
                    sink,
                    &format!("Error: Cannot convert value \"{token}\" to a number:"),
                );
                0.
            }
            None => {
                self.write_trace(
                    sink,
                    &format!("Error: Requested token index ({index}) is out of bounds:"),
                );
                0.
            }
        }
    }

    /// Parses `token` as a number; 0 if it is not one.
    pub fn parse_value(token: &str) -> f64 {
        if !Self::is_number_token(token) {
            return 0.;
        }
        token.parse().unwrap_or(0.)
    }

    pub fn is_number(&self, index: usize) -> bool {
        self.tokens()
            .get(index)
            .is_some_and(|token| Self::is_number_token(token))
    }

    /// Checks the number grammar: an optional sign, digits with at most one
    /// decimal point, then an optional `e`/`E` exponent with its own sign.
    /// Both the mantissa and a present exponent need at least one digit.
    pub fn is_number_token(token: &str) -> bool {
        let mut bytes = token.as_bytes();
        if let [b'+' | b'-', rest @ ..] = bytes {
            bytes = rest;
        }

        let mut digits = 0;
        let mut seen_point = false;
        while let [first, rest @ ..] = bytes {
            match first {
                b'0'..=b'9' => digits += 1,
                b'.' if !seen_point => seen_point = true,
                _ => break,
            }
            bytes = rest;
        }
        if digits == 0 {
            return false;
        }

        let [b'e' | b'E', rest @ ..] = bytes else {
            return bytes.is_empty();
        };
        bytes = rest;
        if let [b'+' | b'-', rest @ ..] = bytes {
            bytes = rest;
        }
        !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
    }

    /// The token at `index` as a boolean: `true`/`1` or `false`/`0`.
    /// Anything else is false, with a warning.
    pub fn bool_value(&self, index: usize) -> bool {
        match self.tokens().get(index).map(String::as_str) {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(token) => {
                self.print_trace(&format!(
                    "Error: Cannot convert value \"{token}\" to a boolean:"
                ));
                false
            }
            None => {
                self.print_trace(&format!(
                    "Error: Requested token index ({index}) is out of bounds:"
                ));
                false
            }
        }
    }

    pub fn is_bool(&self, index: usize) -> bool {
        matches!(
            self.tokens().get(index).map(String::as_str),
            Some("true" | "false" | "1" | "0")
        )
    }

    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn children(self) -> impl ExactSizeIterator<Item = DataNode<'a>> {
        let file = self.file;
        self.data()
            .children
            .iter()
            .map(move |&index| DataNode { file, index })
    }

    pub fn parent(&self) -> Option<DataNode<'a>> {
        self.data().parent.map(|index| self.file.node(index))
    }

    /// 1-based source line.
    pub fn line(&self) -> usize {
        self.data().line
    }

    /// Logs `message` and this node's ancestry to `tracing`. See [`DataNode::write_trace`].
    pub fn print_trace(&self, message: &str) -> usize {
        self.write_trace(&mut TracingSink, message)
    }

    /// Writes `message` (if not empty), then one line per ancestor from the
    /// top-level node down to this one, then a blank line if a message was
    /// written. Returns this node's indent: two spaces per level of depth.
    pub fn write_trace<S: DiagnosticSink + ?Sized>(&self, sink: &mut S, message: &str) -> usize {
        if !message.is_empty() {
            sink.begin_diagnostic();
            sink.log_error(message);
        }

        let parent = self.parent();
        let indent = parent.map_or(0, |parent| parent.write_trace(sink, "") + 2);
        if !self.tokens().is_empty() {
            let mut line = match parent {
                Some(_) => format!("L{}: ", self.line()),
                None => String::new(),
            };
            line.push_str(&" ".repeat(indent));
            line.push_str(&self.to_string());
            sink.log_error(&line);
        }

        if !message.is_empty() {
            sink.log_error("");
        }
        indent
    }

    /// Reads the token at `index` into `result`.
    ///
    /// On a missing or non-numeric token this logs "Missing `context`" or
    /// "Expected number for `context`", leaves `result` alone and returns false.
    pub fn expect_number<T: Arithmetic>(&self, index: usize, context: &str, result: &mut T) -> bool {
        self.expect_number_with(&mut TracingSink, index, context, result)
    }

    pub fn expect_number_with<S, T>(
        &self,
        sink: &mut S,
        index: usize,
        context: &str,
        result: &mut T,
    ) -> bool
    where
        S: DiagnosticSink + ?Sized,
        T: Arithmetic,
    {
        if index >= self.size() {
            self.write_trace(sink, &format!("Missing {context}"));
            false
        } else if !self.is_number(index) {
            self.write_trace(sink, &format!("Expected number for {context}"));
            false
        } else {
            *result = Self::parse_value(self.token(index)).cast();
            true
        }
    }

    /// True if the tokens from `start` on begin with exactly `keywords`.
    pub fn check_for_keywords<K: AsRef<str>>(&self, start: usize, keywords: &[K]) -> bool {
        let Some(window) = self
            .tokens()
            .get(start..)
            .and_then(|rest| rest.get(..keywords.len()))
        else {
            return false;
        };
        window
            .iter()
            .zip(keywords)
            .all(|(token, keyword)| token == keyword.as_ref())
    }
}

/// Tokens joined by spaces, quoted so the line would parse back the same way.
impl fmt::Display for DataNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, token) in self.tokens().iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            if token.chars().any(char::is_whitespace) {
                let quote = if token.contains('"') { '`' } else { '"' };
                write!(f, "{quote}{token}{quote}")?;
            } else {
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DataNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataNode")
            .field("line", &self.line())
            .field("tokens", &self.tokens())
            .field("children", &self.data().children.len())
            .finish()
    }
}
