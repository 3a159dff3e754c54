//! Destinations for data-file diagnostics.
//!
//! Parsing never fails on bad input. Problems are written as a message plus
//! the offending node's ancestry ("trace") to a [`DiagnosticSink`], and the
//! caller keeps going with defaults.

/// Receives diagnostic output one line at a time.
pub trait DiagnosticSink {
    /// Writes one line of diagnostic output.
    fn log_error(&mut self, line: &str);

    /// Marks the start of a new diagnostic, before its first line.
    fn begin_diagnostic(&mut self) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn log_error(&mut self, line: &str) {
        (**self).log_error(line);
    }

    fn begin_diagnostic(&mut self) {
        (**self).begin_diagnostic();
    }
}

/// Forwards diagnostics to `tracing` at warn level. Blank separator lines are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log_error(&mut self, line: &str) {
        if !line.is_empty() {
            tracing::warn!(target: "sky_data::trace", "{line}");
        }
    }
}

impl DiagnosticSink for Vec<String> {
    fn log_error(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Collects the output as newline-terminated text.
impl DiagnosticSink for String {
    fn log_error(&mut self, line: &str) {
        self.push_str(line);
        self.push('\n');
    }
}

/// Counts diagnostics while passing every line through to `inner`.
#[derive(Debug, Default)]
pub struct CountingSink<S> {
    inner: S,
    count: usize,
}

impl<S: DiagnosticSink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    /// Number of diagnostics started so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for CountingSink<S> {
    fn log_error(&mut self, line: &str) {
        self.inner.log_error(line);
    }

    fn begin_diagnostic(&mut self) {
        self.count += 1;
        self.inner.begin_diagnostic();
    }
}
