//! Output sinks for runtime serialization
//!
//! Containers and generated values write through `OutputSink`; the engine
//! itself performs no other I/O.

use crate::error::Result;

/// Destination for serialized output
pub trait OutputSink {
    /// Write text as-is
    fn write(&mut self, text: &str) -> Result<()>;

    /// Write text followed by a newline
    fn write_line(&mut self, text: &str) -> Result<()>;
}

/// Sink collecting output into an owned string
#[derive(Debug, Default)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected output
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume the sink, returning the collected output
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl OutputSink for StringSink {
    fn write(&mut self, text: &str) -> Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_sink_accumulates() {
        let mut sink = StringSink::new();
        sink.write("<a>").unwrap();
        sink.write("1").unwrap();
        sink.write("</a>").unwrap();
        assert_eq!(sink.as_str(), "<a>1</a>");
    }

    #[test]
    fn test_write_line() {
        let mut sink = StringSink::new();
        sink.write_line("<a/>").unwrap();
        assert_eq!(sink.into_string(), "<a/>\n");
    }
}
