//! Output and error sinks shared between commands.
//!
//! A [`Sink`] is a shared writer handle. Commands hold optional overrides and
//! resolve the effective sink through their parent chain, ending at the
//! [`Streams`] injected into the root.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Shared writer handle
pub type Sink = Rc<RefCell<dyn Write>>;

/// Wrap any writer into a [`Sink`]
pub fn sink<W: Write + 'static>(writer: W) -> Sink {
    Rc::new(RefCell::new(writer))
}

/// Sink writing to the process standard output
pub fn stdout_sink() -> Sink {
    sink(io::stdout())
}

/// Sink writing to the process standard error
pub fn stderr_sink() -> Sink {
    sink(io::stderr())
}

/// In-memory sink that keeps a readable handle to its bytes.
///
/// Cloning shares the same buffer, so one clone can be handed to a command
/// while the other is used to inspect what was written.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink view over the same buffer
    pub fn sink(&self) -> Sink {
        self.buffer.clone()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySink")
            .field("len", &self.buffer.borrow().len())
            .finish()
    }
}

/// Fallback output and error sinks used by a command without a parent
#[derive(Clone)]
pub struct Streams {
    pub out: Sink,
    pub err: Sink,
}

impl Streams {
    pub fn new(out: Sink, err: Sink) -> Self {
        Self { out, err }
    }

    /// Process standard output and standard error
    pub fn stdio() -> Self {
        Self::new(stdout_sink(), stderr_sink())
    }
}

impl Default for Streams {
    fn default() -> Self {
        Self::stdio()
    }
}

impl fmt::Debug for Streams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Streams").finish_non_exhaustive()
    }
}

/// Write formatted text to a sink and flush it
pub fn write_to(sink: &Sink, args: fmt::Arguments<'_>) -> io::Result<()> {
    let mut writer = sink.borrow_mut();
    writer.write_fmt(args)?;
    writer.flush()
}
