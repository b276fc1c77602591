//! Command tree and recursive dispatch.
//!
//! A [`Command`] is a cheap handle to a node. Parents own their children
//! through the children map; the link back to the parent is weak and only
//! used to resolve output and error sinks.

use crate::core::stream::{Sink, Streams};
use clap::ArgMatches;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Handler invoked with the resolved command and the remaining arguments
pub type Handler<E> = Rc<dyn Fn(&Command<E>, &[String]) -> Result<(), E>>;

struct Node<E> {
    name: String,
    handler: Option<Handler<E>>,
    flags: RefCell<clap::Command>,
    children: RefCell<HashMap<String, Command<E>>>,
    parent: RefCell<Weak<Node<E>>>,
    out: RefCell<Option<Sink>>,
    err: RefCell<Option<Sink>>,
    defaults: Streams,
}

/// Named node in a command tree
pub struct Command<E = anyhow::Error> {
    node: Rc<Node<E>>,
}

impl<E> Clone for Command<E> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<E> Command<E> {
    /// Create a command with a handler, falling back to stdio sinks
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Command<E>, &[String]) -> Result<(), E> + 'static,
    {
        Self::build(name.into(), Some(Rc::new(handler)), Streams::stdio())
    }

    /// Create a command with a handler and explicit fallback sinks.
    ///
    /// The fallback sinks are only consulted while the command has no parent,
    /// which makes this the constructor for roots.
    pub fn with_streams<F>(name: impl Into<String>, handler: F, streams: Streams) -> Self
    where
        F: Fn(&Command<E>, &[String]) -> Result<(), E> + 'static,
    {
        Self::build(name.into(), Some(Rc::new(handler)), streams)
    }

    /// Create a command without a handler.
    ///
    /// Useful for intermediate nodes that only route. Dispatch must never
    /// stop at such a node, see [`Command::execute`].
    pub fn group(name: impl Into<String>) -> Self {
        Self::build(name.into(), None, Streams::stdio())
    }

    fn build(name: String, handler: Option<Handler<E>>, defaults: Streams) -> Self {
        let flags = clap::Command::new(name.clone());
        Self {
            node: Rc::new(Node {
                name,
                handler,
                flags: RefCell::new(flags),
                children: RefCell::new(HashMap::new()),
                parent: RefCell::new(Weak::new()),
                out: RefCell::new(None),
                err: RefCell::new(None),
                defaults,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn has_handler(&self) -> bool {
        self.node.handler.is_some()
    }

    /// Whether both handles refer to the same node
    pub fn same_node(&self, other: &Command<E>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Attach `cmd` as a child, keyed by its name.
    ///
    /// A child already registered under the same name is replaced. The
    /// replaced node keeps its parent link; nothing clears it.
    pub fn add_command(&self, cmd: Command<E>) {
        *cmd.node.parent.borrow_mut() = Rc::downgrade(&self.node);
        trace!(parent = %self.name(), child = %cmd.name(), "attaching command");
        self.node
            .children
            .borrow_mut()
            .insert(cmd.node.name.clone(), cmd);
    }

    /// Builder form of [`Command::add_command`]
    pub fn subcommand(self, cmd: Command<E>) -> Self {
        self.add_command(cmd);
        self
    }

    /// Child registered under `name`
    pub fn sub_command(&self, name: &str) -> Option<Command<E>> {
        self.node.children.borrow().get(name).cloned()
    }

    /// Children sorted by name
    pub fn children(&self) -> Vec<Command<E>> {
        let mut children: Vec<_> = self.node.children.borrow().values().cloned().collect();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        children
    }

    /// Current parent, if it is still alive
    pub fn parent(&self) -> Option<Command<E>> {
        self.node
            .parent
            .borrow()
            .upgrade()
            .map(|node| Command { node })
    }

    /// Names from the root down to this command, joined by spaces
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{} {}", parent.path(), self.name()),
            None => self.name().to_string(),
        }
    }

    /// Route `args` to the deepest matching command and run its handler.
    ///
    /// `args[0]` is this command's own name. While there is a next word and a
    /// child of that name exists, dispatch moves to the child with the slice
    /// shifted by one. The handler's result is returned unchanged.
    ///
    /// Recursion only happens while `args.len() > 1`, so it terminates even
    /// if the tree contains a cycle.
    ///
    /// # Panics
    ///
    /// Panics if the selected command was built with [`Command::group`] and
    /// therefore has no handler.
    pub fn execute(&self, args: &[String]) -> Result<(), E> {
        if args.len() > 1 {
            if let Some(sub) = self.sub_command(&args[1]) {
                trace!(from = %self.name(), to = %sub.name(), "descending");
                return sub.execute(&args[1..]);
            }
        }

        debug!(command = %self.name(), argc = args.len(), "dispatching to handler");
        match &self.node.handler {
            Some(handler) => handler(self, args),
            None => panic!("command '{}' has no handler", self.name()),
        }
    }

    /// Collect `args` and dispatch them with [`Command::execute`]
    pub fn execute_from<I, T>(&self, args: I) -> Result<(), E>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.execute(&args)
    }

    pub fn set_output_stream(&self, out: Sink) {
        *self.node.out.borrow_mut() = Some(out);
    }

    pub fn set_error_stream(&self, err: Sink) {
        *self.node.err.borrow_mut() = Some(err);
    }

    /// Effective output sink: own override, then the parent's, then the
    /// fallback streams
    pub fn output_stream(&self) -> Sink {
        if let Some(out) = self.node.out.borrow().as_ref() {
            return Rc::clone(out);
        }
        match self.parent() {
            Some(parent) => parent.output_stream(),
            None => Rc::clone(&self.node.defaults.out),
        }
    }

    /// Effective error sink, resolved like [`Command::output_stream`]
    pub fn error_stream(&self) -> Sink {
        if let Some(err) = self.node.err.borrow().as_ref() {
            return Rc::clone(err);
        }
        match self.parent() {
            Some(parent) => parent.error_stream(),
            None => Rc::clone(&self.node.defaults.err),
        }
    }

    /// Replace the flag set with the result of `define`.
    ///
    /// The flag set starts as an empty `clap::Command` named after this command.
    pub fn with_flags<F>(self, define: F) -> Self
    where
        F: FnOnce(clap::Command) -> clap::Command,
    {
        let current = self.node.flags.take();
        *self.node.flags.borrow_mut() = define(current);
        self
    }

    /// Parse `args` against this command's flag set.
    ///
    /// `args[0]` is taken as the command name, the way handlers receive it.
    pub fn parse_flags(&self, args: &[String]) -> Result<ArgMatches, clap::Error> {
        self.node
            .flags
            .borrow_mut()
            .try_get_matches_from_mut(args)
    }
}

impl<E> fmt::Debug for Command<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut children: Vec<String> = self.node.children.borrow().keys().cloned().collect();
        children.sort();
        f.debug_struct("Command")
            .field("name", &self.node.name)
            .field("has_handler", &self.has_handler())
            .field("children", &children)
            .finish()
    }
}
