use serio::{IoSink, IoStream};

use crate::ThreadId;

/// A thread context.
///
/// A context binds one party's protocol execution to the I/O channel connecting
/// it to its peer. The protocols in this workspace are strictly sequential per
/// party, so a context carries no forking machinery: one logical thread, one
/// ordered channel.
pub trait Context: Send {
    /// I/O channel used by the thread.
    type Io: IoSink + IoStream + Send + Unpin + 'static;

    /// Returns the thread ID.
    fn id(&self) -> &ThreadId;

    /// Returns a mutable reference to the thread's I/O channel.
    fn io_mut(&mut self) -> &mut Self::Io;
}
