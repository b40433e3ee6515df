/// A destination for log messages.
///
/// `M` is the message type and `D` the caller-defined mode (for example
/// "standard" vs "error"). Sinks never interpret the mode themselves; they
/// hand it to their logging action.
pub trait LogSink<M, D>: Send + Sync {
    /// Accepts a message. Never fails; after [`close`](Self::close) the call
    /// is accepted and ignored.
    fn log(&self, message: M, mode: Option<D>);

    /// Accepts a message in the default mode.
    fn log_message(&self, message: M) {
        self.log(message, None);
    }

    /// Finishes all accepted work and runs the close action once. Later calls
    /// do nothing.
    fn close(&self);
}
