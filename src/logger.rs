// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::log_record::LogRecord;
use std::fmt::Debug;

/**
Where a [`Log`](crate::Log) sends its records.

Implementations are best-effort sinks: none of these methods report failure,
and none may block waiting on another writer.
*/
pub trait Logger: Debug + Send + Sync {
    /**
        Submits the log record for logging.
    */
    fn finish_log_record(&self, record: LogRecord);

    /**
    Submits the log record for logging asynchronously.

    Loggers may choose to implement this as a simple wrapper around [Self::finish_log_record] if they wish.
    */
    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 's>>;

    /**
    The application may imminently exit.  Write out whatever can be written without waiting.
    */
    fn prepare_to_die(&self);

    /**
    Whether the writer should also show lines on the console.
    */
    fn echoes_to_console(&self) -> bool {
        false
    }
}

/*
Boilerplate notes.

# Logger

I don't think Clone on Logger makes sense, a sink usually owns a file handle or a buffer.
PartialEq and Eq: data equality or "same file"?  Unclear, so no.
Default is not sensible since a file sink needs a path.
Send/Sync are required: one sink is shared by every writer in the process.
*/
