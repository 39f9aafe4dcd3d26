//! # Lamcall
//!
//! A synchronous client for a locally running function-execution sandbox
//! (a Lambda-style runtime emulator) reachable over TCP.
//!
//! One invocation is one unit of work: connect, encode and write a single
//! call, block until the matching reply arrives, interpret it, close the
//! connection. There is no pooling, no retry, and no pipelining. The
//! deadline handed to the remote side is advisory; the client does not
//! cancel a call based on it. Callers who need an upper bound on waiting
//! can opt into socket timeouts on [`Invoker`].
//!
//! ```no_run
//! let output = lamcall::invoke("localhost:8080", b"{}", 15)?;
//! # Ok::<(), lamcall::InvokeError>(())
//! ```

mod client;
mod error;
mod transport;

pub mod deadline;


pub use crate::client::DEFAULT_DEADLINE_SECONDS;
pub use crate::client::Invoker;
pub use crate::client::invoke;
pub use crate::error::InvokeError;
pub use crate::transport::FrameError;
pub use crate::transport::MAX_FRAME_LEN;
pub use crate::transport::read_frame;
pub use crate::transport::write_frame;
