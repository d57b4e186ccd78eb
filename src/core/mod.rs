pub mod bounds;
pub mod process;
pub mod slice;
pub mod thread;
pub mod types;

pub use bounds::Bounds;
pub use process::Process;
pub use slice::Slice;
pub use thread::Thread;
pub use types::{ContainerRef, ProcessId, SliceId, SliceRef, ThreadId, ThreadRef};
