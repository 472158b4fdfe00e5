mod calls;
mod threshold;

pub use calls::{read_calls, CallRecord, CallStatus};
pub use threshold::select_threshold;
