mod filter;
mod format;
mod poll;
mod present;
mod record;

pub use filter::{activation_name, filter_new_activations};
pub use format::{format_activation_header, LogLineFormatter};
pub use poll::{PollLoop, PollOptions, DEFAULT_INTERVAL_MS, DEFAULT_LIMIT};
pub use present::{ActivationPresenter, CycleContext};
pub use record::{ActivationRecord, SeenSet};
