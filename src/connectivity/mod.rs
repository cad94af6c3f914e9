// Gateway module for connectivity - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod arbiter;
mod probe;
mod transport;

// Public re-exports - the ONLY way to access connectivity functionality
pub use arbiter::{Mode, ModeArbiter, ModePreference};
pub use probe::{ConnectivityProbe, Reachability};
pub use transport::{NetTransport, Transport};
