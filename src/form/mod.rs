mod binder;
mod clock;
mod field;

pub use binder::{DEFAULT_DEBOUNCE, FormBinder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use field::{BindingKind, BindingView, FieldBinding, SyncPhase, SyncPolicy};
