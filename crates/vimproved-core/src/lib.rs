// Vimproved Core Library
// Dual-role key state machines and the event-stream filter around them

pub mod config;
pub mod event;
pub mod intercept;
pub mod interceptor;
pub mod key;
pub mod modifier;
pub mod stream;

pub use config::{load_or_default, Config, ConfigError};
pub use event::{tap_combo, Direction, Event, EventKind};
pub use intercept::{Behavior, Emitted, Intercept, InterceptSpec, SpecError, State};
pub use interceptor::Interceptor;
pub use key::{key_from_name, key_name, Key};
pub use modifier::{is_modifier, is_modifier_code};
pub use stream::{run_filter, EventReader, EventWriter, StreamError, EVENT_SIZE};
