pub mod clock;
pub mod countdown;
pub mod settings;
pub mod store;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use countdown::{Frame, IndicatorState};
pub use settings::{PLACEHOLDER, Settings};
pub use store::{LoadStatus, SettingsStore, StoreError};
pub use validate::ValidationError;
