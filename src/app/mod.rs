mod state;

pub use state::{App, AuthField, AuthMode, Dialog, Focus, Mode, Screen};
