mod desktop;
mod dispatcher;

pub use {
    desktop::Desktop,
    dispatcher::{Dispatched, Dispatcher},
};
