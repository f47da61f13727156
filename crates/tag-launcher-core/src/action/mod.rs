mod action_spec;
mod action_type;
mod builtin;
mod key_name;

pub use {
    action_spec::{ActionSpec, is_url},
    action_type::ActionType,
    builtin::BuiltinCommand,
    key_name::KeyName,
};
