mod command_line;
mod definition;
mod registry;

pub use {
    command_line::{CommandLine, build_command_line, quote, split_command_line},
    definition::{ArgValue, ArgumentSpec, ArgumentType, CloseOnLaunch, EmulatorDefinition},
    registry::EmulatorRegistry,
};
