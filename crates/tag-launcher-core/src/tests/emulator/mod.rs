mod command_line;
mod definition;
mod registry;
