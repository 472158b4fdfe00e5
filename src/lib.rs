pub mod calling;
pub mod cli;
pub mod commands;
pub mod support;
pub mod utils;
pub mod workflows;
pub mod writers;
