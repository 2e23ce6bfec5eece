//! Command-line interface module
//!
//! This module handles CLI argument parsing using Clap and the interactive menu.

pub mod args;
pub mod interactive;

pub use args::{AnalyzeArgs, Cli, CopyArgs, FixArgs, GenerateArgs, ScanArgs, SubCommand};
pub use interactive::{InteractiveSession, MainMenuOption};
