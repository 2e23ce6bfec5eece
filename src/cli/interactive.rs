//! Interactive mode for esp-certkit

use crate::cert_ops::runner::{default_targets, run_analyze, run_fix, FixOptions};
use crate::config::Settings;
use crate::utils::progress::{print_fail, print_warning};
use crate::utils::{CertKitError, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

/// Main menu options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    Analyze,
    Fix,
    Exit,
}

impl MainMenuOption {
    pub const ALL: [MainMenuOption; 3] = [
        MainMenuOption::Analyze,
        MainMenuOption::Fix,
        MainMenuOption::Exit,
    ];
}

impl std::fmt::Display for MainMenuOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainMenuOption::Analyze => write!(f, "1 - Analyze files (no changes)"),
            MainMenuOption::Fix => write!(f, "2 - Fix and overwrite files"),
            MainMenuOption::Exit => write!(f, "3 - Exit"),
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> CertKitError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            CertKitError::UserCancelled
        }
        other => CertKitError::ReadError {
            path: "<terminal>".into(),
            message: other.to_string(),
        },
    }
}

/// Interactive session state
pub struct InteractiveSession {
    pub theme: ColorfulTheme,
    pub settings: Settings,
}

impl InteractiveSession {
    pub fn new(settings: Settings) -> Self {
        InteractiveSession {
            theme: ColorfulTheme::default(),
            settings,
        }
    }

    /// Run the interactive session
    pub fn run(&self) -> Result<()> {
        self.print_welcome();

        let files = default_targets(&self.settings.paths)?;

        match self.show_main_menu()? {
            MainMenuOption::Analyze => {
                run_analyze(&files, false)?;
            }
            MainMenuOption::Fix => {
                println!();
                print_warning("This overwrites the original files!");
                if !self.confirm_overwrite()? {
                    print_fail("Operation cancelled");
                    return Err(CertKitError::UserCancelled);
                }

                run_fix(&files, &FixOptions::default())?;

                println!("\n{}", style("Next steps:").bold());
                println!("  1. Arduino IDE: Tools > ESP32 Sketch Data Upload");
                println!("  2. Or upload the data directory manually with esptool.py");
                println!("  3. Build and flash the sketch to the ESP32");
            }
            MainMenuOption::Exit => {
                println!("\n{}", style("Goodbye!").cyan());
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", style("═".repeat(60)).cyan());
        println!("{}", style("  ESP32 certificate fixer").cyan().bold());
        println!("{}", style("═".repeat(60)).cyan());
        println!();
    }

    fn show_main_menu(&self) -> Result<MainMenuOption> {
        let options = MainMenuOption::ALL;

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Choose an option")
            .items(&options)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        Ok(options[selection])
    }

    fn confirm_overwrite(&self) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt("Continue?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_is_numbered_in_order() {
        let labels: Vec<String> = MainMenuOption::ALL.iter().map(|o| o.to_string()).collect();
        assert!(labels[0].starts_with("1 - Analyze"));
        assert!(labels[1].starts_with("2 - Fix"));
        assert!(labels[2].starts_with("3 - Exit"));
    }

    #[test]
    fn test_interrupted_prompt_is_cancellation() {
        let err = prompt_error(dialoguer::Error::IO(std::io::Error::from(
            std::io::ErrorKind::Interrupted,
        )));
        assert!(matches!(err, CertKitError::UserCancelled));
    }
}
