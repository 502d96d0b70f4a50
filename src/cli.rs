//! Interactive menu for the emotion generator.
//!
//! Reads choices line by line and never exits on bad input: unknown choices
//! and non-numeric counts print an error and prompt again. End of input is
//! treated like choosing "Exit".

use crate::config::AppConfig;
use crate::emotion::{Catalog, Clock, ConsoleObserver};
use crate::error::InputError;
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RandomEmotion,
    Sequence,
    Export,
    Simulate,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::RandomEmotion),
            "2" => Ok(MenuChoice::Sequence),
            "3" => Ok(MenuChoice::Export),
            "4" => Ok(MenuChoice::Simulate),
            "5" => Ok(MenuChoice::Exit),
            other => Err(InputError::OutOfRange(other.to_string())),
        }
    }
}

/// Parse a non-negative number, using `default` for blank input.
pub fn parse_count<T: FromStr>(input: &str, default: T) -> Result<T, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

pub struct Menu<'a, R: ?Sized, C, I, O> {
    catalog: &'a Catalog,
    config: &'a AppConfig,
    rng: &'a mut R,
    clock: C,
    input: I,
    output: O,
}

impl<'a, R, C, I, O> Menu<'a, R, C, I, O>
where
    R: Rng + ?Sized,
    C: Clock + Clone,
    I: BufRead,
    O: Write,
{
    pub fn new(
        catalog: &'a Catalog,
        config: &'a AppConfig,
        rng: &'a mut R,
        clock: C,
        input: I,
        output: O,
    ) -> Self {
        Self {
            catalog,
            config,
            rng,
            clock,
            input,
            output,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Show the menu and serve choices until Exit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "🎭 LumoFace Emotion Generator")?;
        writeln!(self.output, "1. Generate random emotion")?;
        writeln!(self.output, "2. Generate emotion sequence")?;
        writeln!(self.output, "3. Export emotions to JSON")?;
        writeln!(self.output, "4. Simulate robot behavior")?;
        writeln!(self.output, "5. Exit")?;

        loop {
            let line = match self.prompt("\nEnter your choice (1-5): ")? {
                Some(line) => line,
                None => break,
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    tracing::debug!("Rejected menu input: {}", e);
                    writeln!(self.output, "❌ Invalid choice. Please try again.")?;
                    continue;
                }
            };

            match choice {
                MenuChoice::RandomEmotion => self.random_emotion()?,
                MenuChoice::Sequence => {
                    if !self.sequence()? {
                        break;
                    }
                }
                MenuChoice::Export => self.export()?,
                MenuChoice::Simulate => {
                    if !self.simulate()? {
                        break;
                    }
                }
                MenuChoice::Exit => break,
            }
        }

        writeln!(self.output, "👋 Goodbye!")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Prompt until a valid number (or blank for `default`) is entered.
    /// `None` means input ended.
    fn prompt_number<T: FromStr + Copy>(&mut self, text: &str, default: T) -> io::Result<Option<T>> {
        loop {
            let line = match self.prompt(text)? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse_count(&line, default) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "❌ {}. Please enter a whole number.", e)?,
            }
        }
    }

    fn random_emotion(&mut self) -> io::Result<()> {
        match self.catalog.draw_record(&mut *self.rng) {
            Ok(record) => writeln!(
                self.output,
                "🎲 Random emotion: {} {}",
                record.icon, record.display_name
            ),
            Err(e) => writeln!(self.output, "❌ {}", e),
        }
    }

    fn sequence(&mut self) -> io::Result<bool> {
        let prompt = format!(
            "How many emotions? (default {}): ",
            self.config.default_sequence_count
        );
        let count = match self.prompt_number(&prompt, self.config.default_sequence_count)? {
            Some(count) => count,
            None => return Ok(false),
        };

        match self.catalog.generate_sequence(count, &mut *self.rng) {
            Ok(sequence) => {
                writeln!(self.output, "\n🎭 Emotion Sequence:")?;
                for (i, item) in sequence.iter().enumerate() {
                    writeln!(self.output, "{:2}. {}", i + 1, item)?;
                }
            }
            Err(e) => writeln!(self.output, "❌ {}", e)?,
        }
        Ok(true)
    }

    fn export(&mut self) -> io::Result<()> {
        let path = &self.config.export_path;
        match self.catalog.export_to_file(path) {
            Ok(()) => writeln!(self.output, "Emotions exported to {}", path.display()),
            Err(e) => {
                tracing::error!("Catalog export failed: {}", e);
                writeln!(self.output, "❌ Failed to export emotions: {}", e)
            }
        }
    }

    fn simulate(&mut self) -> io::Result<bool> {
        let prompt = format!(
            "Simulation duration in seconds (default {}): ",
            self.config.default_simulation_secs
        );
        let secs = match self.prompt_number(&prompt, self.config.default_simulation_secs)? {
            Some(secs) => secs,
            None => return Ok(false),
        };

        let mut console = ConsoleObserver::new(&mut self.output);
        if let Err(e) =
            self.catalog
                .run_simulation(secs, &mut *self.rng, self.clock.clone(), &mut console)
        {
            writeln!(self.output, "❌ {}", e)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choice_parses_digits_with_whitespace() {
        assert_eq!(" 1\n".parse::<MenuChoice>(), Ok(MenuChoice::RandomEmotion));
        assert_eq!("5".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
    }

    #[test]
    fn menu_choice_rejects_out_of_range() {
        assert_eq!(
            "6".parse::<MenuChoice>(),
            Err(InputError::OutOfRange("6".to_string()))
        );
        assert!("abc".parse::<MenuChoice>().is_err());
        assert!("".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn parse_count_uses_default_for_blank() {
        assert_eq!(parse_count("\n", 10usize), Ok(10));
        assert_eq!(parse_count("   ", 60u64), Ok(60));
    }

    #[test]
    fn parse_count_reads_numbers() {
        assert_eq!(parse_count(" 3 \n", 10usize), Ok(3));
        assert_eq!(parse_count("0", 10usize), Ok(0));
    }

    #[test]
    fn parse_count_rejects_garbage_and_negatives() {
        assert_eq!(
            parse_count("ten", 10usize),
            Err(InputError::NotANumber("ten".to_string()))
        );
        assert!(parse_count("-2", 10usize).is_err());
        assert!(parse_count("2.5", 10u64).is_err());
    }
}
