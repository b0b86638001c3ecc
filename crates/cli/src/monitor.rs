//! Interactive monitor.
//!
//! Reads one command per line from stdin until `q` or end of input.

use std::io::{self, BufRead, Write};

use npcsim_core::design::Design;
use npcsim_core::{SimError, Simulator};

const HELP: &str = "\
c          continue until the program ends
si [N]     retire N instructions (default 1)
info r     print the PC and integer registers
info s     print next-PC prediction statistics
q          quit";

/// Runs the prompt loop.
///
/// A rejected run request (the program already ended) is reported and the prompt
/// continues; any other error ends the monitor.
pub fn run<D: Design>(sim: &mut Simulator<D>) -> Result<(), SimError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "(npcsim) ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let mut words = line.split_whitespace();
        let result = match (words.next(), words.next()) {
            (None, _) => Ok(()),
            (Some("c"), _) => sim.run(u64::MAX).map(|_| ()),
            (Some("si"), arg) => match arg.map_or(Ok(1), str::parse::<u64>) {
                Ok(n) => sim.run(n).map(|_| ()),
                Err(e) => {
                    println!("si: {e}");
                    Ok(())
                }
            },
            (Some("info"), Some("r")) => {
                sim.arch().dump();
                Ok(())
            }
            (Some("info"), Some("s")) => {
                print!("{}", sim.stats());
                Ok(())
            }
            (Some("q"), _) => return Ok(()),
            (Some("help"), _) => {
                println!("{HELP}");
                Ok(())
            }
            (Some(cmd), _) => {
                println!("Unknown command '{cmd}'; try 'help'");
                Ok(())
            }
        };

        match result {
            Ok(()) | Err(SimError::ProgramEnded) => {}
            Err(e) => return Err(e),
        }
    }
}
