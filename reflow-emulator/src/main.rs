mod plant;
mod session;
mod store;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use session::Session;

fn main() -> io::Result<()> {
    let profile_dir = parse_profile_dir().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: reflow-emulator [--profiles <dir>]");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(profile_dir);
    let mut line = String::new();

    writeln!(
        writer,
        "Reflow Oven Emulator ready. Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_profile_dir() -> Result<PathBuf, String> {
    let mut args = env::args().skip(1);
    if let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--profiles=") {
            Ok(PathBuf::from(value))
        } else if arg == "--profiles" {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| "Expected value after --profiles".to_string())
        } else {
            Err(format!("Unknown argument `{arg}`"))
        }
    } else {
        Ok(PathBuf::from("profiles"))
    }
}
