use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use clap::Parser;
use console::Term;
use miette::{IntoDiagnostic, Result, WrapErr};

/// Convert TGA images into a level description for the game.
///
/// In the images a black pixel means no tile, a red pixel the starting
/// tile, a cyan pixel the end tile and a white pixel an ordinary tile.
#[derive(Parser, Debug)]
#[command(name = "levelgen")]
#[command(about, version, long_about = None)]
struct Cli {
    /// Output file for the level list, or "-" for standard output
    output: String,
    /// TGA images to convert, one level each
    #[arg(required = true)]
    images: Vec<String>,
}

pub fn main() -> Result<()> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp
                | clap::error::ErrorKind::DisplayVersion => 0,
                // Usage problems exit with code 1, like every other fatal path.
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    let stderr = Term::stderr();

    let mut out: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        let file = File::create(&cli.output)
            .into_diagnostic()
            .wrap_err_with(|| format!("couldn't open {}", cli.output))?;
        Box::new(BufWriter::new(file))
    };

    let mut processed: u32 = 0;
    let mut skipped: u32 = 0;

    level::write_preamble(&mut out).into_diagnostic()?;
    for (index, path) in cli.images.iter().enumerate() {
        stderr
            .write_line(&format!("[{}] Processing {}", index + 1, path))
            .into_diagnostic()?;

        match process(&mut out, path).into_diagnostic()? {
            Ok(()) => processed += 1,
            Err(reason) => {
                stderr.write_line(&reason).into_diagnostic()?;
                skipped += 1;
            }
        }
    }
    level::write_trailer(&mut out).into_diagnostic()?;
    out.flush().into_diagnostic()?;

    stderr
        .write_line(&format!(
            "{} files: {} processed, {} skipped",
            processed + skipped,
            processed,
            skipped
        ))
        .into_diagnostic()?;

    Ok(())
}

/// Convert a single image and append its record to the output stream.
///
/// The outer error is fatal (the shared output stream broke); the inner one
/// is the per-file skip message, which leaves the run going.
fn process<W: Write>(out: &mut W, path: &str) -> io::Result<core::result::Result<(), String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return Ok(Err(format!("Couldn't open {}. Skipping.", path))),
    };

    let image = match tga::decode(BufReader::new(file)) {
        Ok(image) => image,
        Err(err) => {
            return Ok(Err(format!("Error reading TGA {}: {}. Skipping.", path, err)));
        }
    };

    let record = match level::extract(&image, path) {
        Ok(record) => record,
        Err(err) => return Ok(Err(format!("Error: {} contains {}. Skipping.", path, err))),
    };

    level::write_level(out, &record)?;
    out.flush()?;
    Ok(Ok(()))
}
