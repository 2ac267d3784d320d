use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use kgen::{generator, isr::Emitter};

mod commands;
mod logger;

use commands::{Arguments, Command};

/// Open the file given with `-o`, or stdout
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            info!("Writing to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn run<W: Write>(args: Arguments, out: &mut W) -> Result<()> {
    let fallback = args.address.unwrap_or_default();

    let written = match args.command {
        None => {
            let emitter = Emitter::new(Default::default())
                .context("Invalid ISR table configuration")?;
            generator::write_all(fallback.0, &emitter, out)
        }
        Some(Command::Decompose { address }) => {
            let address = address.unwrap_or(fallback);
            info!("Decomposing {}", address);
            generator::write_address(address.0, out)
        }
        Some(Command::Isr(isr)) => {
            let emitter = Emitter::new(isr.config()).context("Invalid ISR table configuration")?;
            info!("Emitting ISR table with the {} strategy", emitter.config().strategy);
            emitter.emit(out)
        }
    };
    written.context("Failed to write generated source")?;

    out.flush().context("Failed to flush generated source")
}

fn main() -> Result<()> {
    let args = Arguments::parse();

    logger::enable_logging(args.verbosity)?;

    debug!("{:#?}", args);

    let mut out = open_output(args.output.as_deref())?;
    run(args, &mut out)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn run_to_string(argv: &[&str]) -> Result<String> {
        let args = Arguments::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_default_output() {
        let output = run_to_string(&["kgen"]).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 513);
        assert_eq!(lines[0], "0-0-1ff-0-0");
        assert_eq!(lines[1], "GLOBAL_IDT.kernelISR(0, isr0);");
        assert_eq!(lines[512].split_whitespace().nth(2), Some("isr255(InterruptFrame*"));
    }

    #[test]
    fn test_default_output_with_address() {
        let output = run_to_string(&["kgen", "--address", "0x7FBFC8000000"]).unwrap();
        assert_eq!(output.lines().next(), Some("ff-ff-40-0-0"));
        assert_eq!(output.lines().count(), 513);
    }

    #[test]
    fn test_decompose() {
        assert_eq!(run_to_string(&["kgen", "decompose"]).unwrap(), "0-0-1ff-0-0\n");
        assert_eq!(
            run_to_string(&["kgen", "decompose", "0x7FBFC8000000"]).unwrap(),
            "ff-ff-40-0-0\n"
        );
        assert_eq!(
            run_to_string(&["kgen", "-a", "0xFFFF_8000_DEAD_BEEF", "decompose"]).unwrap(),
            "100-3-f5-db-eef\n"
        );
    }

    #[test]
    fn test_decompose_negative() {
        assert_eq!(
            run_to_string(&["kgen", "decompose", "-1"]).unwrap(),
            "1ff-1ff-1ff-1ff-fff\n"
        );
        assert_eq!(
            run_to_string(&["kgen", "--address", "-1", "decompose"]).unwrap(),
            "1ff-1ff-1ff-1ff-fff\n"
        );
    }

    #[test]
    fn test_decompose_wide_literal() {
        // 2^64 + 0x7FBFC8000000
        assert_eq!(
            run_to_string(&["kgen", "decompose", "0x1_0000_7FBF_C800_0000"]).unwrap(),
            "ff-ff-40-0-0\n"
        );
    }

    #[test]
    fn test_bad_handler_is_rejected() {
        let err = run_to_string(&["kgen", "isr", "--handler", "not valid"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid ISR table configuration");
        assert!(format!("{:#}", err).contains("`not valid` is not a valid identifier"));
    }

    #[test]
    fn test_output_file() {
        let path = env::temp_dir().join(format!("kgen-output-{}.inc", process::id()));
        let argv = ["kgen", "-o", path.to_str().unwrap(), "isr", "-s", "naked"];
        let args = Arguments::try_parse_from(argv).unwrap();

        let mut out = open_output(args.output.as_deref()).unwrap();
        run(args, &mut out).unwrap();
        drop(out);

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(written.lines().count(), 512);
        assert_eq!(written.lines().next(), Some("GLOBAL_IDT.kernelISR(0, isr0);"));
        assert!(written.ends_with("jmp isrCommonStub\"); }\n"));
    }

    #[test]
    fn test_output_file_bad_directory() {
        let path = env::temp_dir()
            .join(format!("kgen-missing-{}", process::id()))
            .join("out.inc");
        let err = open_output(Some(path.as_path())).err().unwrap();
        assert!(err.to_string().starts_with("Failed to create"));
    }
}
