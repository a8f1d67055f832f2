#![forbid(unsafe_code)]
use std::path::{Path, PathBuf};
use std::{env, ffi, fs, io};

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trielzw::{frame, CodeWidth, Configuration, Decoder, DEFAULT_CODESIZE};

fn main() -> CodingResult {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lzw=info,trielzw=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> anyhow::Result<()> {
    if !flags.input.is_file() {
        bail!("file '{}' does not exist", flags.input.display());
    }
    if same_file(&flags.input, &flags.output)? {
        bail!(
            "refusing to overwrite the input '{}' with its own output",
            flags.input.display()
        );
    }

    let config = match flags.style {
        CodeWidth::Static => Configuration::new(flags.max_bits),
        CodeWidth::Dynamic => Configuration::with_dynamic_size(flags.max_bits),
    };

    let input = fs::read(&flags.input)
        .with_context(|| format!("failed to read '{}'", flags.input.display()))?;

    // The output is only touched once coding succeeded.
    let output = match flags.operation {
        Operation::Compress => compress(config, &input)?,
        Operation::Decompress => decompress(config, &input)?,
    };
    fs::write(&flags.output, &output)
        .with_context(|| format!("failed to write '{}'", flags.output.display()))?;

    let (read, written) = (input.len(), output.len());
    tracing::info!(
        input = %flags.input.display(),
        output = %flags.output.display(),
        read,
        written,
        "{} done",
        flags.operation.name()
    );
    println!(
        "{} -> {} bytes ({:.1}%) saved to '{}'",
        read,
        written,
        ratio(read, written),
        flags.output.display()
    );
    Ok(())
}

fn same_file(input: &Path, output: &Path) -> anyhow::Result<bool> {
    if !output.exists() {
        return Ok(false);
    }
    let input = fs::canonicalize(input)
        .with_context(|| format!("failed to resolve '{}'", input.display()))?;
    let output = fs::canonicalize(output)
        .with_context(|| format!("failed to resolve '{}'", output.display()))?;
    Ok(input == output)
}

fn compress(config: Configuration, data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let compressed = config.build_encoder()?.encode(data)?;
    let mut framed = Vec::new();
    match config.width() {
        CodeWidth::Static => frame::write_static(&mut framed, &compressed.codes, config.max_bits())?,
        CodeWidth::Dynamic => frame::write_dynamic(&mut framed, &compressed)?,
    }
    Ok(framed)
}

fn decompress(config: Configuration, framed: &[u8]) -> anyhow::Result<Vec<u8>> {
    let (decoder, codes) = match config.width() {
        CodeWidth::Static => {
            let decoder = config.build_decoder()?;
            (decoder, frame::read_static(framed, config.max_bits())?)
        }
        CodeWidth::Dynamic => {
            // The stream knows its own code size.
            let compressed = frame::read_dynamic(framed)?;
            let decoder = Decoder::with_dynamic_size(compressed.bits)?;
            (decoder, compressed.codes)
        }
    };

    Ok(decoder.decode(&codes)?)
}

fn ratio(read: usize, written: usize) -> f64 {
    if read == 0 {
        100.0
    } else {
        written as f64 * 100.0 / read as f64
    }
}

struct Flags {
    input: PathBuf,
    output: PathBuf,
    operation: Operation,
    max_bits: u8,
    style: CodeWidth,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Compress => "compression",
            Operation::Decompress => "decompression",
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress and decompress files with LZW")
        .arg(
            clap::Arg::new("operation")
                .required(true)
                .value_parser(["compress", "decompress"]),
        )
        .arg(
            clap::Arg::new("input")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("output")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("max_bits")
                .short('b')
                .long("max-bits")
                .help("Maximum code size in bits (9 to 16)")
                .default_value("12")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            clap::Arg::new("dynamic")
                .short('d')
                .long("dynamic")
                .help("Grow the code size from 9 bits and record it in the output")
                .action(clap::ArgAction::SetTrue),
        )
}

impl Flags {
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Self {
        let matches = command().get_matches_from(args);

        let operation = match matches.get_one::<String>("operation").map(String::as_str) {
            Some("compress") => Operation::Compress,
            Some("decompress") => Operation::Decompress,
            _ => unreachable!("unparsed operation"),
        };

        let style = if matches.get_flag("dynamic") {
            CodeWidth::Dynamic
        } else {
            CodeWidth::Static
        };

        Flags {
            input: matches.get_one::<PathBuf>("input").cloned().unwrap_or_default(),
            output: matches.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
            operation,
            max_bits: matches
                .get_one::<u8>("max_bits")
                .copied()
                .unwrap_or(DEFAULT_CODESIZE),
            style,
        }
    }
}

enum CodingResult {
    Ok,
    Err(anyhow::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> anyhow::Result<()>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("error: {:#}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{command, run_coding, Flags, Operation};
    use std::fs;
    use std::path::Path;
    use trielzw::CodeWidth;

    fn flags(operation: Operation, input: &Path, output: &Path) -> Flags {
        Flags {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            operation,
            max_bits: 12,
            style: CodeWidth::Static,
        }
    }

    #[test]
    fn command_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = ["lzw", "compress", "in.txt", "out.lzw", "--max-bits", "14", "--dynamic"];
        let flags = Flags::from_args(args.iter().map(Into::into));
        assert!(matches!(flags.operation, Operation::Compress));
        assert_eq!(flags.max_bits, 14);
        assert_eq!(flags.style, CodeWidth::Dynamic);
        assert_eq!(flags.input.to_str(), Some("in.txt"));
    }

    #[test]
    fn defaults() {
        let args = ["lzw", "decompress", "in.lzw", "out.txt"];
        let flags = Flags::from_args(args.iter().map(Into::into));
        assert!(matches!(flags.operation, Operation::Decompress));
        assert_eq!(flags.max_bits, 12);
        assert_eq!(flags.style, CodeWidth::Static);
    }

    #[test]
    fn compress_into_own_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, b"TOBEORNOTTOBEORTOBEORNOT").unwrap();

        assert!(run_coding(flags(Operation::Compress, &path, &path)).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"TOBEORNOTTOBEORTOBEORNOT");

        // Spelled differently, still the same file.
        let indirect = dir.path().join(".").join("data.txt");
        assert!(run_coding(flags(Operation::Compress, &path, &indirect)).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"TOBEORNOTTOBEORTOBEORNOT");
    }

    #[test]
    fn failed_decode_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corrupt.lzw");
        let output = dir.path().join("out.txt");
        // 'A' followed by a code nothing could have registered yet.
        fs::write(&input, [0x00, 0x41, 0x0f, 0xff]).unwrap();
        fs::write(&output, b"previous").unwrap();

        let err = run_coding(flags(Operation::Decompress, &input, &output)).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid code 4095"), "{:#}", err);
        assert_eq!(fs::read(&output).unwrap(), b"previous");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("data.txt");
        let packed = dir.path().join("data.lzw");
        let unpacked = dir.path().join("data.out");
        let data: Vec<u8> = b"abracadabra ".iter().copied().cycle().take(5000).collect();
        fs::write(&original, &data).unwrap();

        for &style in &[CodeWidth::Static, CodeWidth::Dynamic] {
            let mut compress = flags(Operation::Compress, &original, &packed);
            compress.style = style;
            run_coding(compress).unwrap();
            assert!(fs::metadata(&packed).unwrap().len() < data.len() as u64);

            let mut decompress = flags(Operation::Decompress, &packed, &unpacked);
            decompress.style = style;
            run_coding(decompress).unwrap();
            assert_eq!(fs::read(&unpacked).unwrap(), data);
        }
    }
}
