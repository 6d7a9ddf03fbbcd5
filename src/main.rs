//! nitf-band - read single bands out of NITF image data.
//!
//! This binary wires the configuration to a band source and streams the
//! band's bytes to a file or stdout.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nitf_bandio::{
    config::{Backend, BandArgs, Cli, Command, ExtractConfig, SizeConfig},
    create_s3_client, AccessMode, BandSource, ByteStream, Error, ErrorKind, FileStream,
    HandleSource, MemorySource, Result, S3Stream, StreamSource,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract(config) => run_extract(config),
        Command::Size(config) => run_size(config),
    }
}

// =============================================================================
// Extract Command
// =============================================================================

fn run_extract(config: ExtractConfig) -> ExitCode {
    init_logging(config.band.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match extract(&config) {
        Ok(written) => {
            info!(bytes = written, input = %config.band.input, "band extracted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn extract(config: &ExtractConfig) -> Result<u64> {
    // Kept alive for as long as an S3 stream may use it.
    let runtime = s3_runtime(&config.band)?;
    let mut input = Input::open(&config.band, runtime.as_ref())?;
    let mut output = open_output(config)?;

    let written = {
        let mut band = input.band_source(&config.band)?;
        let total = match config.length {
            Some(length) => length,
            None => band.size()?,
        };
        debug!(total, chunk_size = config.chunk_size, "extracting band");

        let mut buf = vec![0u8; config.chunk_size];
        let mut written = 0u64;
        while written < total {
            let len = (total - written).min(buf.len() as u64) as usize;
            band.read(&mut buf[..len])?;
            output
                .write_all(&buf[..len])
                .map_err(|e| Error::from_io(ErrorKind::Write, "output", e))?;
            written += len as u64;
        }
        written
    };

    output
        .flush()
        .map_err(|e| Error::from_io(ErrorKind::Write, "output", e))?;
    input.close()?;
    Ok(written)
}

fn open_output(config: &ExtractConfig) -> Result<Box<dyn Write>> {
    if config.writes_to_stdout() {
        return Ok(Box::new(std::io::stdout().lock()));
    }

    let mut path = config.output.clone().unwrap_or_default();
    if path.is_dir() {
        path = path.join(config.default_output_name());
    }
    let file = File::create(&path).map_err(|e| {
        Error::from_io(ErrorKind::OpeningResource, &path.display().to_string(), e)
    })?;
    info!(path = %path.display(), "writing band");
    Ok(Box::new(std::io::BufWriter::new(file)))
}

// =============================================================================
// Size Command
// =============================================================================

fn run_size(config: SizeConfig) -> ExitCode {
    init_logging(config.band.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = s3_runtime(&config.band).and_then(|runtime| {
        let mut input = Input::open(&config.band, runtime.as_ref())?;
        let size = input.band_source(&config.band)?.size()?;
        input.close()?;
        Ok(size)
    });

    match result {
        Ok(size) => {
            println!("{}", size);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Input Handling
// =============================================================================

/// The resource a band source reads from, owned for the whole command.
enum Input {
    Path(PathBuf),
    Stream(Box<dyn ByteStream>),
    Memory(Vec<u8>),
}

impl Input {
    fn open(args: &BandArgs, runtime: Option<&Runtime>) -> Result<Self> {
        if let (Some((bucket, key)), Some(runtime)) = (args.s3_location(), runtime) {
            let client =
                runtime.block_on(create_s3_client(args.s3_endpoint.as_deref(), &args.s3_region));
            let stream = S3Stream::open(client, runtime.handle().clone(), bucket, key)?;
            return Ok(Input::Stream(Box::new(stream)));
        }

        let path = Path::new(&args.input);
        match args.backend {
            Backend::Handle => Ok(Input::Path(path.to_path_buf())),
            Backend::Stream => Ok(Input::Stream(Box::new(FileStream::open(
                path,
                AccessMode::ReadOnly,
            )?))),
            Backend::Memory => std::fs::read(path).map(Input::Memory).map_err(|e| {
                Error::from_io(ErrorKind::OpeningResource, &path.display().to_string(), e)
            }),
        }
    }

    fn band_source<'a>(&'a mut self, args: &BandArgs) -> Result<Box<dyn BandSource + 'a>> {
        let (start, bpp, skip) = (args.start, args.bytes_per_pixel, args.pixel_skip);
        let source: Box<dyn BandSource + 'a> = match self {
            Input::Path(path) => Box::new(HandleSource::open(path, start, bpp, skip)?),
            Input::Stream(stream) => Box::new(StreamSource::new(stream, start, bpp, skip)?),
            Input::Memory(data) => Box::new(MemorySource::new(data, start, bpp, skip)?),
        };
        Ok(source)
    }

    fn close(&mut self) -> Result<()> {
        match self {
            Input::Stream(stream) => stream.close(),
            Input::Path(_) | Input::Memory(_) => Ok(()),
        }
    }
}

/// A runtime for the S3 SDK, only when the input is an S3 object.
fn s3_runtime(args: &BandArgs) -> Result<Option<Runtime>> {
    if args.s3_location().is_none() {
        return Ok(None);
    }
    Runtime::new()
        .map(Some)
        .map_err(|e| Error::from_io(ErrorKind::Unknown, "tokio runtime", e))
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so that band bytes can be written to stdout.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "nitf_bandio=debug,nitf_band=debug"
    } else {
        "nitf_bandio=info,nitf_band=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
