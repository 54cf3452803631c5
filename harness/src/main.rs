use clap::{Parser, Subcommand};
use harness::report::{exit_code, EXIT_ERROR};
use harness::{
    detect_interpreter, Overrides, Report, ReportFormat, SampleVerifier, Settings,
    SubprocessRunner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Checks that a README's code sample still prints its documented results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, run and check the sample in a documentation file
    Verify {
        /// Directory containing the documentation file
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Documentation file name, relative to the directory
        #[arg(short, long)]
        file: Option<String>,
        /// Settings file (defaults to readme-sample.toml in the directory, if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Fence language tag of the sample
        #[arg(short, long)]
        language: Option<String>,
        /// Stop the sample at the first closing fence
        #[arg(long)]
        lazy: bool,
        /// Interpreter to run the sample with
        #[arg(short, long)]
        interpreter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Exit non-zero when no sample is found
        #[arg(long)]
        fail_on_skip: bool,
    },
    /// Show the interpreter samples would run with
    Interpreters,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            dir,
            file,
            config,
            language,
            lazy,
            interpreter,
            format,
            fail_on_skip,
        } => {
            let options = VerifyOptions {
                dir,
                file,
                config,
                language,
                lazy,
                interpreter,
                format,
                fail_on_skip,
            };
            match run_verify(options) {
                Ok(code) => ExitCode::from(code),
                Err(e) => {
                    error!("{}", e);
                    eprintln!("Error: {e}");
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Commands::Interpreters => {
            let interpreter = detect_interpreter();
            if interpreter.is_available() {
                println!("{}", interpreter.command());
                ExitCode::SUCCESS
            } else {
                println!("No Python interpreter found (tried python3, python)");
                ExitCode::FAILURE
            }
        }
    }
}

struct VerifyOptions {
    dir: PathBuf,
    file: Option<String>,
    config: Option<PathBuf>,
    language: Option<String>,
    lazy: bool,
    interpreter: Option<String>,
    format: ReportFormat,
    fail_on_skip: bool,
}

fn run_verify(options: VerifyOptions) -> Result<u8, Box<dyn std::error::Error>> {
    let mut settings = match &options.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(&options.dir)?,
    };
    settings.apply_overrides(Overrides {
        file: options.file,
        language: options.language,
        lazy: options.lazy,
        interpreter: options.interpreter,
    })?;

    let document = options.dir.join(&settings.verifier.document_name);
    let runner = SubprocessRunner::new(settings.runner);
    let verifier = SampleVerifier::new(settings.verifier, runner);

    let result = verifier.verify(&options.dir);
    let code = exit_code(&result, options.fail_on_skip);
    match result {
        Ok(verdict) => {
            let report = Report::new(document, verdict);
            print!("{}", report.render(options.format)?);
            if options.format == ReportFormat::Json {
                println!();
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
        }
    }

    Ok(code)
}
