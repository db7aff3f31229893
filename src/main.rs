//! Purpose: `linkprobe` CLI entry point: chain checks, attribute queries,
//! header emission.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (JSON, or raw header text).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `core::error::to_exit_code`.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod report_json;

use linkprobe::core::attr::{BuildRole, Linkage, PlatformFamily, symbol_attr};
use linkprobe::core::buildenv::{BuildEnv, LibToken};
use linkprobe::core::chain::{Expectations, run_chain, verify};
use linkprobe::core::error::{Error, ErrorKind, to_exit_code};
use linkprobe::core::header::{CFunction, HeaderSpec, fixture_header};
use report_json::{attr_json, chain_report_json, header_written_json};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage).with_message(err.to_string()));
            }
        },
    };

    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Attr(args) => run_attr(args),
        Command::Header(args) => run_header(args),
    }
}

#[derive(Parser)]
#[command(
    name = "linkprobe",
    version,
    about = "Cross-platform linkage-verification fixtures",
    after_help = r#"EXAMPLES
  $ linkprobe check
  $ linkprobe check --expect-bar 457        # model a stale consumer
  $ linkprobe attr --platform windows --linkage dynamic --role owning
  $ BAR_BUILD=1 linkprobe attr --lib bar --from-env
  $ linkprobe header bar --out include/bar"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the fixture chain (foo, bar, target) and report per-symbol results
    Check(CheckArgs),
    /// Compute the visibility decoration for a build configuration
    Attr(AttrArgs),
    /// Emit the C header carrying a library's export-macro contract
    Header(HeaderArgs),
}

#[derive(Args)]
struct CheckArgs {
    #[arg(long, help = "Expected return value of foo() (default: 123)")]
    expect_foo: Option<i32>,
    #[arg(long, help = "Expected return value of bar() (default: 456)")]
    expect_bar: Option<i32>,
    #[arg(long, help = "Expected return value of target() (default: 789)")]
    expect_target: Option<i32>,
    #[arg(long, help = "Suppress the JSON report; rely on the exit code")]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PlatformArg {
    Windows,
    Attribute,
    Host,
}

impl PlatformArg {
    fn family(self) -> PlatformFamily {
        match self {
            PlatformArg::Windows => PlatformFamily::Windows,
            PlatformArg::Attribute => PlatformFamily::Attribute,
            PlatformArg::Host => PlatformFamily::host(),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LinkageArg {
    Static,
    Dynamic,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RoleArg {
    Owning,
    Consuming,
}

#[derive(Args)]
struct AttrArgs {
    #[arg(long, value_enum, default_value = "host", help = "Linker family")]
    platform: PlatformArg,
    #[arg(long, value_enum, conflicts_with = "from_env")]
    linkage: Option<LinkageArg>,
    #[arg(long, value_enum, conflicts_with = "from_env")]
    role: Option<RoleArg>,
    #[arg(long, requires = "from_env", help = "Library token, e.g. bar")]
    lib: Option<String>,
    #[arg(
        long,
        requires = "lib",
        help = "Resolve linkage and role from <LIB>_STATIC / <LIB>_BUILD"
    )]
    from_env: bool,
}

#[derive(Args)]
struct HeaderArgs {
    /// Library token: a shipped fixture (bar, foo, target) or a new name
    lib: String,
    #[arg(long, help = "Write to this file or directory instead of stdout")]
    out: Option<PathBuf>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Declare `int NAME();` (required for non-fixture libraries)"
    )]
    function: Vec<String>,
    #[arg(long, help = "Include-guard prefix (default: LINKPROBE)")]
    guard_prefix: Option<String>,
}

fn run_check(args: CheckArgs) -> Result<RunOutcome, Error> {
    let mut expect = Expectations::default();
    if let Some(foo) = args.expect_foo {
        expect.foo = foo;
    }
    if let Some(bar) = args.expect_bar {
        expect.bar = bar;
    }
    if let Some(target) = args.expect_target {
        expect.target = target;
    }

    let report = run_chain(&expect);
    if !args.quiet {
        println!("{}", chain_report_json(&report)?);
    }
    verify(&report)?;
    Ok(RunOutcome::ok())
}

fn run_attr(args: AttrArgs) -> Result<RunOutcome, Error> {
    let platform = args.platform.family();
    let (linkage, role) = if args.from_env {
        let lib = args
            .lib
            .as_deref()
            .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("--from-env requires --lib"))?;
        let lib = LibToken::new(lib)?;
        let env = BuildEnv::from_process_env(&lib);
        debug!(lib = %lib, ?env, "resolved build environment");
        (env.linkage, env.role)
    } else {
        let linkage = args.linkage.ok_or_else(|| {
            Error::new(ErrorKind::Usage).with_message("either --linkage/--role or --lib --from-env")
        })?;
        let role = args.role.ok_or_else(|| {
            Error::new(ErrorKind::Usage).with_message("either --linkage/--role or --lib --from-env")
        })?;
        let linkage = match linkage {
            LinkageArg::Static => Linkage::Static,
            LinkageArg::Dynamic => Linkage::Dynamic,
        };
        let role = match role {
            RoleArg::Owning => BuildRole::Owning,
            RoleArg::Consuming => BuildRole::Consuming,
        };
        (linkage, role)
    };

    let attr = symbol_attr(platform, linkage, role);
    println!("{}", attr_json(platform, linkage, role, attr));
    Ok(RunOutcome::ok())
}

fn run_header(args: HeaderArgs) -> Result<RunOutcome, Error> {
    let lib = LibToken::new(&args.lib)?;
    let mut spec = match fixture_header(&lib) {
        Some(spec) => spec,
        None => {
            if args.function.is_empty() {
                return Err(Error::new(ErrorKind::Usage).with_message(format!(
                    "{lib} is not a shipped fixture; declare its functions with --function"
                )));
            }
            HeaderSpec::new(lib.as_str())?
        }
    };
    for name in &args.function {
        spec = spec.function(CFunction::new("int", name));
    }
    if let Some(prefix) = args.guard_prefix {
        spec = spec.guard_prefix(prefix);
    }

    let text = spec.render();
    match args.out {
        None => print!("{text}"),
        Some(out) => {
            let path = if out.is_dir() {
                out.join(spec.file_name())
            } else {
                out
            };
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|err| {
                        Error::new(ErrorKind::Io)
                            .with_message(format!("failed to create {}", parent.display()))
                            .with_source(err)
                    })?;
                }
            }
            std::fs::write(&path, &text).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to write {}", path.display()))
                    .with_source(err)
            })?;
            println!(
                "{}",
                header_written_json(spec.lib().as_str(), &path, text.len())
            );
        }
    }
    Ok(RunOutcome::ok())
}

fn emit_error(err: &Error) {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.to_string()));
    if let Some(symbol) = err.symbol() {
        inner.insert("symbol".to_string(), json!(symbol));
    }
    if let Some(variable) = err.variable() {
        inner.insert("variable".to_string(), json!(variable));
    }
    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    eprintln!("{}", Value::Object(outer));
}
