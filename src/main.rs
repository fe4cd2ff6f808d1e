//! CLI entry point for `mimetree`.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use humansize::{format_size, BINARY};

use mimetree::config::{Config, View};
use mimetree::{Input, Message, MessageParser};

#[derive(Parser)]
#[command(
    name = "mimetree",
    version,
    about = "Parse RFC 822 / MIME messages and inspect their structure"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Message file to open (`-` or omitted reads stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the message in canonical wire form
    Render { path: PathBuf },
    /// Show the part tree
    Tree {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the headers of the message or one of its parts
    Headers {
        path: PathBuf,
        /// Part path such as `1.0` (zero-based, dot-separated)
        #[arg(long)]
        part: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mimetree::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Render { path }) => cmd_render(&path, &config),
        Some(Commands::Tree { path, json }) => cmd_tree(&path, json, &config),
        Some(Commands::Headers { path, part, json }) => {
            cmd_headers(&path, part.as_deref(), json, &config)
        }
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => {
            let path = cli.file.unwrap_or_else(|| PathBuf::from("-"));
            match config.output.default_view {
                View::Render => cmd_render(&path, &config),
                View::Tree => cmd_tree(&path, false, &config),
                View::Json => cmd_tree(&path, true, &config),
            }
        }
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = mimetree::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mimetree.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read and parse a message from `path`, or from stdin for `-`.
fn load_message(path: &Path, config: &Config) -> anyhow::Result<Message> {
    let parser = MessageParser::new(config.parse_options());

    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        let text = String::from_utf8_lossy(&data);
        return Ok(parser.parse(Input::Text(&text), true)?);
    }

    Ok(mimetree::parse_file(path, config.parse_options())?)
}

/// Parse a dot-separated part path such as `1.0`.
fn parse_part_path(spec: &str) -> anyhow::Result<Vec<usize>> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }
    spec.split('.')
        .map(|index| {
            index
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("Invalid part path '{spec}'"))
        })
        .collect()
}

fn format_part_path(path: &[usize]) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn cmd_render(path: &Path, config: &Config) -> anyhow::Result<()> {
    let message = load_message(path, config)?;
    print!("{message}");
    Ok(())
}

fn cmd_tree(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let message = load_message(path, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    let registry = config.registry();
    for (part_path, node) in message.walk() {
        let indent = "  ".repeat(part_path.len());
        let media = node.media_type(&registry);
        let size = format_size(node.render().len(), BINARY);

        match node {
            Message::Simple(simple) => println!(
                "{indent}{:<8} {:<28} {:>3} headers {:>6} lines {:>10}",
                format_part_path(&part_path),
                media.name,
                simple.headers().len(),
                simple.body().len(),
                size
            ),
            Message::Multipart(multi) => {
                println!(
                    "{indent}{:<8} {:<28} {:>3} headers {:>6} parts {:>10}  boundary={}",
                    format_part_path(&part_path),
                    media.name,
                    multi.headers().len(),
                    multi.parts().len(),
                    size,
                    multi.boundary()
                );
                if config.output.show_preamble
                    && (!multi.preamble().is_empty() || !multi.epilogue().is_empty())
                {
                    println!(
                        "{indent}  (preamble {} lines, epilogue {} lines)",
                        multi.preamble().len(),
                        multi.epilogue().len()
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_headers(
    path: &Path,
    part: Option<&str>,
    json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let message = load_message(path, config)?;
    let part_path = parse_part_path(part.unwrap_or_default())?;
    let Some(node) = message.part(&part_path) else {
        anyhow::bail!("No part at '{}'", format_part_path(&part_path));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(node.headers())?);
        return Ok(());
    }

    for header in node.headers() {
        println!("{}: {}", header.name(), header.value().value());
        for (name, value) in header.parameters() {
            println!("    {name} = {}", value.value());
        }
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mimetree", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
