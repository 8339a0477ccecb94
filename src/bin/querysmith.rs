//! synthesize every operation of a graphql schema
//!
//! reads a schema from a file or url and writes one operation document per
//! root field into `<dest>/queries`, `<dest>/mutations`, and
//! `<dest>/subscriptions`, with an `index.json` next to them.

use clap::Parser;
use querysmith::{
    write_documents, Error, Generator, GeneratorConfig, Result, SchemaSource, TypeGraph,
    DEFAULT_DEPTH_LIMIT, DEFAULT_FILE_EXTENSION,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate exhaustive GraphQL operations from a schema
#[derive(Debug, Parser)]
#[command(name = "querysmith", version, about, long_about = None)]
struct Args {
    /// Schema SDL file
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    schema: Option<PathBuf>,

    /// Fetch the schema SDL from this http(s) url
    #[arg(long)]
    url: Option<String>,

    /// Bearer token sent with --url
    #[arg(long, requires = "url")]
    token: Option<String>,

    /// Destination directory for generated files
    #[arg(long, required_unless_present = "stdout")]
    dest: Option<PathBuf>,

    /// Maximum selection depth
    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    depth_limit: usize,

    /// Include fields marked @deprecated
    #[arg(long)]
    include_deprecated: bool,

    /// Allow re-entering (type, field) edges already visited
    #[arg(long)]
    include_cross_references: bool,

    /// Extension of generated files
    #[arg(long, default_value = DEFAULT_FILE_EXTENSION)]
    ext: String,

    /// Skip schema validation
    #[arg(long)]
    assume_valid: bool,

    /// Print documents to stdout instead of writing files
    #[arg(long, conflicts_with = "dest")]
    stdout: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("querysmith=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let source = match (&args.schema, &args.url) {
        (Some(path), _) => SchemaSource::file(path),
        (None, Some(url)) => SchemaSource::url(url, args.token.clone())?,
        (None, None) => {
            return Err(Error::Config("--schema or --url is required".to_string()));
        }
    };

    let config = GeneratorConfig::new()
        .with_depth_limit(args.depth_limit)
        .with_deprecated_fields(args.include_deprecated)
        .with_cross_references(args.include_cross_references)
        .with_file_extension(args.ext)
        .with_assume_valid(args.assume_valid);

    tracing::info!("loading schema from {source}");
    let sdl = source.load()?;
    let graph = TypeGraph::build(&sdl, config.assume_valid())?;
    let generator = Generator::new(&graph, config)?;
    let documents = generator.documents();

    if args.stdout {
        for doc in &documents {
            println!("{}\n", doc.text);
        }
        return Ok(());
    }

    if let Some(dest) = &args.dest {
        write_documents(dest, &documents, generator.config().file_extension())?;
    }
    Ok(())
}
