//! jstml CLI
//!
//! Usage:
//!   jstml --dir=src/templates > templates.js
//!   jstml --dir=src/templates --namespace=MyApp.templates > templates.js
//!   jstml --dir=src/components --component --out-dir=dist
//!
//! Options:
//!   -d, --dir <DIR>           Template directory (default: .)
//!   -n, --namespace <NS>      Root namespace (default: APP.TEMPLATE, "" for none)
//!   -x, --extension <EXT>     Template file suffix (default: .jstml)
//!   -c, --component           Compile files as components
//!   -o, --out-dir <DIR>       Output directory for component files
//!   --config <FILE>           Project configuration (TOML format)
//!   --strict                  Fail on unterminated tags
//!   -h, --help                Print help

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use jstml::project::BuildError;
use jstml::{BuildOutput, Project, ProjectConfig};

#[derive(Parser)]
#[command(name = "jstml")]
#[command(about = "JavaScript template pre-compiler with namespacing support")]
struct Cli {
    /// Template directory, searched recursively
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Root namespace for compiled templates ("" for bare functions)
    #[arg(short, long)]
    namespace: Option<String>,

    /// File name suffix of template files
    #[arg(short = 'x', long)]
    extension: Option<String>,

    /// Compile files as components (template, script and style regions)
    #[arg(short, long)]
    component: bool,

    /// Output directory for components.js and components.css
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Project configuration file (TOML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on a '<%' without matching '%>' instead of emitting it as text
    #[arg(long)]
    strict: bool,
}

impl Cli {
    /// Load the config file, if any, and apply command-line overrides
    fn project_config(&self) -> Result<ProjectConfig, BuildError> {
        let mut config = match &self.config {
            Some(path) => ProjectConfig::from_file(path)?,
            None => ProjectConfig::default(),
        };

        if let Some(dir) = &self.dir {
            config.dir = dir.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
        config.component |= self.component;
        config.compiler.strict |= self.strict;

        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprint!("{}", e.report());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BuildError> {
    let config = cli.project_config()?;
    let out_dir = config.out_dir.clone();
    let output = Project::new(config).build()?;

    match &output {
        BuildOutput::Plain(code) => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(code.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| BuildError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
        BuildOutput::Components { .. } => {
            for path in output.write_components(&out_dir)? {
                eprintln!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}
