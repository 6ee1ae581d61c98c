//! Compiling a directory of templates into one output
//!
//! Every file under the template directory whose name ends with the
//! configured extension is compiled independently. Its namespace path comes
//! from its location: the directories between the template root and the
//! file become dotted segments and the camel-cased file stem becomes the
//! function name, so `user/profile-card.jstml` under `APP.TEMPLATE` is
//! mounted at `APP.TEMPLATE.user.profileCard`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::component::compile_component;
use crate::config::{ConfigError, ProjectConfig};
use crate::error::CompileError;
use crate::namespace::{camel_case, expand_namespace, join_path};
use crate::template::TemplateCompiler;

/// File receiving component module code
pub const COMPONENT_SCRIPT_FILE: &str = "components.js";

/// File receiving scoped component styles
pub const COMPONENT_STYLE_FILE: &str = "components.css";

/// Errors that can occur while building a project
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to compile '{}': {error}", path.display())]
    Compile {
        path: PathBuf,
        /// Template text, kept for source-context reports
        text: String,
        #[source]
        error: CompileError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BuildError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Human-readable report; compile errors include the offending source line
    pub fn report(&self) -> String {
        match self {
            Self::Compile { path, text, error } => {
                error.format(text, &path.display().to_string())
            }
            other => format!("Error: {}\n", other),
        }
    }
}

/// A template file and the names derived from its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub path: PathBuf,
    /// Camel-cased file stem
    pub function_name: String,
    /// Dotted path below the root namespace, e.g. `user.profileCard`
    pub full_name: String,
}

impl TemplateSource {
    /// Derive names for `path`, a file somewhere under `root`
    pub fn new(root: &Path, path: &Path, extension: &str) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);

        let folders: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(extension)
            .unwrap_or(&file_name)
            .to_string();

        let function_name = camel_case(&stem);
        let full_name = join_path(&folders.join("."), &function_name);

        Self {
            path: path.to_path_buf(),
            function_name,
            full_name,
        }
    }
}

/// Aggregated generated code for all files, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutput {
    /// Namespaced template functions
    Plain(String),
    /// Component modules and their scoped styles
    Components { script: String, style: String },
}

impl BuildOutput {
    /// Write component output into `out_dir`, creating it if needed
    ///
    /// Plain output has no files of its own and is left to the caller.
    pub fn write_components(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let BuildOutput::Components { script, style } = self else {
            return Ok(Vec::new());
        };

        fs::create_dir_all(out_dir).map_err(|e| BuildError::io(out_dir, e))?;

        let mut written = Vec::new();
        for (name, content) in [(COMPONENT_SCRIPT_FILE, script), (COMPONENT_STYLE_FILE, style)] {
            let path = out_dir.join(name);
            fs::write(&path, content).map_err(|e| BuildError::io(&path, e))?;
            log::info!("wrote {} ({} bytes)", path.display(), content.len());
            written.push(path);
        }
        Ok(written)
    }
}

/// Recursively find files under `dir` whose name ends with `extension`
///
/// Directory entries are visited in name order so the result does not
/// depend on the platform's listing order.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, BuildError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| BuildError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BuildError::io(dir, e))?;
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        let file_type = fs::metadata(&path).map_err(|e| BuildError::io(&path, e))?;
        if file_type.is_dir() {
            files.extend(discover(&path, extension)?);
        } else if file_type.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(extension))
        .unwrap_or(false)
}

/// A template directory compiled with one configuration
#[derive(Debug, Clone)]
pub struct Project {
    config: ProjectConfig,
}

impl Project {
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Template files of this project with their derived names
    pub fn sources(&self) -> Result<Vec<TemplateSource>, BuildError> {
        let files = discover(&self.config.dir, &self.config.extension)?;
        log::debug!(
            "found {} template(s) under {}",
            files.len(),
            self.config.dir.display()
        );
        Ok(files
            .iter()
            .map(|path| TemplateSource::new(&self.config.dir, path, &self.config.extension))
            .collect())
    }

    /// Read and compile every template file
    pub fn build(&self) -> Result<BuildOutput, BuildError> {
        let mut output = self.empty_output();
        let sources = self.sources()?;

        for source in &sources {
            let text = fs::read_to_string(&source.path).map_err(|e| BuildError::io(&source.path, e))?;
            self.compile_into(source, &text, &mut output)
                .map_err(|error| BuildError::Compile {
                    path: source.path.clone(),
                    text,
                    error,
                })?;
        }

        log::info!(
            "compiled {} template(s) from {}",
            sources.len(),
            self.config.dir.display()
        );
        Ok(output)
    }

    fn empty_output(&self) -> BuildOutput {
        if self.config.component {
            BuildOutput::Components {
                script: String::new(),
                style: String::new(),
            }
        } else {
            BuildOutput::Plain(String::new())
        }
    }

    /// Compile one file's text and append the result to `output`
    pub fn compile_into(
        &self,
        source: &TemplateSource,
        text: &str,
        output: &mut BuildOutput,
    ) -> Result<(), CompileError> {
        log::debug!("compiling {} as {}", source.path.display(), source.full_name);
        let namespaced = join_path(&self.config.namespace, &source.full_name);

        match output {
            BuildOutput::Plain(code) => {
                let compiler = TemplateCompiler::new(self.config.compiler.clone());
                let function = compiler.compile_function(&source.function_name, text)?;
                if !self.config.namespace.is_empty() {
                    code.push_str(&expand_namespace(&namespaced)?.prefix());
                }
                code.push_str(&function);
            }
            BuildOutput::Components { script, style } => {
                let compiled = compile_component(text, &namespaced, &self.config.compiler)?;
                script.push_str(&compiled.script);
                style.push_str(&compiled.style);
            }
        }
        Ok(())
    }
}
