//! Deploy configuration from YAML

use crate::actions::{
    Action, ExternalTool, Invocation, MoveByGlob, RecreateSymlink, Sequence, WriteTemplate,
};
use crate::core::{DeployError, FailurePolicy, Pipeline, Step};
use crate::interaction::Migrations;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File looked up in the project root when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "deploy.yaml";

/// Message shown once every step has finished
pub const DONE_MESSAGE: &str = "Done!";

/// Top-level deploy configuration
///
/// Every field has a default, so an empty file (or no file) describes the
/// standard layout. Relative paths resolve against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Static templates copied over the generated config files
    pub templates: TemplatePaths,

    /// Generated config files
    pub outputs: OutputPaths,

    /// Server error pages moved into the public directory
    pub error_pages: ErrorPagesConfig,

    /// Which web root name is linked to the public directory
    pub web_root: WebRoot,

    /// The project's public directory, the symlink target
    pub public_dir: PathBuf,

    pub commands: CommandsConfig,

    pub permissions: PermissionsConfig,

    /// Editor command line for the post-deploy edit prompts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    pub environment: PathBuf,
    pub client: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub environment: PathBuf,
    pub client: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorPagesConfig {
    /// Directory the pattern and destination are relative to
    pub working_dir: PathBuf,
    pub pattern: String,
    pub destination: PathBuf,
}

/// Name of the server web root that points at the public directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebRoot {
    /// `private_html`, the secure (HTTPS) web root
    #[default]
    Private,
    /// `public_html`
    Public,
}

impl WebRoot {
    pub fn dir_name(&self) -> &'static str {
        match self {
            WebRoot::Private => "private_html",
            WebRoot::Public => "public_html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Dependency installation
    pub install: Invocation,

    /// Cache optimization, route caching and cache clearing, in order
    pub optimize: Vec<Invocation>,

    /// Run right after the environment config is written, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_key: Option<Invocation>,

    /// Database migration refresh
    pub migrate: Invocation,

    /// Appended to `migrate` when seeders should run too
    pub seed_flag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Mode applied to every directory
    pub directories: String,
    /// Mode applied to every file
    pub files: String,
    /// Subtree that gets a broader mode afterwards
    pub writable: WritableConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritableConfig {
    pub path: PathBuf,
    pub mode: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            templates: TemplatePaths::default(),
            outputs: OutputPaths::default(),
            error_pages: ErrorPagesConfig::default(),
            web_root: WebRoot::default(),
            public_dir: PathBuf::from("public"),
            commands: CommandsConfig::default(),
            permissions: PermissionsConfig::default(),
            editor: None,
        }
    }
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            environment: PathBuf::from("stubs/.env.stub"),
            client: PathBuf::from("stubs/config.js.stub"),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            environment: PathBuf::from(".env"),
            client: PathBuf::from("public/js/config.js"),
        }
    }
}

impl Default for ErrorPagesConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(".."),
            pattern: "public_html/*.shtml".to_string(),
            destination: PathBuf::from("backend/public"),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            install: Invocation::from_words(&["composer", "install"]),
            optimize: vec![
                Invocation::from_words(&["php", "artisan", "optimize"]),
                Invocation::from_words(&["php", "artisan", "route:cache"]),
                Invocation::from_words(&["php", "artisan", "cache:clear"]),
            ],
            generate_key: None,
            migrate: Invocation::from_words(&["php", "artisan", "migrate:refresh"]),
            seed_flag: "--seed".to_string(),
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            directories: "755".to_string(),
            files: "644".to_string(),
            writable: WritableConfig::default(),
        }
    }
}

impl Default for WritableConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("storage"),
            mode: "777".to_string(),
        }
    }
}

impl DeployConfig {
    /// Load deploy configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DeployError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DeployError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse deploy configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, DeployError> {
        let config: DeployConfig = if yaml.trim().is_empty() {
            DeployConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Find the configuration for a project
    ///
    /// An explicit path must exist. Otherwise `deploy.yaml` in the project
    /// root is used when present, and the defaults when it is not.
    pub fn discover(project_root: &Path, explicit: Option<&Path>) -> Result<Self, DeployError> {
        if let Some(path) = explicit {
            debug!("Loading deploy config from {}", path.display());
            return Self::from_file(path);
        }

        let candidate = project_root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            debug!("Loading deploy config from {}", candidate.display());
            Self::from_file(&candidate)
        } else {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Validate the deploy configuration
    pub fn validate(&self) -> Result<(), DeployError> {
        let paths = [
            ("templates.environment", &self.templates.environment),
            ("templates.client", &self.templates.client),
            ("outputs.environment", &self.outputs.environment),
            ("outputs.client", &self.outputs.client),
            ("error_pages.destination", &self.error_pages.destination),
            ("public_dir", &self.public_dir),
            ("permissions.writable.path", &self.permissions.writable.path),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(DeployError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.error_pages.pattern.trim().is_empty() {
            return Err(DeployError::Config(
                "error_pages.pattern must not be empty".to_string(),
            ));
        }

        if self.commands.seed_flag.trim().is_empty() {
            return Err(DeployError::Config(
                "commands.seed_flag must not be empty".to_string(),
            ));
        }

        let modes = [
            ("permissions.directories", &self.permissions.directories),
            ("permissions.files", &self.permissions.files),
            ("permissions.writable.mode", &self.permissions.writable.mode),
        ];
        for (name, mode) in modes {
            if !is_octal_mode(mode) {
                return Err(DeployError::Config(format!(
                    "{} must be an octal mode like 755, got '{}'",
                    name, mode
                )));
            }
        }

        if let Some(editor) = &self.editor {
            if editor.trim().is_empty() {
                return Err(DeployError::Config("editor must not be empty".to_string()));
            }
        }

        Ok(())
    }

    pub fn environment_config_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.outputs.environment)
    }

    pub fn client_config_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.outputs.client)
    }

    /// Where the web root symlink is created: next to the project root
    pub fn web_root_link(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &Path::new("..").join(self.web_root.dir_name()))
    }

    /// The three permission passes, in order
    pub fn permission_commands(&self) -> Vec<Invocation> {
        let find_chmod = |kind: &str, mode: &str| {
            Invocation::from_words(&["find", ".", "-type", kind, "-exec", "chmod", mode, "{}", ";"])
        };
        vec![
            find_chmod("d", &self.permissions.directories),
            find_chmod("f", &self.permissions.files),
            Invocation::from_words(&["chmod", "-R", self.permissions.writable.mode.as_str()])
                .arg(self.permissions.writable.path.to_string_lossy()),
        ]
    }

    /// The database migration command for this project
    pub fn migrations(&self, project_root: &Path) -> Migrations {
        Migrations::new(
            self.commands.migrate.clone(),
            self.commands.seed_flag.clone(),
            project_root,
        )
    }

    /// Build the deploy pipeline for a project checkout
    ///
    /// Steps, in order: environment config, client config, error pages,
    /// web root symlink, dependencies, optimization, permissions.
    pub fn to_pipeline(&self, project_root: &Path) -> Pipeline {
        let env_template = WriteTemplate::new(
            resolve(project_root, &self.templates.environment),
            self.environment_config_path(project_root),
        );
        let env_action: Box<dyn Action> = match &self.commands.generate_key {
            Some(key_command) => Box::new(Sequence::new(vec![
                Box::new(env_template),
                Box::new(ExternalTool::new(key_command.clone(), project_root)),
            ])),
            None => Box::new(env_template),
        };

        let error_pages_dir = resolve(project_root, &self.error_pages.working_dir);

        Pipeline::new(vec![
            Step::new("Creating .env file...", env_action, FailurePolicy::Hard),
            Step::hard(
                "Creating config.js file...",
                WriteTemplate::new(
                    resolve(project_root, &self.templates.client),
                    self.client_config_path(project_root),
                ),
            ),
            Step::tolerant(
                "Moving default error views...",
                MoveByGlob::new(
                    self.error_pages.pattern.clone(),
                    self.error_pages.destination.clone(),
                    error_pages_dir,
                ),
            ),
            Step::hard(
                "Creating symlinks...",
                RecreateSymlink::new(
                    resolve(project_root, &self.public_dir),
                    self.web_root_link(project_root),
                ),
            ),
            Step::hard(
                "Installing dependencies...",
                ExternalTool::new(self.commands.install.clone(), project_root),
            ),
            Step::hard(
                "Optimizing app...",
                ExternalTool::sequence(self.commands.optimize.clone(), project_root),
            ),
            Step::hard(
                "Setting file permissions...",
                ExternalTool::sequence(self.permission_commands(), project_root),
            ),
        ])
    }
}

fn is_octal_mode(mode: &str) -> bool {
    (3..=4).contains(&mode.len()) && mode.chars().all(|c| ('0'..='7').contains(&c))
}

/// Join `path` onto `root` and fold away `.` and `..` lexically
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    let joined = root.join(path);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
