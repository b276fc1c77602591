use crate::domain::{config::CmdTreeConfig, error::{CmdTreeError, CmdTreeResult}};
use std::fs;
use std::path::{Path, PathBuf};
use toml::Table;

const PROJECT_DIR: &str = ".cmdtree";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> CmdTreeResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();
        
        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Create a manager over explicit file locations
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files.
    ///
    /// Keys in the project file override the same keys in the global file;
    /// anything neither file sets keeps its default.
    pub fn load_config(&self) -> CmdTreeResult<CmdTreeConfig> {
        let mut merged = Table::new();
        
        if self.global_config_path.exists() {
            merge_tables(&mut merged, read_table(&self.global_config_path)?);
        }
        
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                merge_tables(&mut merged, read_table(project_path)?);
            }
        }
        
        let config = toml::Value::Table(merged).try_into::<CmdTreeConfig>().map_err(|e| CmdTreeError::Config {
            message: format!("Invalid configuration: {}", e),
        })?;
        tracing::debug!(global = %self.global_config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> CmdTreeResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CmdTreeError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        
        Ok(home.join(".config").join("cmdtree").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        find_project_config_from(&current_dir)
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &CmdTreeConfig) -> CmdTreeResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| CmdTreeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;
        
        fs::write(path, content).map_err(|e| CmdTreeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Write a default project configuration under `dir` and return its path
    pub fn init_project_config(&self, dir: &Path, force: bool) -> CmdTreeResult<PathBuf> {
        let config_dir = dir.join(PROJECT_DIR);
        let config_file = config_dir.join(CONFIG_FILE);
        
        if config_file.exists() && !force {
            return Err(CmdTreeError::Config {
                message: format!("Project configuration already exists at {}", config_file.display()),
            });
        }
        
        fs::create_dir_all(&config_dir).map_err(|e| CmdTreeError::Config {
            message: format!("Failed to create {} directory: {}", PROJECT_DIR, e),
        })?;
        
        self.save_config_to_path(&config_file, &CmdTreeConfig::default())?;
        tracing::info!(path = %config_file.display(), "project configuration written");
        
        Ok(config_file)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

/// Nearest `.cmdtree/config.toml` at or above `start`
pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    
    loop {
        let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        
        path = path.parent()?;
    }
}

fn read_table(path: &Path) -> CmdTreeResult<Table> {
    let content = fs::read_to_string(path).map_err(|e| CmdTreeError::Config {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;
    
    content.parse::<Table>().map_err(|e| CmdTreeError::Config {
        message: format!("Failed to parse config file {}: {}", path.display(), e),
    })
}

fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
