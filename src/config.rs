// src/config.rs

use crate::constants::{CONFIG_DIR_NAME, TREE_CONFIG_FILENAME};
use crate::models::TreeConfig;
use include_dir::{Dir, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Árboles incluidos en el binario, usados cuando el usuario no tiene uno.
static BUNDLED: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find the system configuration directory.")]
    ConfigDirNotFound,
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("The command tree file '{path}' does not exist.")]
    NotFound { path: String },
    #[error("A command tree already exists at '{path}'.")]
    AlreadyExists { path: String },
    #[error("The bundled command tree is missing or is not valid UTF-8.")]
    MissingBundledTree,
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Devuelve la ruta del directorio de configuración de cmdtree (sin crearlo).
pub fn get_config_dir() -> ConfigResult<PathBuf> {
    let config_path = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);
    log::debug!("Config directory: {:?}", config_path);
    Ok(config_path)
}

/// Devuelve la ruta del `commands.toml` del usuario.
pub fn get_tree_path() -> ConfigResult<PathBuf> {
    get_config_dir().map(|dir| dir.join(TREE_CONFIG_FILENAME))
}

pub fn bundled_tree_source() -> ConfigResult<&'static str> {
    BUNDLED
        .get_file(TREE_CONFIG_FILENAME)
        .and_then(|f| f.contents_utf8())
        .ok_or(ConfigError::MissingBundledTree)
}

pub fn parse_tree(source: &str, origin: &str) -> ConfigResult<TreeConfig> {
    toml::from_str(source).map_err(|e| ConfigError::TomlParse {
        path: origin.to_string(),
        source: e,
    })
}

pub fn load_tree_from(path: &Path) -> ConfigResult<TreeConfig> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }
    log::info!("Loading command tree from: {:?}", path);
    let content = fs::read_to_string(path)?;
    parse_tree(&content, &path.display().to_string())
}

/// Carga el árbol a registrar: un archivo explícito debe existir; si no, se
/// usa el del usuario si existe, y por último el árbol incluido.
pub fn load_tree(explicit: Option<&Path>) -> ConfigResult<TreeConfig> {
    if let Some(path) = explicit {
        return load_tree_from(path);
    }
    match get_tree_path() {
        Ok(path) if path.is_file() => load_tree_from(&path),
        Ok(_) | Err(ConfigError::ConfigDirNotFound) => {
            log::info!("No user command tree found. Using the bundled one.");
            parse_tree(bundled_tree_source()?, "<bundled>")
        }
        Err(e) => Err(e),
    }
}

/// Copia el árbol incluido en `dir`, creándolo si hace falta. Nunca
/// sobrescribe un archivo existente.
pub fn write_default_tree(dir: &Path) -> ConfigResult<PathBuf> {
    let path = dir.join(TREE_CONFIG_FILENAME);
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        });
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, bundled_tree_source()?)?;
    Ok(path)
}
