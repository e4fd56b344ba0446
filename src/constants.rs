// src/constants.rs

/// Prefijo con el que empieza todo mensaje de error del motor.
pub const ERROR_PREFIX: &str = "Error: ";

/// Mensaje enviado cuando el emisor no tiene el permiso del comando resuelto.
pub const NO_PERMISSION_MESSAGE: &str = "You do not have permission to use this";

/// Carácter que marca un token como flag (`-name` o `-name=value`).
pub const FLAG_MARKER: char = '-';

/// Separador entre el nombre de un flag y su valor.
pub const FLAG_VALUE_SEPARATOR: char = '=';

/// Token que termina la extracción de flags; lo que sigue es posicional.
pub const END_OF_FLAGS: &str = "--";

/// Nombre del flag que pide la ayuda.
pub const HELP_FLAG: &str = "h";

/// Nombre del directorio de configuración (dentro del de config del sistema).
pub const CONFIG_DIR_NAME: &str = "cmdtree";

/// Nombre del archivo que declara el árbol de comandos.
pub const TREE_CONFIG_FILENAME: &str = "commands.toml";
