// src/core/session.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Estado temporal por emisor de un colaborador (confirmaciones
/// pendientes, bloqueos de UI...). Las entradas se crean cuando hacen falta
/// y se eliminan al terminar la interacción o al desconectarse el emisor.
#[derive(Debug, Default)]
pub struct SessionStore<T> {
    sessions: RwLock<HashMap<Uuid, T>>,
}

impl<T> SessionStore<T> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Ejecuta `f` sobre la sesión del emisor, creándola con `init` si hace falta.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        f(sessions.entry(id).or_insert_with(init))
    }

    /// Reemplaza la sesión del emisor y devuelve la anterior.
    pub fn start(&self, id: Uuid, session: T) -> Option<T> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session)
    }

    /// Lee la sesión del emisor sin crearla.
    pub fn peek<R>(&self, id: Uuid, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(f)
    }

    /// Elimina y devuelve la sesión del emisor.
    pub fn end(&self, id: Uuid) -> Option<T> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
