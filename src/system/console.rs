// src/system/console.rs

use crate::core::sender::Sender;
use uuid::Uuid;

/// Emisor de la terminal. Los mensajes van a stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSender {
    id: Uuid,
    name: String,
    permissions: Vec<String>,
}

impl ConsoleSender {
    pub fn new(name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            permissions,
        }
    }
}

impl Sender for ConsoleSender {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, message: &str) {
        println!("{}", message);
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|granted| permission_matches(granted, permission))
    }
}

/// `*` concede todo; `econ.*` concede `econ.pay` y `econ.admin.reset`
/// pero no `econ`.
pub fn permission_matches(granted: &str, required: &str) -> bool {
    if granted == "*" || granted.eq_ignore_ascii_case(required) {
        return true;
    }
    match granted.strip_suffix(".*") {
        Some(prefix) => required
            .get(..prefix.len() + 1)
            .is_some_and(|head| head.eq_ignore_ascii_case(&format!("{}.", prefix))),
        None => false,
    }
}
