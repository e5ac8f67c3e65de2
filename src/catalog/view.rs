//! View catalog entity.

use tracing::warn;

use crate::binder::BoundSelect;
use crate::error::{MinirelError, Result};

/// A named catalog entry that stores a query definition rather than
/// materialized rows.
///
/// The view exclusively owns its definition; the definition lives and
/// dies with the view.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    definition: Box<BoundSelect>,
}

impl View {
    /// Creates a view binding `name` to its defining query.
    ///
    /// The view performs no further validation of the query itself; the
    /// definition must already be bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn new(name: String, definition: Box<BoundSelect>) -> Result<Self> {
        if name.is_empty() {
            warn!("rejecting view with empty name");
            return Err(MinirelError::SchemaError(
                "View name cannot be empty".into(),
            ));
        }
        Ok(View { name, definition })
    }

    /// Returns the view name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the view's defining query.
    #[must_use]
    pub fn definition(&self) -> &BoundSelect {
        &self.definition
    }

    /// Checks whether the view entry is valid: a non-empty name with a
    /// definition present. The definition half is guaranteed by
    /// construction.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}
