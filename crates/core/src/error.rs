use std::fmt;

/// A field-level validation failure that knows which form field it belongs to.
pub trait FieldError: fmt::Display {
    /// Name of the offending form field (matches the persisted column name).
    fn field(&self) -> &'static str;
}

/// All validation failures collected from one draft.
///
/// Drafts report every failing field at once so a form can mark each input,
/// instead of stopping at the first problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<E> {
    errors: Vec<E>,
}

impl<E: FieldError> FieldErrors<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// First error reported for the given field, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&E> {
        self.errors.iter().find(|err| err.field() == field)
    }

    #[must_use]
    pub fn contains(&self, error: &E) -> bool
    where
        E: PartialEq,
    {
        self.errors.contains(error)
    }

    /// Turns the collected errors into a `Result`, yielding `value` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was collected.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl<E: FieldError> Default for FieldErrors<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FieldError> From<E> for FieldErrors<E> {
    fn from(error: E) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl<E: FieldError> fmt::Display for FieldErrors<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.errors.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {err}", err.field())?;
        }
        Ok(())
    }
}

impl<E: FieldError + fmt::Debug> std::error::Error for FieldErrors<E> {}
