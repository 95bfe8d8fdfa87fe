use std::fmt;

/// Why a stored embedding could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("not a numeric array: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("embedding is empty")]
    Empty,
    #[error("non-finite value at position {0}")]
    NonFinite(usize),
}

/// A complete, validated embedding vector.
///
/// Stored as a JSON number array in text form. Loading goes through
/// [`Embedding::parse`], which rejects anything that is not a non-empty array
/// of finite numbers; callers treat a rejected value as "no embedding".
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite(pos));
        }
        Ok(Self(values))
    }

    /// Loads an embedding from its stored text form.
    pub fn parse(raw: &str) -> Result<Self, EmbeddingError> {
        let values: Vec<f32> = serde_json::from_str(raw)?;
        Self::new(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Text form written to the knowledge store.
    pub fn to_stored(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}
