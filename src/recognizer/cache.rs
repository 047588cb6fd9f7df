//! Model cache with ordered fallback

use super::EntityRecognizer;
use crate::domain::RecognizerError;
use std::collections::HashMap;
use std::sync::Arc;

/// Recognizer shared between the cache and blocking worker threads
pub type SharedRecognizer = Arc<dyn EntityRecognizer>;

type Loader = Box<dyn Fn(&str) -> Result<SharedRecognizer, RecognizerError> + Send + Sync>;

/// Loaded recognizers keyed by model identifier
///
/// Loading goes through an injected loader. Successful loads are kept; failed
/// loads are not cached, so a later call retries them.
pub struct ModelCache {
    loader: Loader,
    models: HashMap<String, SharedRecognizer>,
}

impl ModelCache {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn(&str) -> Result<SharedRecognizer, RecognizerError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            models: HashMap::new(),
        }
    }

    /// Return the cached recognizer for `model`, loading it on first use
    pub fn get_or_load(&mut self, model: &str) -> Result<SharedRecognizer, RecognizerError> {
        if let Some(recognizer) = self.models.get(model) {
            tracing::debug!(model, "Using cached recognizer");
            return Ok(Arc::clone(recognizer));
        }

        tracing::info!(model, "Loading recognizer model");
        let recognizer = (self.loader)(model)?;
        self.models.insert(model.to_string(), Arc::clone(&recognizer));
        Ok(recognizer)
    }

    /// Try `models` in order and return the first that loads
    ///
    /// # Errors
    ///
    /// [`RecognizerError::NoModelAvailable`] when every model fails or the
    /// list is empty.
    pub fn get_or_load_first(
        &mut self,
        models: &[String],
    ) -> Result<SharedRecognizer, RecognizerError> {
        for (attempt, model) in models.iter().enumerate() {
            match self.get_or_load(model) {
                Ok(recognizer) => {
                    if attempt > 0 {
                        tracing::warn!(model = %model, "Using fallback model");
                    }
                    return Ok(recognizer);
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Model failed to load");
                }
            }
        }

        Err(RecognizerError::NoModelAvailable {
            tried: models.join(", "),
        })
    }

    pub fn is_loaded(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
