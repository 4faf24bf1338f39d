use crate::ret::{RclError, Result};

/// State carried by every handle: default, live between init and fini,
/// finalized afterwards. A finalized handle cannot be brought back to life.
#[derive(Debug)]
pub(crate) enum Lifecycle<T> {
    Uninitialized,
    Live(T),
    Finalized,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl<T> Lifecycle<T> {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Self::Live(x) => Some(x),
            _ => None,
        }
    }

    pub fn live_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Live(x) => Some(x),
            _ => None,
        }
    }

    /// Like [`Lifecycle::live`] but reports a dead handle as an error.
    pub fn get(&self, what: &str) -> Result<&T> {
        self.live()
            .ok_or_else(|| RclError::error(format!("{what} is not initialized")))
    }

    pub fn get_mut(&mut self, what: &str) -> Result<&mut T> {
        self.live_mut()
            .ok_or_else(|| RclError::error(format!("{what} is not initialized")))
    }

    pub fn start(&mut self, value: T) -> Result<()> {
        match self {
            Self::Uninitialized => {
                *self = Self::Live(value);
                Ok(())
            }
            Self::Live(_) => Err(RclError::error("handle is already initialized")),
            Self::Finalized => Err(RclError::error(
                "handle was finalized, use a freshly initialized one",
            )),
        }
    }

    pub fn finish(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::Finalized) {
            Self::Live(x) => Some(x),
            other => {
                *self = other;
                None
            }
        }
    }
}
