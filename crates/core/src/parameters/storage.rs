//! Parameter Storage Types
//!
//! Provides the typed key/value `ParameterStore` that parameter blocks
//! register their defaults into and load from.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is read-only (cannot be modified at runtime)
        const READ_ONLY = 0b00000001;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Get type discriminant
    pub fn type_id(&self) -> u8 {
        match self {
            ParamValue::Bool(_) => 0,
            ParamValue::Int(_) => 1,
            ParamValue::Float(_) => 2,
        }
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    /// Parameter flags
    pub flags: ParamFlags,
    /// Value the parameter was registered with
    pub default: ParamValue,
}

/// Parameter store for configuration management
///
/// Stores parameters as key-value pairs with metadata (flags, default).
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    /// Parameter metadata
    metadata: FnvIndexMap<String<PARAM_NAME_LEN>, ParamMetadata, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = make_key(name).ok()?;
        self.parameters.get(&key)
    }

    /// Set parameter value
    ///
    /// The value must use the same variant as the registered default, except
    /// that `Int` is accepted for `Float` parameters.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;

        let meta = self
            .metadata
            .get(&key)
            .ok_or(ParameterError::UnknownParameter)?;
        if meta.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }

        let value = match (meta.default, value) {
            (ParamValue::Float(_), ParamValue::Int(v)) => ParamValue::Float(v as f32),
            (default, value) if default.type_id() == value.type_id() => value,
            _ => return Err(ParameterError::TypeMismatch),
        };

        self.parameters
            .insert(key, value)
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = make_key(name)?;

        if self.parameters.contains_key(&key) {
            // Already exists, don't overwrite
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(
                key,
                ParamMetadata {
                    flags,
                    default: default_value,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Restore a parameter to its registered default
    pub fn reset(&mut self, name: &str) -> Result<(), ParameterError> {
        let key = make_key(name)?;
        let default = self
            .metadata
            .get(&key)
            .map(|meta| meta.default)
            .ok_or(ParameterError::UnknownParameter)?;
        self.parameters
            .insert(key, default)
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

fn make_key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut key = String::<PARAM_NAME_LEN>::new();
    key.push_str(name)
        .map_err(|_| ParameterError::NameTooLong)?;
    Ok(key)
}

/// Load a float parameter from store with clamping
pub(crate) fn load_float(
    store: &ParameterStore,
    name: &str,
    default: f32,
    min: f32,
    max: f32,
) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if v.is_finite() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

/// Load a boolean parameter (nonzero integers count as `true`)
pub(crate) fn load_bool(store: &ParameterStore, name: &str, default: bool) -> bool {
    match store.get(name) {
        Some(ParamValue::Bool(v)) => *v,
        Some(ParamValue::Int(v)) => *v != 0,
        _ => default,
    }
}
