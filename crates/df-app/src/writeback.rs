//! Transactional write-back of coefficients into host parameters.
//!
//! Either every coefficient of a run lands in the sink or none does.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use df_core::ElementId;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// Host parameter receiving the local resistance coefficient.
pub const COEFFICIENT_PARAMETER: &str = "local_resistance_coefficient";

/// A destination for element parameters with transaction semantics.
pub trait ParameterSink {
    fn begin(&mut self) -> AppResult<()>;

    fn write(&mut self, element: ElementId, parameter: &str, value: f64) -> AppResult<()>;

    fn commit(&mut self) -> AppResult<()>;

    /// Discard everything written since `begin`.
    fn rollback(&mut self);
}

type ParameterTable = BTreeMap<ElementId, BTreeMap<String, f64>>;

/// Write every coefficient, rolling back on the first failure.
///
/// Returns the number of parameters written.
pub fn write_coefficients(
    sink: &mut dyn ParameterSink,
    coefficients: &BTreeMap<ElementId, f64>,
) -> AppResult<usize> {
    sink.begin()?;
    for (&element, &value) in coefficients {
        if let Err(e) = sink.write(element, COEFFICIENT_PARAMETER, value) {
            warn!(%element, error = %e, "write failed, rolling back");
            sink.rollback();
            return Err(e);
        }
    }
    if let Err(e) = sink.commit() {
        sink.rollback();
        return Err(e);
    }
    info!(count = coefficients.len(), "coefficients written");
    Ok(coefficients.len())
}

/// Sink keeping parameters in a JSON file: `{ "<id>": { "<parameter>": value } }`.
///
/// Existing content is kept and updated; the file is replaced on commit.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    current: ParameterTable,
    pending: Option<ParameterTable>,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: BTreeMap::new(),
            pending: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing(&self) -> AppResult<ParameterTable> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::InvalidInput(format!("{} is not a parameter file: {e}", self.path.display()))
        })
    }
}

impl ParameterSink for JsonFileSink {
    fn begin(&mut self) -> AppResult<()> {
        self.current = self.read_existing()?;
        self.pending = Some(self.current.clone());
        Ok(())
    }

    fn write(&mut self, element: ElementId, parameter: &str, value: f64) -> AppResult<()> {
        let pending = self.pending.as_mut().ok_or_else(|| AppError::WriteBack {
            element,
            message: "no open transaction".to_string(),
        })?;
        if !value.is_finite() {
            return Err(AppError::WriteBack {
                element,
                message: format!("{value} is not a number"),
            });
        }
        pending
            .entry(element)
            .or_default()
            .insert(parameter.to_string(), value);
        Ok(())
    }

    fn commit(&mut self) -> AppResult<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&pending)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|source| AppError::FileWrite {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| AppError::FileWrite {
            path: self.path.clone(),
            source,
        })?;
        self.current = pending;
        debug!(path = %self.path.display(), "parameter file written");
        Ok(())
    }

    fn rollback(&mut self) {
        self.pending = None;
    }
}

/// Sink holding parameters in memory; can be told to refuse one element.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub committed: ParameterTable,
    pending: Option<ParameterTable>,
    refuse: Option<ElementId>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail writes to `element`, as a host does for elements it won't release.
    pub fn refusing(element: ElementId) -> Self {
        Self {
            refuse: Some(element),
            ..Self::default()
        }
    }

    pub fn get(&self, element: ElementId, parameter: &str) -> Option<f64> {
        self.committed.get(&element)?.get(parameter).copied()
    }
}

impl ParameterSink for MemorySink {
    fn begin(&mut self) -> AppResult<()> {
        self.pending = Some(self.committed.clone());
        Ok(())
    }

    fn write(&mut self, element: ElementId, parameter: &str, value: f64) -> AppResult<()> {
        if self.refuse == Some(element) {
            return Err(AppError::WriteBack {
                element,
                message: "element is locked".to_string(),
            });
        }
        let pending = self.pending.as_mut().ok_or_else(|| AppError::WriteBack {
            element,
            message: "no open transaction".to_string(),
        })?;
        pending
            .entry(element)
            .or_default()
            .insert(parameter.to_string(), value);
        Ok(())
    }

    fn commit(&mut self) -> AppResult<()> {
        if let Some(pending) = self.pending.take() {
            self.committed = pending;
        }
        Ok(())
    }

    fn rollback(&mut self) {
        self.pending = None;
    }
}
