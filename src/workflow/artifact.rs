use super::definition::Workflow;
use crate::error::ArtifactError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A validated workflow design, frozen for hand-off between the designer and the engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub workflow: Workflow,
    /// Warnings the validator raised when the snapshot was taken.
    pub warnings: Vec<String>,
}

impl WorkflowSnapshot {
    pub fn new(workflow: Workflow, warnings: Vec<String>) -> Self {
        Self { workflow, warnings }
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads a snapshot from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not open file '{}': {}", path, e))
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Generic(format!("Serialization failed: {}", e)))
    }

    /// Deserializes a snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot)
            .map_err(|e| ArtifactError::Generic(format!("Deserialization failed: {}", e)))
    }
}
