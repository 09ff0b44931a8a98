//! Supports reading the workspace setup (probe, registration, entry point) from a YAML file (optional)

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

use crate::corridor::CorridorConfig;
use crate::kinematic_traits::Point;
use crate::parameter_error::ParameterError;
use crate::parameters::ProbeGeometry;
use crate::registration::RegistrationTransform;

/// Everything the surrounding application supplies to the workspace pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSetup {
    pub probe: ProbeGeometry,
    pub registration: RegistrationTransform,
    /// Entry point in imager coordinates, if known in advance.
    pub entry_point: Option<Point>,
    pub corridor: CorridorConfig,
}

impl Default for WorkspaceSetup {
    fn default() -> Self {
        WorkspaceSetup {
            probe: ProbeGeometry::nominal(),
            registration: RegistrationTransform::identity(),
            entry_point: None,
            corridor: CorridorConfig::default(),
        }
    }
}

impl WorkspaceSetup {
    /// Read the setup from YAML file. YAML file like this is supported:
    /// ```yaml
    /// probe_geometry:
    ///   cannula_to_treatment: 0.0
    ///   treatment_to_tip: 0.0
    ///   robot_to_entry: 5.0
    ///   robot_to_treatment_at_home: 41.0
    /// # Row-major 4x4, maps imager to robot base when inverted
    /// registration: [1, 0, 0, -0.16,
    ///                0, 1, 0, -124.35,
    ///                0, 0, 1, 10.38,
    ///                0, 0, 0, 1]
    /// entry_point: [-62.009, 132.697, 65.521]
    /// corridor_density: 5
    /// max_insertion: 40.0
    /// ```
    /// Only `probe_geometry` is required. Registration defaults to identity, corridor settings
    /// to their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(e.to_string()))?;
        let doc = docs.first()
            .ok_or_else(|| ParameterError::ParseError("empty document".to_string()))?;

        let probe_yaml = &doc["probe_geometry"];
        if probe_yaml.is_badvalue() {
            return Err(ParameterError::MissingField("probe_geometry".to_string()));
        }
        let probe = ProbeGeometry {
            cannula_to_treatment: number(probe_yaml, "cannula_to_treatment")?,
            treatment_to_tip: number(probe_yaml, "treatment_to_tip")?,
            robot_to_entry: number(probe_yaml, "robot_to_entry")?,
            robot_to_treatment_at_home: number(probe_yaml, "robot_to_treatment_at_home")?,
        };

        let registration = match optional_numbers(doc, "registration", 16)? {
            Some(values) => {
                let mut matrix = [0.0; 16];
                matrix.copy_from_slice(&values);
                RegistrationTransform::from_row_slice(&matrix)
            }
            None => RegistrationTransform::identity(),
        };

        let entry_point = optional_numbers(doc, "entry_point", 3)?
            .map(|v| Point::new(v[0], v[1], v[2]));

        let mut corridor = CorridorConfig::default();
        if let Some(density) = optional_number(doc, "corridor_density")? {
            if density < 1.0 || density.fract() != 0.0 {
                return Err(ParameterError::InvalidValue {
                    field: "corridor_density".to_string(),
                    reason: format!("must be a positive integer (got {})", density),
                });
            }
            corridor.density = density as usize;
        }
        if let Some(max_insertion) = optional_number(doc, "max_insertion")? {
            corridor.max_insertion = max_insertion;
        }

        Ok(WorkspaceSetup { probe, registration, entry_point, corridor })
    }
}

/// Accepts both real and integer YAML scalars; values must be finite.
fn as_number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn optional_number(node: &Yaml, field: &str) -> Result<Option<f64>, ParameterError> {
    let value = &node[field];
    if value.is_badvalue() {
        return Ok(None);
    }
    match as_number(value) {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ParameterError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a finite number, got {:?}", value),
        }),
    }
}

fn number(node: &Yaml, field: &str) -> Result<f64, ParameterError> {
    optional_number(node, field)?.ok_or_else(|| ParameterError::MissingField(field.to_string()))
}

fn optional_numbers(
    node: &Yaml,
    field: &str,
    expected: usize,
) -> Result<Option<Vec<f64>>, ParameterError> {
    let value = &node[field];
    if value.is_badvalue() {
        return Ok(None);
    }
    let items = value.as_vec().ok_or_else(|| ParameterError::InvalidValue {
        field: field.to_string(),
        reason: "expected a list of numbers".to_string(),
    })?;
    if items.len() != expected {
        return Err(ParameterError::InvalidLength {
            field: field.to_string(),
            expected,
            found: items.len(),
        });
    }
    items
        .iter()
        .map(|item| {
            as_number(item).filter(|v| v.is_finite()).ok_or_else(|| ParameterError::InvalidValue {
                field: field.to_string(),
                reason: format!("expected a finite number, got {:?}", item),
            })
        })
        .collect::<Result<Vec<f64>, ParameterError>>()
        .map(Some)
}
