
#[cfg(test)]
mod tests {
    use crate::corridor::CorridorConfig;
    use crate::kinematic_traits::Point;
    use crate::parameter_error::ParameterError;
    use crate::parameters::ProbeGeometry;
    use crate::parameters_from_file::WorkspaceSetup;
    use crate::registration::{CoordinateTransformer, RegistrationTransform};

    const READ_ERROR: &'static str = "Failed to load setup from file";

    #[test]
    fn test_setup_from_yaml() {
        let filename = "src/tests/data/reference_setup.yaml";
        let loaded = WorkspaceSetup::from_yaml_file(filename).expect(READ_ERROR);

        assert_eq!(loaded.probe, ProbeGeometry::nominal());
        assert_eq!(
            loaded.registration,
            RegistrationTransform::from_translation(-0.16, -124.35, 10.38)
        );
        assert_eq!(loaded.entry_point, Some(Point::new(-62.009, 132.697, 65.521)));
        assert_eq!(loaded.corridor, CorridorConfig { density: 5, max_insertion: 40.0 });

        let transformer = CoordinateTransformer::new(loaded.registration).expect("invertible");
        let entry = transformer.to_robot(&loaded.entry_point.unwrap());
        assert_eq!(entry, Point::new(-61.8, 257.0, 55.1));
    }

    #[test]
    fn test_probe_only() {
        let filename = "src/tests/data/probe_only.yaml";
        let loaded = WorkspaceSetup::from_yaml_file(filename).expect(READ_ERROR);

        assert_eq!(loaded.probe, ProbeGeometry::new(2.5, 1.5, 5.0, 41.0));
        assert_eq!(loaded.registration, RegistrationTransform::identity());
        assert_eq!(loaded.entry_point, None);
        assert_eq!(loaded.corridor, CorridorConfig::default());
    }

    #[test]
    fn test_bad_registration_length() {
        let filename = "src/tests/data/bad_registration.yaml";
        match WorkspaceSetup::from_yaml_file(filename) {
            Err(ParameterError::InvalidLength { field, expected, found }) => {
                assert_eq!(field, "registration");
                assert_eq!(expected, 16);
                assert_eq!(found, 12);
            }
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_probe_field() {
        let yaml = "probe_geometry:\n  cannula_to_treatment: 0.0\n  treatment_to_tip: 0.0\n  \
                    robot_to_entry: 5.0\n";
        match WorkspaceSetup::from_yaml_str(yaml) {
            Err(ParameterError::MissingField(field)) => {
                assert_eq!(field, "robot_to_treatment_at_home")
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
        assert!(matches!(
            WorkspaceSetup::from_yaml_str("entry_point: [0, 0, 0]\n"),
            Err(ParameterError::MissingField(_))
        ));
    }

    #[test]
    fn test_bad_density() {
        let yaml = "probe_geometry:\n  cannula_to_treatment: 0\n  treatment_to_tip: 0\n  \
                    robot_to_entry: 5\n  robot_to_treatment_at_home: 41\ncorridor_density: 2.5\n";
        assert!(matches!(
            WorkspaceSetup::from_yaml_str(yaml),
            Err(ParameterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            WorkspaceSetup::from_yaml_file("src/tests/data/no_such_setup.yaml"),
            Err(ParameterError::IoError(_))
        ));
    }
}
