use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;

use crate::backend::interpolation::Field;
use crate::backend::mathphysics::{MapExtent, PixelsPerMeter};
use crate::backend::session::Session;
use crate::backend::store::Measurement;


const MEASUREMENTS_FILE: &str  = "measurements.json";
const FIELD_FILE_PREFIX: &str  = "field_";
const JSON_EXTENSION: &str     = ".json";


// Serialized form of a `Field`. Rows follow `y`, columns follow `x`.
#[derive(Debug, PartialEq, Serialize)]
pub struct FieldReport<'a> {
    network_name: &'a str,
    map_extent: MapExtent,
    grid_step: f64,
    xs: &'a [f64],
    ys: &'a [f64],
    min_value: f64,
    max_value: f64,
    values: Vec<Vec<f64>>,
}

impl<'a> From<&'a Field> for FieldReport<'a> {
    fn from(field: &'a Field) -> Self {
        Self {
            network_name: field.network_name(),
            map_extent: field.extent(),
            grid_step: field.grid_step(),
            xs: field.xs(),
            ys: field.ys(),
            min_value: field.min_value(),
            max_value: field.max_value(),
            values: field.row_values(),
        }
    }
}


#[derive(Debug, PartialEq, Serialize)]
pub struct MeasurementsReport<'a> {
    map_extent: MapExtent,
    pixels_per_meter: Option<PixelsPerMeter>,
    sampling_radius: f64,
    measurements: &'a [Measurement],
}

impl<'a> From<&'a Session> for MeasurementsReport<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            map_extent: session.map_extent(),
            pixels_per_meter: session.pixels_per_meter(),
            sampling_radius: session.sampling_radius(),
            measurements: session.measurements(),
        }
    }
}


// Writes the measurements and every field. Failures are logged and do not
// stop the other files from being written.
pub fn write_survey(output_directory: &Path, session: &Session, fields: &[Field]) {
    let local_time = chrono::Local::now()
        .format("%Y-%m-%d_%H-%M-%S-%3f")
        .to_string();

    if let Err(error) = std::fs::create_dir_all(output_directory) {
        error!(
            "Failed to create output directory {}: {error}",
            output_directory.display()
        );
        return;
    }

    write_json(
        &output_directory.join(format!("{local_time}_{MEASUREMENTS_FILE}")),
        &MeasurementsReport::from(session)
    );

    let file_names = field_file_names(
        &local_time,
        fields.iter().map(Field::network_name)
    );

    for (field, file_name) in fields.iter().zip(file_names) {
        write_json(&output_directory.join(file_name), &FieldReport::from(field));
    }
}

#[must_use]
pub fn field_file_name(local_time: &str, network_name: &str) -> PathBuf {
    PathBuf::from(
        format!(
            "{local_time}_{FIELD_FILE_PREFIX}{}{JSON_EXTENSION}",
            sanitize(network_name)
        )
    )
}

// Networks whose names sanitize to the same text get a `_2`, `_3`, ...
// suffix, in order of appearance.
#[must_use]
pub fn field_file_names<'a>(
    local_time: &str,
    network_names: impl IntoIterator<Item = &'a str>
) -> Vec<PathBuf> {
    let mut taken = HashSet::new();

    network_names
        .into_iter()
        .map(|network_name| {
            let mut file_name = field_file_name(local_time, network_name);
            let mut index = 1;

            while !taken.insert(file_name.clone()) {
                index += 1;
                file_name = PathBuf::from(
                    format!(
                        "{local_time}_{FIELD_FILE_PREFIX}{}_{index}{JSON_EXTENSION}",
                        sanitize(network_name)
                    )
                );
            }

            file_name
        })
        .collect()
}

fn sanitize(network_name: &str) -> String {
    network_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn write_json<T: Serialize>(file_path: &Path, data: &T) {
    let json_data = match serde_json::to_string_pretty(data) {
        Ok(json_data) => json_data,
        Err(error)    => {
            error!("Failed to serialize {}: {error}", file_path.display());
            return;
        }
    };

    match std::fs::write(file_path, json_data) {
        Ok(())     => info!("Written {}", file_path.display()),
        Err(error) => error!("Failed to write {}: {error}", file_path.display()),
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::interpolation::FieldInterpolator;
    use crate::backend::mathphysics::PixelPoint;
    use crate::backend::signal::{SignalStrength, HIDDEN_SSID};
    use crate::backend::store::Sample;

    use super::*;


    fn test_field() -> Field {
        let samples = [
            Sample {
                location: PixelPoint::new(50, 50),
                signal_strength: SignalStrength::new(-45.0),
            },
            Sample {
                location: PixelPoint::new(150, 100),
                signal_strength: SignalStrength::new(-70.0),
            },
        ];
        let extent = MapExtent::new(200, 150)
            .unwrap_or_else(|| panic!("200x150 is a valid extent"));

        FieldInterpolator::new(5.0, 10.0)
            .interpolate("Office", &samples, extent)
            .unwrap_or_else(|error| panic!("{}", error))
    }


    #[test]
    fn field_file_names_are_sanitized() {
        assert_eq!(
            PathBuf::from("t_field_Office-2_4.json"),
            field_file_name("t", "Office-2/4")
        );
        assert_eq!(
            PathBuf::from("t_field__Hidden_SSID_.json"),
            field_file_name("t", HIDDEN_SSID)
        );
    }

    #[test]
    fn colliding_names_get_distinct_files() {
        assert_eq!(
            vec![
                PathBuf::from("t_field_a_b.json"),
                PathBuf::from("t_field_a_b_2.json"),
                PathBuf::from("t_field_Office.json"),
                PathBuf::from("t_field_a_b_3.json"),
            ],
            field_file_names("t", ["a/b", "a_b", "Office", "a b"])
        );
    }

    #[test]
    fn field_report_json() {
        let field = test_field();
        let json = serde_json::to_value(FieldReport::from(&field))
            .unwrap_or_else(|error| panic!("{}", error));

        assert_eq!("Office", json["network_name"]);
        assert_eq!(50.0, json["grid_step"]);
        assert_eq!(200, json["map_extent"]["width"]);
        assert_eq!(4, json["xs"].as_array().map_or(0, Vec::len));
        assert_eq!(3, json["values"].as_array().map_or(0, Vec::len));
        assert_eq!(
            Some(45.0),
            json["values"][1][1].as_f64().map(|value| value.round())
        );
    }

    #[test]
    fn survey_files_are_written() {
        let output_directory = std::env::temp_dir()
            .join("wifi_heatmap_output_test");
        let session = Session::new(
            MapExtent::new(200, 150)
                .unwrap_or_else(|| panic!("200x150 is a valid extent"))
        );

        let _ = std::fs::remove_dir_all(&output_directory);

        write_survey(&output_directory, &session, &[test_field()]);

        let file_names: Vec<String> = std::fs::read_dir(&output_directory)
            .unwrap_or_else(|error| panic!("{}", error))
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();

        let _ = std::fs::remove_dir_all(&output_directory);

        assert_eq!(2, file_names.len());
        assert!(file_names.iter().any(|name| name.ends_with("_measurements.json")));
        assert!(file_names.iter().any(|name| name.ends_with("_field_Office.json")));
    }
}
