//! Prediction service: the fitted preprocessor and the model, bundled.
//!
//! Built once at startup and shared read-only by every request handler.

use crate::config::AppConfig;
use crate::io::{load_model, load_reference_table};
use crate::model::Model;
use crate::preprocess::{FeatureRecord, FittedPreprocessor, Preprocessor};
use crate::Result;
use std::time::Instant;
use tracing::{info, warn};

/// Preprocess-then-predict pipeline.
#[derive(Debug, Clone)]
pub struct PredictionService {
    preprocessor: FittedPreprocessor,
    model: Model,
}

impl PredictionService {
    /// Bundle a fitted preprocessor with a loaded model.
    ///
    /// A width mismatch is logged here but only fails at prediction time.
    /// When the artifact records its input feature names, they are compared
    /// with the fitted layout and the first disagreement is logged.
    pub fn new(preprocessor: FittedPreprocessor, model: Model) -> Self {
        if preprocessor.output_width() != model.input_width() {
            warn!(
                preprocessor_width = preprocessor.output_width(),
                model_width = model.input_width(),
                "preprocessor output does not match model input; every prediction will fail"
            );
        }
        if let Some(recorded) = &model.metadata().feature_names {
            let fitted = preprocessor.feature_names();
            if let Some((index, fitted, recorded)) = first_name_mismatch(&fitted, recorded) {
                warn!(
                    index,
                    fitted,
                    recorded,
                    "fitted feature layout differs from the one recorded in the model"
                );
            }
        }
        Self { preprocessor, model }
    }

    /// Fit the preprocessor on the configured reference dataset and load the model.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let start = Instant::now();

        let table = load_reference_table(&config.dataset_path)?;
        let preprocessor = Preprocessor::new(config.columns.clone()).fit(&table)?;
        info!(
            dataset = %config.dataset_path.display(),
            rows = table.n_rows(),
            width = preprocessor.output_width(),
            "preprocessor fitted"
        );

        let model = load_model(&config.model_path)?;
        info!(
            model = %config.model_path.display(),
            name = %model.metadata().name,
            architecture = %model.metadata().architecture,
            inputs = model.input_width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "model loaded"
        );

        Ok(Self::new(preprocessor, model))
    }

    /// Predict a label for every record.
    pub fn predict(&self, records: &[FeatureRecord]) -> Result<Vec<i64>> {
        let matrix = self.preprocessor.transform(records)?;
        self.model.predict(&matrix)
    }

    /// Fitted preprocessor.
    pub fn preprocessor(&self) -> &FittedPreprocessor {
        &self.preprocessor
    }

    /// Loaded model.
    pub fn model(&self) -> &Model {
        &self.model
    }
}

/// First position where the fitted and recorded feature names disagree.
fn first_name_mismatch<'a>(
    fitted: &'a [String],
    recorded: &'a [String],
) -> Option<(usize, &'a str, &'a str)> {
    fitted
        .iter()
        .zip(recorded)
        .enumerate()
        .find(|(_, (f, r))| f != r)
        .map(|(i, (f, r))| (i, f.as_str(), r.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ReferenceTable;
    use crate::preprocess::{ColumnSpec, OrdinalColumn, RawValue};
    use crate::Error;

    fn service(model_inputs: usize) -> PredictionService {
        let csv = "Sex,Checkup,BMI\nFemale,Never,20\nMale,Within the past year,30\n";
        let table = ReferenceTable::from_reader(csv.as_bytes()).unwrap();
        let spec = ColumnSpec {
            nominal: vec!["Sex".into()],
            ordinal: vec![OrdinalColumn::new("Checkup", &crate::preprocess::CHECKUP_CATEGORIES)],
            numerical: vec!["BMI".into()],
            target: None,
        };
        let fitted = Preprocessor::new(spec).fit(&table).unwrap();
        PredictionService::new(fitted, crate::model::tests::linear_model(model_inputs))
    }

    fn record(sex: &str) -> FeatureRecord {
        [
            ("Sex", RawValue::from(sex)),
            ("Checkup", RawValue::from("Never")),
            ("BMI", RawValue::from(24.0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_predict_one_label_per_record() {
        let service = service(3);
        let labels = service.predict(&[record("Male"), record("Female")]).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|l| *l == 0 || *l == 1));
    }

    #[test]
    fn test_feature_name_mismatch_is_located() {
        let service = service(3);
        let fitted = service.preprocessor().feature_names();
        assert_eq!(fitted, vec!["Sex_Male", "Checkup", "BMI"]);
        assert_eq!(first_name_mismatch(&fitted, &fitted), None);

        let recorded: Vec<String> =
            ["Sex_Male", "BMI", "Checkup"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first_name_mismatch(&fitted, &recorded), Some((1, "Checkup", "BMI")));
    }

    #[test]
    fn test_recorded_names_do_not_block_prediction() {
        let service = service(3);
        let mut state = service.model().to_state();
        state.metadata.feature_names =
            Some(["BMI", "Sex_Male", "Checkup"].iter().map(|s| s.to_string()).collect());
        let model = Model::from_state(state).unwrap();
        let service = PredictionService::new(service.preprocessor().clone(), model);
        assert_eq!(service.predict(&[record("Male")]).unwrap().len(), 1);
    }

    #[test]
    fn test_width_mismatch_fails_at_predict() {
        let service = service(5);
        let err = service.predict(&[record("Male")]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 5, actual: 3 }));
    }
}
