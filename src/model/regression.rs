use std::sync::Arc;
use bytes::Bytes;
use object_store::{path::Path, ObjectStore};
use serde::{Serialize, Deserialize};
use smartcore::{
    linalg::basic::matrix::DenseMatrix,
    linear::linear_regression::{
        LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
    },
};
use tracing::{debug, info};
use crate::{Error, Result, MODEL_FEATURES};

type Regression = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// One row of the feature table, in `MODEL_FEATURES` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub municipal_code_fips: f64,
    pub per_capita_income: f64,
}

impl FeatureRow {
    pub fn new(municipal_code_fips: f64, per_capita_income: f64) -> Self {
        Self {
            municipal_code_fips,
            per_capita_income,
        }
    }

    fn values(&self) -> Vec<f64> {
        vec![self.municipal_code_fips, self.per_capita_income]
    }
}

fn feature_matrix(rows: &[FeatureRow]) -> Result<DenseMatrix<f64>> {
    let values: Vec<Vec<f64>> = rows.iter().map(FeatureRow::values).collect();
    DenseMatrix::from_2d_vec(&values)
        .map_err(|e| Error::Model(format!("Failed to build feature matrix: {}", e)))
}

/// Fitted housing value regression together with the feature names it was
/// trained on. Serialized as JSON.
#[derive(Serialize, Deserialize)]
pub struct HousingModel {
    features: Vec<String>,
    target: String,
    regression: Regression,
}

impl HousingModel {
    pub fn fit(rows: &[FeatureRow], targets: &[f64], target: &str) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(Error::InvalidInput(format!(
                "Got {} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if rows.len() <= MODEL_FEATURES.len() {
            return Err(Error::InvalidInput(format!(
                "Need more than {} rows to fit, got {}",
                MODEL_FEATURES.len(),
                rows.len()
            )));
        }

        let x = feature_matrix(rows)?;
        let y = targets.to_vec();
        let params = LinearRegressionParameters::default()
            .with_solver(LinearRegressionSolverName::SVD);

        let regression = LinearRegression::fit(&x, &y, params)
            .map_err(|e| Error::Model(format!("Failed to fit regression: {}", e)))?;

        info!("Fitted {} on {} rows", target, rows.len());
        Ok(Self {
            features: MODEL_FEATURES.iter().map(|f| f.to_string()).collect(),
            target: target.to_string(),
            regression,
        })
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let x = feature_matrix(rows)?;
        let predictions = self
            .regression
            .predict(&x)
            .map_err(|e| Error::Model(format!("Prediction failed: {}", e)))?;

        if predictions.iter().any(|p| !p.is_finite()) {
            return Err(Error::Model("Prediction is not a finite number".to_string()));
        }
        Ok(predictions)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes an artifact and rejects one trained on a different feature set.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::Model(format!("Unreadable model artifact: {}", e)))?;

        if model.features.iter().map(String::as_str).ne(MODEL_FEATURES.iter().copied()) {
            return Err(Error::Model(format!(
                "Model expects features {:?}, service provides {:?}",
                model.features,
                *MODEL_FEATURES
            )));
        }
        Ok(model)
    }

    pub async fn load(store: &Arc<dyn ObjectStore>, path: &Path) -> Result<Self> {
        let bytes = store.get(path).await?.bytes().await?;
        debug!("Read {} byte model artifact from {}", bytes.len(), path);
        Self::from_slice(&bytes)
    }

    pub async fn save(&self, store: &Arc<dyn ObjectStore>, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        store.put(path, Bytes::from(bytes).into()).await?;
        info!("Saved model artifact to {}", path);
        Ok(())
    }
}
