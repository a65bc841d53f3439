mod api;

use crate::FeatureRow;

/// Exact plane `5000 + 3 * income + 10 * county` over a handful of counties.
pub(crate) fn training_data() -> (Vec<FeatureRow>, Vec<f64>) {
    let counties = [121.0, 135.0, 89.0, 67.0, 63.0, 57.0, 151.0, 117.0];
    let incomes = [25000.0, 31000.0, 28000.0, 40000.0, 22000.0, 35000.0, 27000.0, 45000.0];

    let rows: Vec<FeatureRow> = counties
        .iter()
        .zip(incomes.iter())
        .map(|(&c, &i)| FeatureRow::new(c, i))
        .collect();
    let targets = rows
        .iter()
        .map(|r| 5000.0 + 3.0 * r.per_capita_income + 10.0 * r.municipal_code_fips)
        .collect();
    (rows, targets)
}
