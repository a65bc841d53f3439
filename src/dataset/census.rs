use std::collections::HashMap;
use crate::{
    CENSUS_COUNTY_CODES, CENSUS_DATASET, CENSUS_STATE_CODE, CENSUS_VARIABLES,
    CENSUS_VARIABLE_LABELS, MUNICIPAL_CODE_COLUMN, ZILLOW_YEARS,
};

const CENSUS_API_BASE: &str = "https://api.census.gov/data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusFilters {
    pub for_clause: String,
    pub in_clause: String,
}

impl CensusFilters {
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [("for", self.for_clause.as_str()), ("in", self.in_clause.as_str())]
    }
}

/// Fields requested from the census API, in request order.
pub fn census_fields() -> Vec<&'static str> {
    let mut fields = vec!["NAME"];
    fields.extend(CENSUS_VARIABLES.iter().copied());
    fields
}

pub fn census_filters() -> CensusFilters {
    CensusFilters {
        for_clause: format!("county:{}", CENSUS_COUNTY_CODES.join(",")),
        in_clause: format!("state:{}", CENSUS_STATE_CODE),
    }
}

/// Raw census code to human readable label for one survey year.
pub fn column_descriptions(year: u16) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    labels.insert("NAME".to_string(), "Name".to_string());
    labels.insert("state".to_string(), "State".to_string());
    labels.insert("county".to_string(), MUNICIPAL_CODE_COLUMN.to_string());

    for code in CENSUS_VARIABLES.iter() {
        if let Some(label) = CENSUS_VARIABLE_LABELS.get(code) {
            labels.insert(code.to_string(), format!("{} {}", label, year));
        }
    }
    labels
}

/// Zillow exports carry one bare year column per year of median home values.
pub fn zillow_column_descriptions() -> HashMap<String, String> {
    ZILLOW_YEARS
        .iter()
        .map(|year| (year.to_string(), format!("Zillow Median Value Housing {}", year)))
        .collect()
}

pub fn census_query_url(year: u16) -> String {
    let filters = census_filters();
    let mut url = format!(
        "{}/{}/{}?get={}",
        CENSUS_API_BASE,
        year,
        CENSUS_DATASET,
        census_fields().join(",")
    );
    for (key, value) in filters.query_pairs() {
        url.push_str(&format!("&{}={}", key, value));
    }
    url
}
