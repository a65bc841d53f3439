use std::collections::HashMap;
use lazy_static::lazy_static;

pub const API_NAME: &str = "API";
pub const API_VERSION: &str = "1.0.0";

pub const MUNICIPAL_CODE_COLUMN: &str = "MunicipalCodeFIPS";
pub const PER_CAPITA_INCOME_COLUMN: &str = "Per Capita Income";
pub const HOUSING_VALUE_COLUMN: &str = "Median Value Housing Units";

// Legacy fill value, only ever written when a table is rendered as text
pub const MISSING_MARKER: &str = "void";

pub const CENSUS_STATE_CODE: &str = "13";
pub const CENSUS_DATASET: &str = "acs/acs5";

lazy_static! {
    pub static ref MODEL_FEATURES: Vec<&'static str> = vec![
        MUNICIPAL_CODE_COLUMN,
        PER_CAPITA_INCOME_COLUMN,
    ];

    pub static ref CENSUS_GEOGRAPHY_FIELDS: Vec<&'static str> = vec!["NAME", "state", "county"];

    pub static ref CENSUS_KEY_FIELDS: Vec<&'static str> = vec!["Name", "State", MUNICIPAL_CODE_COLUMN];

    pub static ref CENSUS_VARIABLES: Vec<&'static str> = vec![
        "B01003_001E",
        "B01002_001E",
        "B19013_001E",
        "B19301_001E",
        "B25077_001E",
        "B17001_002E",
    ];

    // Label prefix per census variable, suffixed with the survey year
    pub static ref CENSUS_VARIABLE_LABELS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("B01003_001E", "Population");
        m.insert("B01002_001E", "Median Age");
        m.insert("B19013_001E", "Household Income");
        m.insert("B19301_001E", PER_CAPITA_INCOME_COLUMN);
        m.insert("B25077_001E", HOUSING_VALUE_COLUMN);
        m.insert("B17001_002E", "Poverty Count");
        m
    };

    pub static ref CENSUS_COUNTY_CODES: Vec<&'static str> = vec![
        "121", "135", "089", "067", "063", "057", "151", "117", "097", "077",
        "045", "113", "015", "297", "013", "227", "085", "199", "171",
    ];

    // Census annotation values standing in for unavailable estimates
    pub static ref CENSUS_ANNOTATION_VALUES: Vec<f64> = vec![
        -999_999_999.0,
        -888_888_888.0,
        -666_666_666.0,
        -555_555_555.0,
        -333_333_333.0,
        -222_222_222.0,
    ];

    pub static ref ZILLOW_YEARS: Vec<u16> = (2010..=2018).collect();
}
