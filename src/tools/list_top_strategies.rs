use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTopStrategiesParams {
    #[schemars(description = "Number of strategies to return (at least 1). Defaults to 10.")]
    pub n: Option<usize>,
}
