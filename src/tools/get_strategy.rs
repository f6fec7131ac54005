use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetStrategyParams {
    #[schemars(description = "ID of the accepted strategy")]
    pub id: String,
}
