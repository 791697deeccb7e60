use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct CheckWorkVotingQuery {
    #[serde(rename = "workId")]
    pub work_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkVotingResponse {
    pub has_voting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_id: Option<i64>,
}

impl WorkVotingResponse {
    pub fn none() -> Self {
        Self {
            has_voting: false,
            voting_status: None,
            voting_title: None,
            voting_id: None,
        }
    }
}
