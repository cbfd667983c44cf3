//! Request and response bodies of the moderation endpoints.

use super::advertisement::{Advertisement, RejectionReason};
use serde::{Deserialize, Serialize};

/// Body of `POST /ads/{id}/reject` and `POST /ads/{id}/request-changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub reason: RejectionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of `POST /ads`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Moderation endpoints answer `{ "ad": ... }`; older servers send the bare
/// advertisement. Both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AdvertisementEnvelope {
    Wrapped { ad: Advertisement },
    Bare(Advertisement),
}

impl From<AdvertisementEnvelope> for Advertisement {
    fn from(envelope: AdvertisementEnvelope) -> Self {
        match envelope {
            AdvertisementEnvelope::Wrapped { ad } | AdvertisementEnvelope::Bare(ad) => ad,
        }
    }
}
