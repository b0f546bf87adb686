use std::sync::Arc;

use fetchdoi_core::{Contributor, CreatePublicationRequest, VerificationStatus};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::sources::{Person, PersonRegistry};

pub const DEFAULT_MAX_UNVERIFIED: usize = 10;

/// Attaches registry identities to contributors that carry an ORCID but no id.
/// Never fails: lookups that error are logged and the contributor is left as is.
#[derive(Clone)]
pub struct ContributorIdentityEnricher {
    registry: Arc<dyn PersonRegistry>,
    max_unverified: usize,
}

impl ContributorIdentityEnricher {
    pub fn new(registry: Arc<dyn PersonRegistry>) -> Self {
        Self::with_limit(registry, DEFAULT_MAX_UNVERIFIED)
    }

    pub fn with_limit(registry: Arc<dyn PersonRegistry>, max_unverified: usize) -> Self {
        Self {
            registry,
            max_unverified,
        }
    }

    pub async fn enrich(&self, mut request: CreatePublicationRequest) -> CreatePublicationRequest {
        let Some(contributors) = request.contributors_mut() else {
            return request;
        };

        let candidates = contributors.iter().filter(|c| c.identity.is_unverified()).count();
        if candidates == 0 {
            return request;
        }
        if candidates > self.max_unverified {
            warn!(
                candidates,
                limit = self.max_unverified,
                "too many unverified contributors, skipping identity lookup"
            );
            return request;
        }

        let mut outcomes: Vec<Result<bool>> = Vec::with_capacity(candidates);
        for contributor in contributors.iter_mut().filter(|c| c.identity.is_unverified()) {
            outcomes.push(self.enrich_one(contributor).await);
        }

        let mut matched = 0;
        for outcome in outcomes {
            match outcome {
                Ok(true) => matched += 1,
                Ok(false) => {}
                Err(err) => warn!(error = %err, "contributor lookup failed"),
            }
        }
        info!(candidates, matched, "contributor identities enriched");
        request
    }

    async fn enrich_one(&self, contributor: &mut Contributor) -> Result<bool> {
        let Some(orcid) = contributor.identity.orcid.clone() else {
            return Ok(false);
        };
        match self.registry.lookup_by_orcid(&orcid).await? {
            Some(Person { id, verified }) => {
                contributor.identity.id = Some(id);
                contributor.identity.verification_status = if verified {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::NotVerified
                };
                Ok(true)
            }
            None => {
                debug!(%orcid, "no registry match");
                Ok(false)
            }
        }
    }
}
