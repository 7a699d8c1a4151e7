//! Collection config builder
//!
//! Enumerates the shared collection, one collection per unordered pair of
//! participants, and one settlement collection per participant.

use std::collections::HashSet;

use pdc_policy::{PolicyError, PolicyExpression};
use thiserror::Error;
use tracing::debug;

use crate::collection::{pairwise_name, settlement_name, CollectionRecord};
use crate::config::NetworkConfig;
use crate::sequence::{pair_count, ConfigSequence};

/// Errors raised while building or emitting a collection config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Participant list is empty, has duplicates, or yields two
    /// collections with the same name.
    #[error("invalid participant list: {0}")]
    InvalidParticipantList(String),

    /// A participant uses the regulator's identifier.
    #[error("participant {0:?} collides with the regulator identifier")]
    ReservedIdentifierCollision(String),

    /// `peers.required` is above the peer limit of one collection kind.
    #[error("peers.required = {required} exceeds maxPeerCount {max} of the {kind} collection")]
    RequiredPeersExceedMax {
        kind: &'static str,
        required: u32,
        max: usize,
    },

    /// An identifier cannot be rendered into a policy.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The document could not be serialized or written.
    #[error("serialization failure: {0}")]
    SerializationFailure(String),
}

/// Derives a `ConfigSequence` from a network config.
#[derive(Debug, Clone)]
pub struct Builder<'a> {
    network: &'a NetworkConfig,
}

impl<'a> Builder<'a> {
    pub fn new(network: &'a NetworkConfig) -> Self {
        Self { network }
    }

    /// Reject empty or duplicated participant lists, a participant that
    /// reuses the regulator identifier, and peer counts no collection can
    /// satisfy. Name clashes between generated collections are caught in
    /// `build`.
    pub fn validate(&self) -> Result<(), BuildError> {
        let participants = &self.network.participants;
        if participants.is_empty() {
            return Err(BuildError::InvalidParticipantList(
                "no participants".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(participants.len());
        for participant in participants {
            if participant == &self.network.regulator {
                return Err(BuildError::ReservedIdentifierCollision(participant.clone()));
            }
            if !seen.insert(participant.as_str()) {
                return Err(BuildError::InvalidParticipantList(format!(
                    "duplicate participant {:?}",
                    participant
                )));
            }
        }

        self.check_required_peers()
    }

    /// `peers.required` must fit under every generated `maxPeerCount`.
    fn check_required_peers(&self) -> Result<(), BuildError> {
        let peers = &self.network.peers;
        let limits = [
            ("shared", self.network.participant_count() + 1),
            ("pairwise", peers.pairwise_max as usize),
            ("settlement", peers.settlement_max as usize),
        ];
        for (kind, max) in limits {
            if peers.required as usize > max {
                return Err(BuildError::RequiredPeersExceedMax {
                    kind,
                    required: peers.required,
                    max,
                });
            }
        }
        Ok(())
    }

    /// The collection every participant and the regulator may read.
    pub fn shared_record(&self) -> Result<CollectionRecord, BuildError> {
        let network = self.network;
        let signers = network
            .participants
            .iter()
            .chain(std::iter::once(&network.regulator))
            .map(String::as_str);
        let policy = PolicyExpression::any_member_of(signers)?;

        let max_peers = u32::try_from(network.participant_count() + 1).map_err(|_| {
            BuildError::InvalidParticipantList("too many participants".to_string())
        })?;

        Ok(CollectionRecord::new(network.shared_collection.as_str(), policy)
            .with_peers(network.peers.required, max_peers)
            .with_membership(true, true)
            .with_block_to_live(network.block_to_live))
    }

    /// One bilateral collection per unordered pair, outer index before inner.
    pub fn pairwise_records(&self) -> Result<Vec<CollectionRecord>, BuildError> {
        let network = self.network;
        let participants = &network.participants;
        let mut records = Vec::with_capacity(pair_count(participants.len()));

        for (i, a) in participants.iter().enumerate() {
            for b in &participants[i + 1..] {
                let policy = PolicyExpression::any_member_of([
                    a.as_str(),
                    b.as_str(),
                    network.regulator.as_str(),
                ])?;
                records.push(
                    CollectionRecord::new(pairwise_name(a, b), policy)
                        .with_peers(network.peers.required, network.peers.pairwise_max)
                        .with_membership(true, true)
                        .with_block_to_live(network.block_to_live),
                );
            }
        }

        Ok(records)
    }

    /// One settlement collection per participant, in list order.
    ///
    /// These are the only collections with `memberOnlyRead` off.
    pub fn settlement_records(&self) -> Result<Vec<CollectionRecord>, BuildError> {
        let network = self.network;
        network
            .participants
            .iter()
            .map(|p| -> Result<CollectionRecord, BuildError> {
                let policy =
                    PolicyExpression::any_member_of([p.as_str(), network.regulator.as_str()])?;
                Ok(CollectionRecord::new(settlement_name(p), policy)
                    .with_peers(network.peers.required, network.peers.settlement_max)
                    .with_membership(false, true)
                    .with_block_to_live(network.block_to_live))
            })
            .collect()
    }

    /// Validate, then run all three enumeration steps.
    pub fn build(&self) -> Result<ConfigSequence, BuildError> {
        self.validate()?;

        let shared = self.shared_record()?;
        let pairwise = self.pairwise_records()?;
        let settlement = self.settlement_records()?;

        ensure_unique_names(
            std::iter::once(&shared)
                .chain(pairwise.iter())
                .chain(settlement.iter()),
        )?;

        debug!(
            participants = self.network.participant_count(),
            pairwise = pairwise.len(),
            settlement = settlement.len(),
            "built collection config"
        );

        Ok(ConfigSequence::new(
            shared,
            pairwise,
            settlement,
            self.network.participants.clone(),
            self.network.regulator.clone(),
        ))
    }
}

/// Names are joined with `-`, so hyphenated identifiers can make two
/// records share a name (`A` + `B-C` and `A-B` + `C`).
fn ensure_unique_names<'r>(
    records: impl Iterator<Item = &'r CollectionRecord>,
) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.name.as_str()) {
            return Err(BuildError::InvalidParticipantList(format!(
                "collection name {:?} is generated more than once",
                record.name
            )));
        }
    }
    Ok(())
}

/// Build the collection config for the built-in bank network.
pub fn build_default() -> Result<ConfigSequence, BuildError> {
    let network = NetworkConfig::default();
    Builder::new(&network).build()
}
