//! Out-of-band relationship links between existing entities.

use serde::Serialize;

use crate::entity::EntityKind;

/// Links that can be created after both endpoints exist.
///
/// Each variant is exposed as `POST /{owner}/{owner_id}/{segment}/{other_id}`.
/// The edge always points from `source()` to `target()`, which is not
/// necessarily the owner of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `POST /accounts/{account_id}/link-lead/{lead_id}`
    LeadToAccount,
    /// `POST /deals/{deal_id}/link-account/{account_id}`
    DealToAccount,
    /// `POST /opportunities/{opportunity_id}/link-account/{account_id}`
    OpportunityToAccount,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [
        LinkKind::LeadToAccount,
        LinkKind::DealToAccount,
        LinkKind::OpportunityToAccount,
    ];

    /// The entity whose collection the route hangs off.
    pub fn owner(&self) -> EntityKind {
        match self {
            LinkKind::LeadToAccount => EntityKind::Account,
            LinkKind::DealToAccount => EntityKind::Deal,
            LinkKind::OpportunityToAccount => EntityKind::Opportunity,
        }
    }

    /// The path segment after the owner id.
    pub fn segment(&self) -> &'static str {
        match self {
            LinkKind::LeadToAccount => "link-lead",
            LinkKind::DealToAccount | LinkKind::OpportunityToAccount => "link-account",
        }
    }

    pub fn source(&self) -> EntityKind {
        match self {
            LinkKind::LeadToAccount => EntityKind::Lead,
            LinkKind::DealToAccount => EntityKind::Deal,
            LinkKind::OpportunityToAccount => EntityKind::Opportunity,
        }
    }

    pub fn target(&self) -> EntityKind {
        EntityKind::Account
    }

    pub fn relationship(&self) -> &'static str {
        "BELONGS_TO"
    }

    /// Map route ids `(owner_id, other_id)` to edge ids `(source_id, target_id)`.
    pub fn edge_ids<'a>(&self, owner_id: &'a str, other_id: &'a str) -> (&'a str, &'a str) {
        if self.owner() == self.source() {
            (owner_id, other_id)
        } else {
            (other_id, owner_id)
        }
    }

    /// Route path relative to the server root, in axum syntax.
    pub fn route_path(&self) -> String {
        format!("/{}/{{id}}/{}/{{other_id}}", self.owner().collection(), self.segment())
    }
}

/// Response body for a successful link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkConfirmation {
    pub message: String,
    pub source_id: String,
    pub target_id: String,
}

impl LinkConfirmation {
    pub fn new(kind: LinkKind, source_id: String, target_id: String) -> Self {
        Self {
            message: format!("{} {} linked to {} {}", kind.source(), source_id, kind.target(), target_id),
            source_id,
            target_id,
        }
    }
}
